// Minimal object storage library for Amazon S3 compatible cloud storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::s3_request::S3Request;
use crate::s3::error::{Error, ValidationErr};
use crate::s3::transport::RawResponse;
use async_trait::async_trait;

pub trait ToS3Request: Sized {
    /// Consumes this request builder and returns a [`S3Request`].
    ///
    /// All argument validation happens here, so a builder that fails to
    /// convert never touches the network.
    fn to_s3request(self) -> Result<S3Request, ValidationErr>;
}

#[async_trait]
pub trait FromS3Response: Sized {
    /// Asynchronously converts a raw response into a strongly typed S3 response.
    ///
    /// `response` is `Err` when the request failed before a 2xx response was
    /// obtained; implementations usually propagate it, but may translate
    /// specific errors (e.g. a missing key on delete) into success.
    async fn from_s3response(
        s3req: S3Request,
        response: Result<RawResponse, Error>,
    ) -> Result<Self, Error>;
}

#[async_trait]
pub trait S3Api: ToS3Request {
    /// The response type associated with this request builder.
    type S3Response: FromS3Response;

    /// Sends the S3 API request and returns the corresponding typed response.
    ///
    /// This method consumes the request builder, converts it into a concrete HTTP
    /// request using [`ToS3Request::to_s3request`], executes the request, and then
    /// converts the HTTP response into the appropriate typed response using
    /// [`FromS3Response::from_s3response`].
    async fn send(self) -> Result<Self::S3Response, Error> {
        let mut req: S3Request = self.to_s3request()?;
        let resp: Result<RawResponse, Error> = req.execute().await;
        Self::S3Response::from_s3response(req, resp).await
    }
}
