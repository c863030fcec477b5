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

use crate::s3::error::Error;
use crate::s3::transport::RawResponse;
use crate::s3::types::{FromS3Response, S3Request};
use async_trait::async_trait;
use http::HeaderMap;

/// Response of [delete_bucket()](crate::s3::client::Client::delete_bucket) API
#[derive(Clone, Debug)]
pub struct DeleteBucketResponse {
    pub headers: HeaderMap,
    pub region: String,
    pub bucket: String,
}

#[async_trait]
impl FromS3Response for DeleteBucketResponse {
    async fn from_s3response(
        mut req: S3Request,
        resp: Result<RawResponse, Error>,
    ) -> Result<Self, Error> {
        let headers = resp?.headers().clone();
        let (bucket, _) = super::take_names(&mut req);

        Ok(Self {
            headers,
            region: req.inner_region,
            bucket,
        })
    }
}
