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

use crate::s3::error::{Error, ErrorKind};
use crate::s3::transport::RawResponse;
use crate::s3::types::{FromS3Response, S3Request};
use async_trait::async_trait;
use http::HeaderMap;
use log::debug;

/// Response of [delete_object()](crate::s3::client::Client::delete_object) API
#[derive(Clone, Debug)]
pub struct DeleteObjectResponse {
    /// Response headers; empty when the server reported the key as missing.
    pub headers: HeaderMap,
    pub region: String,
    pub bucket: String,
    pub object: String,
    pub version_id: Option<String>,
}

#[async_trait]
impl FromS3Response for DeleteObjectResponse {
    async fn from_s3response(
        mut req: S3Request,
        resp: Result<RawResponse, Error>,
    ) -> Result<Self, Error> {
        let headers = match resp {
            Ok(r) => r.headers().clone(),
            Err(e) if e.kind() == ErrorKind::NoSuchKey => {
                debug!("delete_object: key already absent: {e}");
                HeaderMap::new()
            }
            Err(e) => return Err(e),
        };
        let (bucket, object) = super::take_names(&mut req);

        Ok(Self {
            version_id: super::version_id_from_headers(&headers),
            headers,
            region: req.inner_region,
            bucket,
            object,
        })
    }
}
