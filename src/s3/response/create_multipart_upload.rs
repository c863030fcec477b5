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
use crate::s3::utils::{get_text, parse_xml};
use async_trait::async_trait;
use http::HeaderMap;

/// Response of [CreateMultipartUpload](crate::s3::builders::CreateMultipartUpload) API
#[derive(Clone, Debug)]
pub struct CreateMultipartUploadResponse {
    pub headers: HeaderMap,
    pub region: String,
    pub bucket: String,
    pub object: String,
    pub upload_id: String,
}

#[async_trait]
impl FromS3Response for CreateMultipartUploadResponse {
    async fn from_s3response(
        mut req: S3Request,
        resp: Result<RawResponse, Error>,
    ) -> Result<Self, Error> {
        let resp = resp?;
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        let root = parse_xml(&body)?;

        let upload_id = get_text(&root, "UploadId")?;
        if upload_id.trim().is_empty() {
            return Err(Error::invalid_response("empty <UploadId> in response"));
        }
        let (bucket, object) = super::take_names(&mut req);

        Ok(Self {
            headers,
            region: req.inner_region,
            bucket,
            object,
            upload_id,
        })
    }
}
