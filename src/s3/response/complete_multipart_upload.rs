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
use crate::s3::error_response::error_in_success_body;
use crate::s3::transport::RawResponse;
use crate::s3::types::{FromS3Response, S3Request};
use crate::s3::utils::{get_text, get_text_option, parse_xml, trim_quotes};
use async_trait::async_trait;
use http::HeaderMap;

/// Response of [CompleteMultipartUpload](crate::s3::builders::CompleteMultipartUpload) API
#[derive(Clone, Debug)]
pub struct CompleteMultipartUploadResponse {
    pub headers: HeaderMap,
    pub region: String,
    pub bucket: String,
    pub object: String,
    pub location: Option<String>,
    /// ETag of the assembled object, quotes removed.
    pub etag: String,
    pub version_id: Option<String>,
}

#[async_trait]
impl FromS3Response for CompleteMultipartUploadResponse {
    async fn from_s3response(
        mut req: S3Request,
        resp: Result<RawResponse, Error>,
    ) -> Result<Self, Error> {
        let resp = resp?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;

        // The server reports some failures with 200 OK and an <Error> body.
        if let Some(e) = error_in_success_body(status, &headers, &body) {
            return Err(e);
        }

        let root = parse_xml(&body)?;
        let etag = trim_quotes(get_text(&root, "ETag")?);
        let location = get_text_option(&root, "Location");
        let (bucket, object) = super::take_names(&mut req);

        Ok(Self {
            version_id: super::version_id_from_headers(&headers),
            headers,
            region: req.inner_region,
            bucket,
            object,
            location,
            etag,
        })
    }
}
