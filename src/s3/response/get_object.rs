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

use crate::s3::builders::{ObjectContent, Size};
use crate::s3::error::Error;
use crate::s3::header_constants::CONTENT_LENGTH;
use crate::s3::transport::RawResponse;
use crate::s3::types::{FromS3Response, S3Request};
use async_trait::async_trait;
use http::HeaderMap;

/// Response of [get_object()](crate::s3::client::Client::get_object) API
///
/// The body is not read until `content` is consumed.
#[derive(Debug)]
pub struct GetObjectResponse {
    pub headers: HeaderMap,
    pub region: String,
    pub bucket: String,
    pub object: String,
    pub version_id: Option<String>,
    /// ETag with surrounding quotes removed.
    pub etag: String,
    /// Number of bytes in `content`; the range length for ranged reads.
    pub object_size: u64,
    pub content: ObjectContent,
}

#[async_trait]
impl FromS3Response for GetObjectResponse {
    async fn from_s3response(
        mut req: S3Request,
        resp: Result<RawResponse, Error>,
    ) -> Result<Self, Error> {
        let (_, headers, body) = resp?.into_parts();
        let object_size: u64 = match headers.get(CONTENT_LENGTH) {
            Some(v) => v.to_str()?.parse::<u64>()?,
            None => {
                return Err(Error::invalid_response(
                    "Content-Length header missing in GetObject response",
                ));
            }
        };
        let (bucket, object) = super::take_names(&mut req);

        Ok(Self {
            etag: super::etag_from_headers(&headers)?,
            version_id: super::version_id_from_headers(&headers),
            headers,
            region: req.inner_region,
            bucket,
            object,
            object_size,
            content: ObjectContent::new_from_stream(body, Size::Known(object_size)),
        })
    }
}
