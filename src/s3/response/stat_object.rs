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
use crate::s3::header_constants::{
    CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, X_AMZ_META_PREFIX, X_AMZ_STORAGE_CLASS,
};
use crate::s3::transport::RawResponse;
use crate::s3::types::{FromS3Response, S3Request};
use crate::s3::utils::{UtcTime, from_http_header_value};
use async_trait::async_trait;
use http::HeaderMap;
use std::collections::HashMap;

/// Response of [stat_object()](crate::s3::client::Client::stat_object) API
#[derive(Clone, Debug)]
pub struct StatObjectResponse {
    /// HTTP headers returned by the server, containing metadata such as `Content-Type`, `ETag`, etc.
    pub headers: HeaderMap,

    /// The region the request was signed for.
    pub region: String,

    /// Name of the bucket containing the object.
    pub bucket: String,

    /// Key (path) identifying the object within the bucket.
    pub object: String,

    /// Size of the object in bytes.
    pub size: u64,

    /// Entity tag with surrounding quotes removed.
    pub etag: String,

    /// Version ID of the object, if versioning is enabled.
    pub version_id: Option<String>,

    /// Timestamp indicating when the object was last modified.
    pub last_modified: Option<UtcTime>,

    pub content_type: Option<String>,

    /// Storage class; servers omit it for the default class.
    pub storage_class: Option<String>,

    /// Custom user-defined metadata, keyed without the `x-amz-meta-` prefix.
    pub user_metadata: HashMap<String, String>,
}

#[async_trait]
impl FromS3Response for StatObjectResponse {
    async fn from_s3response(
        mut req: S3Request,
        resp: Result<RawResponse, Error>,
    ) -> Result<Self, Error> {
        let headers: HeaderMap = resp?.headers().clone();

        let size: u64 = match headers.get(CONTENT_LENGTH) {
            Some(v) => v.to_str()?.parse::<u64>()?,
            None => {
                return Err(Error::invalid_response(
                    "Content-Length header missing in StatObject response",
                ));
            }
        };

        let last_modified: Option<UtcTime> = match headers.get(LAST_MODIFIED) {
            Some(v) => Some(from_http_header_value(v.to_str()?)?),
            None => None,
        };

        let header_text = |name: &str| -> Option<String> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        let content_type = header_text(CONTENT_TYPE);
        let storage_class = header_text(X_AMZ_STORAGE_CLASS);

        let mut user_metadata: HashMap<String, String> = HashMap::new();
        for (key, value) in headers.iter() {
            if let Some(v) = key.as_str().strip_prefix(X_AMZ_META_PREFIX) {
                user_metadata.insert(v.to_string(), value.to_str()?.to_string());
            }
        }

        let (bucket, object) = super::take_names(&mut req);
        Ok(Self {
            etag: super::etag_from_headers(&headers)?,
            version_id: super::version_id_from_headers(&headers),
            region: req.inner_region,
            bucket,
            object,
            size,
            last_modified,
            content_type,
            storage_class,
            user_metadata,
            headers,
        })
    }
}
