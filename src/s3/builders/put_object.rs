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
use crate::s3::client::Client;
use crate::s3::error::ValidationErr;
use crate::s3::header_constants::{CONTENT_TYPE, X_AMZ_META_PREFIX};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response::PutObjectResponse;
use crate::s3::types::{BucketName, ObjectKey, S3Api, S3Request, ToS3Request};
use http::Method;

/// Adds user metadata as `x-amz-meta-*` headers.
pub(crate) fn add_user_metadata(headers: &mut Multimap, user_metadata: Option<Multimap>) {
    let Some(metadata) = user_metadata else {
        return;
    };
    for (key, values) in metadata.into_iter() {
        let key = if key.to_lowercase().starts_with(X_AMZ_META_PREFIX) {
            key
        } else {
            format!("{X_AMZ_META_PREFIX}{key}")
        };
        for value in values {
            headers.add(key.clone(), value);
        }
    }
}

/// Argument builder for the [`PutObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObject.html) S3 API operation.
///
/// Uploads the whole object in a single request. The content size must be
/// known and must not exceed [`Limits::max_single_put_size`](crate::s3::client::Limits);
/// larger objects go through a [`MultipartUpload`](crate::s3::multipart::MultipartUpload).
#[derive(Debug)]
pub struct PutObject {
    client: Client,

    extra_headers: Option<Multimap>,
    extra_query_params: Option<Multimap>,
    bucket: String,
    object: String,
    content: ObjectContent,
    content_type: Option<String>,
    user_metadata: Option<Multimap>,
    content_md5: bool,
}

impl PutObject {
    pub fn new(client: Client, bucket: String, object: String, content: ObjectContent) -> Self {
        Self {
            client,
            extra_headers: None,
            extra_query_params: None,
            bucket,
            object,
            content,
            content_type: None,
            user_metadata: None,
            content_md5: false,
        }
    }

    pub fn extra_headers(mut self, extra_headers: Option<Multimap>) -> Self {
        self.extra_headers = extra_headers;
        self
    }

    pub fn extra_query_params(mut self, extra_query_params: Option<Multimap>) -> Self {
        self.extra_query_params = extra_query_params;
        self
    }

    /// Content type stored with the object. Defaults to `application/octet-stream`.
    pub fn content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Metadata stored with the object; keys are sent with the
    /// `x-amz-meta-` prefix.
    pub fn user_metadata(mut self, user_metadata: Option<Multimap>) -> Self {
        self.user_metadata = user_metadata;
        self
    }

    /// Sends a `Content-MD5` header so the server verifies the payload.
    /// Only in-memory content is hashed.
    pub fn content_md5(mut self, content_md5: bool) -> Self {
        self.content_md5 = content_md5;
        self
    }
}

impl S3Api for PutObject {
    type S3Response = PutObjectResponse;
}

impl ToS3Request for PutObject {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        let bucket = BucketName::new(self.bucket)?;
        let object = ObjectKey::new(self.object)?;

        let limit = self.client.limits().max_single_put_size;
        if let Size::Known(size) = self.content.size()
            && size > limit
        {
            return Err(ValidationErr::EntityTooLarge { size, limit });
        }

        let mut headers: Multimap = self.extra_headers.unwrap_or_default();
        if let Some(v) = self.content_type {
            headers.add(CONTENT_TYPE, v);
        }
        add_user_metadata(&mut headers, self.user_metadata);

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::PUT)
            .bucket(bucket)
            .object(object)
            .query_params(self.extra_query_params.unwrap_or_default())
            .headers(headers)
            .body(self.content)
            .content_md5(self.content_md5)
            .build())
    }
}
