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

use crate::s3::builders::add_user_metadata;
use crate::s3::client::Client;
use crate::s3::error::ValidationErr;
use crate::s3::header_constants::CONTENT_TYPE;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response::CreateMultipartUploadResponse;
use crate::s3::types::{BucketName, ObjectKey, S3Api, S3Request, ToS3Request};
use http::Method;

/// Argument builder for the [`CreateMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateMultipartUpload.html) S3 API operation.
///
/// This is the stateless low-level call; most callers use
/// [`Client::initiate_multipart_upload`](crate::s3::client::Client::initiate_multipart_upload),
/// which wraps the returned upload ID in a session.
#[derive(Clone, Debug)]
pub struct CreateMultipartUpload {
    client: Client,

    extra_headers: Option<Multimap>,
    extra_query_params: Option<Multimap>,
    bucket: String,
    object: String,
    content_type: Option<String>,
    user_metadata: Option<Multimap>,
}

impl CreateMultipartUpload {
    pub fn new(client: Client, bucket: String, object: String) -> Self {
        Self {
            client,
            extra_headers: None,
            extra_query_params: None,
            bucket,
            object,
            content_type: None,
            user_metadata: None,
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

    pub fn content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn user_metadata(mut self, user_metadata: Option<Multimap>) -> Self {
        self.user_metadata = user_metadata;
        self
    }
}

impl S3Api for CreateMultipartUpload {
    type S3Response = CreateMultipartUploadResponse;
}

impl ToS3Request for CreateMultipartUpload {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        let bucket = BucketName::new(self.bucket)?;
        let object = ObjectKey::new(self.object)?;

        let mut headers: Multimap = self.extra_headers.unwrap_or_default();
        if let Some(v) = self.content_type {
            headers.add(CONTENT_TYPE, v);
        }
        add_user_metadata(&mut headers, self.user_metadata);

        let mut query_params: Multimap = self.extra_query_params.unwrap_or_default();
        query_params.add("uploads", "");

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::POST)
            .bucket(bucket)
            .object(object)
            .query_params(query_params)
            .headers(headers)
            .build())
    }
}
