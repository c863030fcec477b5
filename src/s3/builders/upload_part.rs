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
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response::UploadPartResponse;
use crate::s3::types::{BucketName, ObjectKey, S3Api, S3Request, ToS3Request, UploadId};
use http::Method;

/// Argument builder for the [`UploadPart`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPart.html) S3 API operation.
///
/// Stateless; [`MultipartUpload::upload_part`](crate::s3::multipart::MultipartUpload::upload_part)
/// uses it and records the resulting ETag.
#[derive(Debug)]
pub struct UploadPart {
    client: Client,

    extra_headers: Option<Multimap>,
    extra_query_params: Option<Multimap>,
    bucket: String,
    object: String,
    upload_id: String,
    part_number: u16,
    content: ObjectContent,
}

impl UploadPart {
    pub fn new(
        client: Client,
        bucket: String,
        object: String,
        upload_id: String,
        part_number: u16,
        content: ObjectContent,
    ) -> Self {
        Self {
            client,
            extra_headers: None,
            extra_query_params: None,
            bucket,
            object,
            upload_id,
            part_number,
            content,
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
}

impl S3Api for UploadPart {
    type S3Response = UploadPartResponse;
}

impl ToS3Request for UploadPart {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        let bucket = BucketName::new(self.bucket)?;
        let object = ObjectKey::new(self.object)?;
        let upload_id = UploadId::new(self.upload_id)?;

        let limits = self.client.limits();
        if self.part_number < 1 || self.part_number > limits.max_parts {
            return Err(ValidationErr::InvalidPartNumber {
                number: self.part_number as u32,
                max: limits.max_parts,
            });
        }
        if let Size::Known(size) = self.content.size()
            && size > limits.max_part_size
        {
            return Err(ValidationErr::EntityTooLarge {
                size,
                limit: limits.max_part_size,
            });
        }

        let mut query_params: Multimap = self.extra_query_params.unwrap_or_default();
        query_params.add("partNumber", self.part_number.to_string());
        query_params.add("uploadId", upload_id.into_inner());

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::PUT)
            .bucket(bucket)
            .object(object)
            .query_params(query_params)
            .headers(self.extra_headers.unwrap_or_default())
            .body(self.content)
            .build())
    }
}
