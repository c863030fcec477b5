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

use crate::s3::client::Client;
use crate::s3::error::ValidationErr;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response::ListPartsResponse;
use crate::s3::types::{BucketName, ObjectKey, S3Api, S3Request, ToS3Request, UploadId};
use http::Method;

/// Argument builder for the [`ListParts`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListParts.html) S3 API operation.
///
/// Returns one page of the parts the server holds for an upload.
#[derive(Clone, Debug)]
pub struct ListParts {
    client: Client,

    extra_headers: Option<Multimap>,
    extra_query_params: Option<Multimap>,
    bucket: String,
    object: String,
    upload_id: String,
    max_parts: Option<u16>,
    part_number_marker: Option<u16>,
}

impl ListParts {
    pub fn new(client: Client, bucket: String, object: String, upload_id: String) -> Self {
        Self {
            client,
            extra_headers: None,
            extra_query_params: None,
            bucket,
            object,
            upload_id,
            max_parts: None,
            part_number_marker: None,
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

    pub fn max_parts(mut self, max_parts: Option<u16>) -> Self {
        self.max_parts = max_parts;
        self
    }

    /// Listing starts after this part number.
    pub fn part_number_marker(mut self, part_number_marker: Option<u16>) -> Self {
        self.part_number_marker = part_number_marker;
        self
    }
}

impl S3Api for ListParts {
    type S3Response = ListPartsResponse;
}

impl ToS3Request for ListParts {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        let bucket = BucketName::new(self.bucket)?;
        let object = ObjectKey::new(self.object)?;
        let upload_id = UploadId::new(self.upload_id)?;

        let mut query_params: Multimap = self.extra_query_params.unwrap_or_default();
        query_params.add("uploadId", upload_id.into_inner());
        if let Some(v) = self.max_parts {
            query_params.add("max-parts", v.to_string());
        }
        if let Some(v) = self.part_number_marker {
            query_params.add("part-number-marker", v.to_string());
        }

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::GET)
            .bucket(bucket)
            .object(object)
            .query_params(query_params)
            .headers(self.extra_headers.unwrap_or_default())
            .build())
    }
}
