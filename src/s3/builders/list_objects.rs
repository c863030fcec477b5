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
use crate::s3::response::ListObjectsResponse;
use crate::s3::types::{BucketName, S3Api, S3Request, ToS3Request};
use http::Method;

/// Argument builder for the [`ListObjects`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListObjects.html) S3 API operation (version 1).
///
/// Returns one page of results. Pagination is driven by the caller: pass the
/// previous page's [`next_marker`](crate::s3::response::ListObjectsResponse::next_marker)
/// to [`marker`](ListObjects::marker) while the page is truncated.
#[derive(Clone, Debug)]
pub struct ListObjects {
    client: Client,

    extra_headers: Option<Multimap>,
    extra_query_params: Option<Multimap>,
    bucket: String,
    prefix: Option<String>,
    marker: Option<String>,
    delimiter: Option<String>,
    max_keys: Option<u16>,
}

impl ListObjects {
    pub fn new(client: Client, bucket: String) -> Self {
        Self {
            client,
            extra_headers: None,
            extra_query_params: None,
            bucket,
            prefix: None,
            marker: None,
            delimiter: None,
            max_keys: None,
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

    /// Only keys starting with this prefix are listed.
    pub fn prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Listing starts after this key.
    pub fn marker(mut self, marker: Option<String>) -> Self {
        self.marker = marker;
        self
    }

    /// Keys sharing a prefix up to the delimiter are rolled up into one
    /// common-prefix entry.
    pub fn delimiter(mut self, delimiter: Option<String>) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Maximum number of entries in the page. The server caps this at 1000.
    pub fn max_keys(mut self, max_keys: Option<u16>) -> Self {
        self.max_keys = max_keys;
        self
    }
}

impl S3Api for ListObjects {
    type S3Response = ListObjectsResponse;
}

impl ToS3Request for ListObjects {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        let bucket = BucketName::new(self.bucket)?;

        let mut query_params: Multimap = self.extra_query_params.unwrap_or_default();
        query_params.add("encoding-type", "url");
        if let Some(v) = self.delimiter {
            query_params.add("delimiter", v);
        }
        if let Some(v) = self.marker {
            query_params.add("marker", v);
        }
        if let Some(v) = self.max_keys {
            query_params.add("max-keys", v.to_string());
        }
        if let Some(v) = self.prefix {
            query_params.add("prefix", v);
        }

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::GET)
            .bucket(bucket)
            .query_params(query_params)
            .headers(self.extra_headers.unwrap_or_default())
            .build())
    }
}
