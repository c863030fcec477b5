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
use crate::s3::types::{Bucket, BucketName, FromS3Response, S3Request};
use crate::s3::utils::{from_iso8601utc, get_text, parse_xml};
use async_trait::async_trait;
use http::HeaderMap;

/// Response of [list_buckets()](crate::s3::client::Client::list_buckets) API
#[derive(Clone, Debug)]
pub struct ListBucketsResponse {
    pub headers: HeaderMap,
    /// Buckets ordered by name.
    pub buckets: Vec<Bucket>,
}

#[async_trait]
impl FromS3Response for ListBucketsResponse {
    async fn from_s3response(
        _req: S3Request,
        resp: Result<RawResponse, Error>,
    ) -> Result<Self, Error> {
        let resp = resp?;
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;

        let mut root = parse_xml(&body)?;
        let buckets = root
            .get_mut_child("Buckets")
            .ok_or_else(|| Error::invalid_response("<Buckets> tag not found"))?;

        let mut bucket_list: Vec<Bucket> = Vec::new();
        while let Some(b) = buckets.take_child("Bucket") {
            let name = get_text(&b, "Name")?;
            bucket_list.push(Bucket {
                name: BucketName::new(name).map_err(|e| Error::invalid_response(e.to_string()))?,
                creation_date: from_iso8601utc(&get_text(&b, "CreationDate")?)?,
            });
        }
        bucket_list.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            headers,
            buckets: bucket_list,
        })
    }
}
