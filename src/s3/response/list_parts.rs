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
use crate::s3::types::{FromS3Response, PartInfo, S3Request};
use crate::s3::utils::{from_iso8601utc, get_text, get_text_option, parse_xml, trim_quotes};
use async_trait::async_trait;
use http::HeaderMap;
use xmltree::XMLNode;

/// Response of [list_parts()](crate::s3::multipart::MultipartUpload::list_parts) API
#[derive(Clone, Debug)]
pub struct ListPartsResponse {
    pub headers: HeaderMap,
    pub region: String,
    pub bucket: String,
    pub object: String,
    pub upload_id: String,
    pub part_number_marker: Option<u16>,
    pub next_part_number_marker: Option<u16>,
    pub max_parts: Option<u16>,
    pub is_truncated: bool,
    /// Parts in ascending part-number order.
    pub parts: Vec<PartInfo>,
}

#[async_trait]
impl FromS3Response for ListPartsResponse {
    async fn from_s3response(
        mut req: S3Request,
        resp: Result<RawResponse, Error>,
    ) -> Result<Self, Error> {
        let resp = resp?;
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        let root = parse_xml(&body)?;

        let parse_u16 = |tag: &str| -> Result<Option<u16>, Error> {
            Ok(get_text_option(&root, tag)
                .map(|v| v.parse::<u16>())
                .transpose()?)
        };
        let part_number_marker = parse_u16("PartNumberMarker")?;
        let next_part_number_marker = parse_u16("NextPartNumberMarker")?;
        let max_parts = parse_u16("MaxParts")?;
        let is_truncated = get_text_option(&root, "IsTruncated")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let mut parts = Vec::new();
        for node in root.children.iter() {
            let XMLNode::Element(part) = node else {
                continue;
            };
            if part.name != "Part" {
                continue;
            }
            let last_modified = get_text_option(part, "LastModified")
                .map(|v| from_iso8601utc(&v))
                .transpose()?;
            parts.push(PartInfo {
                number: get_text(part, "PartNumber")?.parse::<u16>()?,
                etag: trim_quotes(get_text(part, "ETag")?),
                size: get_text(part, "Size")?.parse::<u64>()?,
                last_modified,
            });
        }
        parts.sort_by_key(|p| p.number);

        let upload_id = get_text(&root, "UploadId")?;
        let (bucket, object) = super::take_names(&mut req);

        Ok(Self {
            headers,
            region: req.inner_region,
            bucket,
            object,
            upload_id,
            part_number_marker,
            next_part_number_marker,
            max_parts,
            is_truncated,
            parts,
        })
    }
}
