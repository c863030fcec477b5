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
use crate::s3::types::{FromS3Response, ListEntry, S3Request};
use crate::s3::utils::{from_iso8601utc, get_text, get_text_option, parse_xml, trim_quotes, url_decode};
use async_trait::async_trait;
use http::HeaderMap;
use xmltree::{Element, XMLNode};

fn decode(encoding_type: &Option<String>, value: String) -> String {
    match encoding_type.as_deref() {
        Some(t) if t.eq_ignore_ascii_case("url") => url_decode(&value),
        _ => value,
    }
}

fn children<'a>(root: &'a Element, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    root.children.iter().filter_map(move |node| match node {
        XMLNode::Element(e) if e.name == tag => Some(e),
        _ => None,
    })
}

fn parse_contents(root: &Element, encoding_type: &Option<String>) -> Result<Vec<ListEntry>, Error> {
    let mut contents = Vec::new();
    for content in children(root, "Contents") {
        let size = get_text_option(content, "Size")
            .map(|x| x.parse::<u64>())
            .transpose()?;
        let last_modified = get_text_option(content, "LastModified")
            .map(|x| from_iso8601utc(&x))
            .transpose()?;
        contents.push(ListEntry {
            name: decode(encoding_type, get_text(content, "Key")?),
            last_modified,
            etag: get_text_option(content, "ETag").map(trim_quotes),
            size,
            storage_class: get_text_option(content, "StorageClass"),
            is_prefix: false,
        });
    }
    for common_prefix in children(root, "CommonPrefixes") {
        contents.push(ListEntry {
            name: decode(encoding_type, get_text(common_prefix, "Prefix")?),
            is_prefix: true,
            ..Default::default()
        });
    }
    Ok(contents)
}

/// Response of [list_objects()](crate::s3::client::Client::list_objects) S3 API
///
/// Holds one page. Objects come first in server order, followed by common
/// prefixes (entries with `is_prefix` set).
#[derive(Clone, Debug)]
pub struct ListObjectsResponse {
    pub headers: HeaderMap,
    pub name: String,
    pub encoding_type: Option<String>,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub is_truncated: bool,
    pub max_keys: Option<u16>,
    pub contents: Vec<ListEntry>,
    pub marker: Option<String>,
    /// Marker for the next page. When the server omits `NextMarker` on a
    /// truncated page, this is the last key of the page.
    pub next_marker: Option<String>,
}

impl ListObjectsResponse {
    /// Object entries of this page.
    pub fn objects(&self) -> impl Iterator<Item = &ListEntry> {
        self.contents.iter().filter(|e| !e.is_prefix)
    }

    /// Common prefixes of this page.
    pub fn common_prefixes(&self) -> impl Iterator<Item = &str> {
        self.contents
            .iter()
            .filter(|e| e.is_prefix)
            .map(|e| e.name.as_str())
    }
}

#[async_trait]
impl FromS3Response for ListObjectsResponse {
    async fn from_s3response(
        _req: S3Request,
        resp: Result<RawResponse, Error>,
    ) -> Result<Self, Error> {
        let resp = resp?;
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        let root = parse_xml(&body)?;

        let encoding_type = get_text_option(&root, "EncodingType");
        let name = get_text(&root, "Name")?;
        let prefix = get_text_option(&root, "Prefix").map(|v| decode(&encoding_type, v));
        let delimiter = get_text_option(&root, "Delimiter").map(|v| decode(&encoding_type, v));
        let is_truncated = get_text_option(&root, "IsTruncated")
            .map(|x| x.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let max_keys = get_text_option(&root, "MaxKeys")
            .map(|x| x.parse::<u16>())
            .transpose()?;
        let marker = get_text_option(&root, "Marker").map(|v| decode(&encoding_type, v));
        let contents = parse_contents(&root, &encoding_type)?;

        let mut next_marker = get_text_option(&root, "NextMarker").map(|v| decode(&encoding_type, v));
        if is_truncated && next_marker.is_none() {
            next_marker = contents.last().map(|e| e.name.clone());
        }

        Ok(Self {
            headers,
            name,
            encoding_type,
            prefix,
            delimiter,
            is_truncated,
            max_keys,
            contents,
            marker,
            next_marker,
        })
    }
}
