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

//! Basic data types returned by bucket, object and multipart operations

use crate::s3::types::BucketName;
use crate::s3::utils::UtcTime;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Contains the bucket name and creation date
pub struct Bucket {
    pub name: BucketName,
    pub creation_date: UtcTime,
}

/// One entry of a [`ListObjects`](crate::s3::builders::ListObjects) page:
/// either an object or, with a delimiter, a common prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub last_modified: Option<UtcTime>,
    pub etag: Option<String>, // except common prefixes
    pub size: Option<u64>,    // except common prefixes
    pub storage_class: Option<String>,
    pub is_prefix: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Contains part number and etag of multipart upload
pub struct Part {
    pub number: u16,
    pub etag: String,
}

impl Part {
    pub fn new(number: u16, etag: impl Into<String>) -> Self {
        Self {
            number,
            etag: etag.into(),
        }
    }
}

/// A part known to exist for a multipart upload, either recorded locally
/// after a successful upload or reported by `ListParts`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartInfo {
    pub number: u16,
    pub etag: String,
    pub size: u64,
    pub last_modified: Option<UtcTime>,
}

impl PartInfo {
    pub fn new(number: u16, etag: String, size: u64) -> Self {
        Self {
            number,
            etag,
            size,
            last_modified: None,
        }
    }
}

impl From<&PartInfo> for Part {
    fn from(p: &PartInfo) -> Self {
        Part::new(p.number, p.etag.clone())
    }
}
