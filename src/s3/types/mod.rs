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

//! Core types shared by request builders and responses

pub mod basic_types;
pub mod s3_request;
pub mod traits;
pub mod typed_parameters;

pub use basic_types::{Bucket, ListEntry, Part, PartInfo};
pub use s3_request::S3Request;
pub use traits::{FromS3Response, S3Api, ToS3Request};
pub use typed_parameters::{BucketName, ObjectKey, UploadId};
