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

//! # Low level object storage client (`objectstorage`)
//!
//! This crate speaks the Amazon S3 REST protocol at the level of single
//! requests: bucket, object and multipart upload operations, request signing
//! (AWS Signature V4), streaming bodies and translation of HTTP/XML error
//! responses into a structured error taxonomy.
//!
//! Each supported S3 operation has a request builder (e.g.
//! [`s3::builders::CreateBucket`], [`s3::builders::PutObject`],
//! [`s3::builders::UploadPart`]) returned by a method on [`s3::Client`].
//! All builders implement [`s3::types::S3Api`], whose async
//! [`send`](crate::s3::types::S3Api::send) executes the request and returns a
//! typed response.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use objectstorage::s3::ClientBuilder;
//! use objectstorage::s3::creds::StaticProvider;
//! use objectstorage::s3::http::BaseUrl;
//! use objectstorage::s3::types::S3Api;
//!
//! #[tokio::main]
//! async fn main() {
//!     let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
//!     let client = ClientBuilder::new(base_url)
//!         .provider(Some(StaticProvider::new("minioadmin", "minioadmin", None)))
//!         .build()
//!         .unwrap();
//!
//!     let resp = client.list_buckets().send().await.expect("request failed");
//!     for bucket in resp.buckets {
//!         println!("{}", bucket.name);
//!     }
//! }
//! ```
//!
//! ## Design
//! - Builders implement [`s3::types::ToS3Request`] for request construction
//!   and [`s3::types::S3Api`] for execution
//! - Requests go through an injectable [`s3::transport::Transport`]
//! - Responses implement [`s3::types::FromS3Response`]; every non-2xx response
//!   becomes exactly one [`s3::error::Error`]
//! - Multipart uploads can be driven through the stateful
//!   [`s3::multipart::MultipartUpload`] session handle

#![allow(clippy::result_large_err)]
#![allow(clippy::too_many_arguments)]
pub mod s3;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
