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

//! Responses for [Client](crate::s3::client::Client) APIs

use crate::s3::error::Error;
use crate::s3::header_constants::{ETAG, X_AMZ_VERSION_ID};
use crate::s3::types::S3Request;
use crate::s3::utils::trim_quotes;
use http::HeaderMap;

mod abort_multipart_upload;
mod complete_multipart_upload;
mod create_bucket;
mod create_multipart_upload;
mod delete_bucket;
mod delete_object;
mod get_object;
mod list_buckets;
mod list_objects;
mod list_parts;
mod put_object;
mod stat_object;

pub use abort_multipart_upload::AbortMultipartUploadResponse;
pub use complete_multipart_upload::CompleteMultipartUploadResponse;
pub use create_bucket::CreateBucketResponse;
pub use create_multipart_upload::CreateMultipartUploadResponse;
pub use delete_bucket::DeleteBucketResponse;
pub use delete_object::DeleteObjectResponse;
pub use get_object::GetObjectResponse;
pub use list_buckets::ListBucketsResponse;
pub use list_objects::ListObjectsResponse;
pub use list_parts::ListPartsResponse;
pub use put_object::{PutObjectResponse, UploadPartResponse};
pub use stat_object::StatObjectResponse;

/// Takes bucket and object names out of an executed request.
fn take_names(req: &mut S3Request) -> (String, String) {
    (
        req.bucket.take().map(|b| b.into_inner()).unwrap_or_default(),
        req.object.take().map(|o| o.into_inner()).unwrap_or_default(),
    )
}

/// Returns the `ETag` header with quotes stripped.
fn etag_from_headers(headers: &HeaderMap) -> Result<String, Error> {
    let value = headers
        .get(ETAG)
        .ok_or_else(|| Error::invalid_response("ETag header missing"))?;
    Ok(trim_quotes(value.to_str()?.to_string()))
}

fn version_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_AMZ_VERSION_ID)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
