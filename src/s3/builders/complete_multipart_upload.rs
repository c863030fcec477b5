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

use crate::s3::builders::ObjectContent;
use crate::s3::client::Client;
use crate::s3::error::ValidationErr;
use crate::s3::header_constants::CONTENT_TYPE;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response::CompleteMultipartUploadResponse;
use crate::s3::types::{BucketName, ObjectKey, Part, S3Api, S3Request, ToS3Request, UploadId};
use bytes::{BufMut, BytesMut};
use http::Method;

/// Checks a completion manifest: non-empty, part numbers in `[1, max_parts]`,
/// unique and ascending.
pub(crate) fn check_parts(parts: &[Part], max_parts: u16) -> Result<(), ValidationErr> {
    if parts.is_empty() {
        return Err(ValidationErr::EmptyParts("parts cannot be empty".into()));
    }
    let mut previous: Option<u16> = None;
    for part in parts {
        if part.number < 1 || part.number > max_parts {
            return Err(ValidationErr::InvalidPartNumber {
                number: part.number as u32,
                max: max_parts,
            });
        }
        if let Some(prev) = previous
            && part.number <= prev
        {
            return Err(ValidationErr::InvalidPartOrder {
                previous: prev,
                current: part.number,
            });
        }
        previous = Some(part.number);
    }
    Ok(())
}

/// Argument builder for the [`CompleteMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CompleteMultipartUpload.html) S3 API operation.
#[derive(Clone, Debug)]
pub struct CompleteMultipartUpload {
    client: Client,

    extra_headers: Option<Multimap>,
    extra_query_params: Option<Multimap>,
    bucket: String,
    object: String,
    upload_id: String,
    parts: Vec<Part>,
}

impl CompleteMultipartUpload {
    pub fn new(
        client: Client,
        bucket: String,
        object: String,
        upload_id: String,
        parts: Vec<Part>,
    ) -> Self {
        Self {
            client,
            extra_headers: None,
            extra_query_params: None,
            bucket,
            object,
            upload_id,
            parts,
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

impl S3Api for CompleteMultipartUpload {
    type S3Response = CompleteMultipartUploadResponse;
}

impl ToS3Request for CompleteMultipartUpload {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        let bucket = BucketName::new(self.bucket)?;
        let object = ObjectKey::new(self.object)?;
        let upload_id = UploadId::new(self.upload_id)?;
        check_parts(&self.parts, self.client.limits().max_parts)?;

        // Set capacity of the byte-buffer based on the part count - attempting
        // to avoid extra allocations when building the XML payload.
        let mut data = BytesMut::with_capacity(100 * self.parts.len() + 100);
        data.put_slice(b"<CompleteMultipartUpload>");
        for part in self.parts.iter() {
            data.put_slice(b"<Part><PartNumber>");
            data.put_slice(part.number.to_string().as_bytes());
            data.put_slice(b"</PartNumber><ETag>");
            data.put_slice(part.etag.as_bytes());
            data.put_slice(b"</ETag></Part>");
        }
        data.put_slice(b"</CompleteMultipartUpload>");

        let mut headers: Multimap = self.extra_headers.unwrap_or_default();
        headers.add(CONTENT_TYPE, "application/xml");

        let mut query_params: Multimap = self.extra_query_params.unwrap_or_default();
        query_params.add("uploadId", upload_id.into_inner());

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::POST)
            .bucket(bucket)
            .object(object)
            .query_params(query_params)
            .headers(headers)
            .body(ObjectContent::from(data.freeze()))
            .content_md5(true)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_parts() {
        assert!(check_parts(&[Part::new(1, "a"), Part::new(2, "b")], 10_000).is_ok());
        assert!(check_parts(&[Part::new(1, "a"), Part::new(3, "b")], 10_000).is_ok());

        assert!(matches!(
            check_parts(&[], 10_000),
            Err(ValidationErr::EmptyParts(_))
        ));
        assert!(matches!(
            check_parts(&[Part::new(0, "a")], 10_000),
            Err(ValidationErr::InvalidPartNumber { number: 0, .. })
        ));
        assert!(matches!(
            check_parts(&[Part::new(10_001, "a")], 10_000),
            Err(ValidationErr::InvalidPartNumber { number: 10_001, .. })
        ));
        assert!(matches!(
            check_parts(&[Part::new(2, "a"), Part::new(1, "b")], 10_000),
            Err(ValidationErr::InvalidPartOrder {
                previous: 2,
                current: 1
            })
        ));
        assert!(matches!(
            check_parts(&[Part::new(1, "a"), Part::new(1, "b")], 10_000),
            Err(ValidationErr::InvalidPartOrder { .. })
        ));
    }
}
