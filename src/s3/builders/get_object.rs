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
use crate::s3::header_constants::RANGE;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response::GetObjectResponse;
use crate::s3::types::{BucketName, ObjectKey, S3Api, S3Request, ToS3Request};
use http::Method;

/// Argument builder for the [`GetObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetObject.html) S3 API operation.
///
/// A byte range is selected either with [`range`](GetObject::range)
/// (inclusive bounds) or with [`offset`](GetObject::offset) and
/// [`length`](GetObject::length); `range` takes precedence.
#[derive(Clone, Debug)]
pub struct GetObject {
    client: Client,

    extra_headers: Option<Multimap>,
    extra_query_params: Option<Multimap>,
    bucket: String,
    object: String,
    range: Option<(u64, u64)>,
    offset: Option<u64>,
    length: Option<u64>,
}

impl GetObject {
    pub fn new(client: Client, bucket: String, object: String) -> Self {
        Self {
            client,
            extra_headers: None,
            extra_query_params: None,
            bucket,
            object,
            range: None,
            offset: None,
            length: None,
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

    /// Selects bytes `start..=end`.
    pub fn range(mut self, start: u64, end: u64) -> Self {
        self.range = Some((start, end));
        self
    }

    pub fn offset(mut self, offset: Option<u64>) -> Self {
        self.offset = offset;
        self
    }

    pub fn length(mut self, length: Option<u64>) -> Self {
        self.length = length;
        self
    }

    fn get_range_header_value(&self) -> Result<Option<String>, ValidationErr> {
        if let Some((start, end)) = self.range {
            if start > end {
                return Err(ValidationErr::InvalidRange { start, end });
            }
            return Ok(Some(format!("bytes={start}-{end}")));
        }

        let (offset, length) = match self.length {
            Some(_) => (Some(self.offset.unwrap_or(0)), self.length),
            None => (self.offset, None),
        };

        Ok(match (offset, length) {
            (Some(_), Some(0)) => return Err(ValidationErr::EmptyRange),
            (Some(o), Some(l)) => {
                let end = o
                    .checked_add(l - 1)
                    .ok_or(ValidationErr::RangeOverflow { offset: o, length: l })?;
                Some(format!("bytes={o}-{end}"))
            }
            (Some(o), None) => Some(format!("bytes={o}-")),
            (None, _) => None,
        })
    }
}

impl S3Api for GetObject {
    type S3Response = GetObjectResponse;
}

impl ToS3Request for GetObject {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        let bucket = BucketName::new(self.bucket.as_str())?;
        let object = ObjectKey::new(self.object.as_str())?;

        let range = self.get_range_header_value()?;
        let mut headers: Multimap = self.extra_headers.unwrap_or_default();
        if let Some(v) = range {
            headers.add(RANGE, v);
        }

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::GET)
            .bucket(bucket)
            .object(object)
            .query_params(self.extra_query_params.unwrap_or_default())
            .headers(headers)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::http::BaseUrl;

    fn builder() -> GetObject {
        let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
        let client = Client::builder(base_url).build().unwrap();
        GetObject::new(client, "bucket".into(), "object".into())
    }

    #[test]
    fn test_range_header_value() {
        assert_eq!(builder().get_range_header_value().unwrap(), None);
        assert_eq!(
            builder().range(0, 4).get_range_header_value().unwrap(),
            Some("bytes=0-4".to_string())
        );
        assert_eq!(
            builder().offset(Some(3)).get_range_header_value().unwrap(),
            Some("bytes=3-".to_string())
        );
        assert_eq!(
            builder().length(Some(5)).get_range_header_value().unwrap(),
            Some("bytes=0-4".to_string())
        );
        assert_eq!(
            builder()
                .offset(Some(10))
                .length(Some(10))
                .get_range_header_value()
                .unwrap(),
            Some("bytes=10-19".to_string())
        );
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            builder().range(5, 4).get_range_header_value(),
            Err(ValidationErr::InvalidRange { start: 5, end: 4 })
        ));
        assert!(matches!(
            builder().length(Some(0)).get_range_header_value(),
            Err(ValidationErr::EmptyRange)
        ));
        assert!(matches!(
            builder()
                .offset(Some(u64::MAX))
                .length(Some(2))
                .get_range_header_value(),
            Err(ValidationErr::RangeOverflow {
                offset: u64::MAX,
                length: 2
            })
        ));
        assert_eq!(
            builder()
                .offset(Some(u64::MAX))
                .length(Some(1))
                .get_range_header_value()
                .unwrap(),
            Some(format!("bytes={}-{}", u64::MAX, u64::MAX))
        );
    }
}
