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

//! Translation of S3 error responses into [`Error`] values.

use crate::s3::error::{Error, ErrorKind, S3ServerError};
use crate::s3::header_constants::{X_AMZ_ID_2, X_AMZ_REQUEST_ID};
use crate::s3::utils::{get_text_default, get_text_option};
use bytes::{Buf, Bytes};
use http::{HeaderMap, Method};
use std::convert::Infallible;
use std::str::FromStr;
use xmltree::Element;

/// Maximum number of body bytes kept in a [`S3ServerError::ServerError`].
pub const BODY_EXCERPT_LEN: usize = 256;

/// Error codes as returned by the server in the `<Code>` element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum S3ErrorCode {
    #[default]
    NoError,
    /// The specified bucket does not exist
    NoSuchBucket,
    /// The specified key does not exist
    NoSuchKey,
    /// The specified multipart upload does not exist, or was aborted or completed
    NoSuchUpload,
    AccessDenied,
    /// The requested bucket name is not available
    BucketAlreadyExists,
    /// Your previous request to create the named bucket succeeded and you already own it
    BucketAlreadyOwnedByYou,
    /// The bucket you tried to delete is not empty
    BucketNotEmpty,
    InvalidArgument,
    InvalidBucketName,
    /// One or more of the specified parts could not be found, or the ETag did not match
    InvalidPart,
    /// The list of parts was not in ascending order
    InvalidPartOrder,
    InvalidRange,
    EntityTooLarge,
    EntityTooSmall,
    MethodNotAllowed,
    ResourceNotFound,
    ResourceConflict,
    BadRequest,
    InternalError,
    SlowDown,

    /// Any code not explicitly listed above
    OtherError(String),
}

impl S3ErrorCode {
    /// Maps the server code onto the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            S3ErrorCode::NoSuchBucket => ErrorKind::NoSuchBucket,
            S3ErrorCode::NoSuchKey => ErrorKind::NoSuchKey,
            S3ErrorCode::NoSuchUpload => ErrorKind::NoSuchUpload,
            S3ErrorCode::AccessDenied => ErrorKind::AccessDenied,
            S3ErrorCode::BucketAlreadyExists | S3ErrorCode::BucketAlreadyOwnedByYou => {
                ErrorKind::BucketAlreadyExists
            }
            S3ErrorCode::BucketNotEmpty => ErrorKind::BucketNotEmpty,
            S3ErrorCode::InvalidArgument
            | S3ErrorCode::InvalidBucketName
            | S3ErrorCode::InvalidPart
            | S3ErrorCode::InvalidPartOrder
            | S3ErrorCode::InvalidRange
            | S3ErrorCode::EntityTooSmall => ErrorKind::InvalidArgument,
            S3ErrorCode::EntityTooLarge => ErrorKind::EntityTooLarge,
            _ => ErrorKind::ServerError,
        }
    }
}

impl FromStr for S3ErrorCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "" | "noerror" => S3ErrorCode::NoError,
            "nosuchbucket" => S3ErrorCode::NoSuchBucket,
            "nosuchkey" => S3ErrorCode::NoSuchKey,
            "nosuchupload" => S3ErrorCode::NoSuchUpload,
            "accessdenied" => S3ErrorCode::AccessDenied,
            "bucketalreadyexists" => S3ErrorCode::BucketAlreadyExists,
            "bucketalreadyownedbyyou" => S3ErrorCode::BucketAlreadyOwnedByYou,
            "bucketnotempty" => S3ErrorCode::BucketNotEmpty,
            "invalidargument" => S3ErrorCode::InvalidArgument,
            "invalidbucketname" => S3ErrorCode::InvalidBucketName,
            "invalidpart" => S3ErrorCode::InvalidPart,
            "invalidpartorder" => S3ErrorCode::InvalidPartOrder,
            "invalidrange" => S3ErrorCode::InvalidRange,
            "entitytoolarge" => S3ErrorCode::EntityTooLarge,
            "entitytoosmall" => S3ErrorCode::EntityTooSmall,
            "methodnotallowed" => S3ErrorCode::MethodNotAllowed,
            "resourcenotfound" => S3ErrorCode::ResourceNotFound,
            "resourceconflict" => S3ErrorCode::ResourceConflict,
            "badrequest" => S3ErrorCode::BadRequest,
            "internalerror" => S3ErrorCode::InternalError,
            "slowdown" => S3ErrorCode::SlowDown,
            _ => S3ErrorCode::OtherError(s.to_owned()),
        })
    }
}

impl std::fmt::Display for S3ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            S3ErrorCode::OtherError(code) => write!(f, "{code}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Typed error document returned by the server for a failed operation.
#[derive(Clone, Debug)]
pub struct S3ErrorResponse {
    http_status_code: u16,
    code: S3ErrorCode,
    message: Option<String>,
    headers: HeaderMap,
    resource: String,
    request_id: String,
    host_id: String,
    bucket_name: Option<String>,
    object_name: Option<String>,
}

impl S3ErrorResponse {
    pub fn new(
        http_status_code: u16,
        headers: HeaderMap,
        code: S3ErrorCode,
        message: Option<String>,
        resource: String,
        request_id: String,
        host_id: String,
        bucket_name: Option<String>,
        object_name: Option<String>,
    ) -> Self {
        Self {
            http_status_code,
            headers,
            code,
            message,
            resource,
            request_id,
            host_id,
            bucket_name,
            object_name,
        }
    }

    /// Decodes an `<Error>` document. Returns `None` when the body is not XML
    /// or its root element is not `Error`.
    pub fn from_body(http_status_code: u16, body: &Bytes, headers: HeaderMap) -> Option<Self> {
        let root = Element::parse(body.clone().reader()).ok()?;
        if root.name != "Error" {
            return None;
        }
        let mut request_id = get_text_default(&root, "RequestId");
        if request_id.is_empty() {
            request_id = header_text(&headers, X_AMZ_REQUEST_ID);
        }
        let mut host_id = get_text_default(&root, "HostId");
        if host_id.is_empty() {
            host_id = header_text(&headers, X_AMZ_ID_2);
        }
        let code = match S3ErrorCode::from_str(&get_text_default(&root, "Code")) {
            Ok(v) => v,
            Err(e) => match e {},
        };
        Some(Self {
            http_status_code,
            code,
            message: get_text_option(&root, "Message"),
            resource: get_text_default(&root, "Resource"),
            request_id,
            host_id,
            bucket_name: get_text_option(&root, "BucketName"),
            object_name: get_text_option(&root, "Key"),
            headers,
        })
    }

    pub fn http_status_code(&self) -> u16 {
        self.http_status_code
    }
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
    pub fn code(&self) -> &S3ErrorCode {
        &self.code
    }
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
    pub fn resource(&self) -> &str {
        &self.resource
    }
    pub fn request_id(&self) -> &str {
        &self.request_id
    }
    pub fn host_id(&self) -> &str {
        &self.host_id
    }
    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket_name.as_deref()
    }
    pub fn object_name(&self) -> Option<&str> {
        self.object_name.as_deref()
    }
}

impl std::fmt::Display for S3ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "S3 operation failed; status: {}, code: {}, message: {}, resource: {}, request_id: {}, host_id: {}, bucket_name: {}, object_name: {}",
            self.http_status_code,
            self.code,
            self.message.as_deref().unwrap_or_default(),
            self.resource,
            self.request_id,
            self.host_id,
            self.bucket_name.as_deref().unwrap_or_default(),
            self.object_name.as_deref().unwrap_or_default(),
        )
    }
}

impl std::error::Error for S3ErrorResponse {}

fn header_text(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn body_excerpt(body: &Bytes) -> String {
    let end = body.len().min(BODY_EXCERPT_LEN);
    String::from_utf8_lossy(&body[..end]).into_owned()
}

/// Converts a non-2xx response into exactly one [`Error`].
///
/// XML error documents are decoded as-is. Empty bodies (e.g. HEAD responses)
/// are classified by status code; anything else becomes a generic
/// [`S3ServerError::ServerError`] carrying the status and a body excerpt.
pub(crate) fn error_from_response(
    http_status_code: u16,
    headers: HeaderMap,
    body: Bytes,
    method: &Method,
    resource: &str,
    bucket_name: Option<&str>,
    object_name: Option<&str>,
) -> Error {
    if !body.is_empty() {
        return match S3ErrorResponse::from_body(http_status_code, &body, headers.clone()) {
            Some(er) => er.into(),
            None => S3ServerError::ServerError {
                http_status_code,
                request_id: header_text(&headers, X_AMZ_REQUEST_ID),
                body_excerpt: body_excerpt(&body),
            }
            .into(),
        };
    }

    let (code, message): (S3ErrorCode, &str) = match http_status_code {
        400 => (S3ErrorCode::BadRequest, "Bad request"),
        403 => (S3ErrorCode::AccessDenied, "Access denied"),
        404 => match (object_name, bucket_name) {
            (Some(_), _) => (S3ErrorCode::NoSuchKey, "Object does not exist"),
            (None, Some(_)) => (S3ErrorCode::NoSuchBucket, "Bucket does not exist"),
            (None, None) => (S3ErrorCode::ResourceNotFound, "Request resource not found"),
        },
        405 | 501 => (
            S3ErrorCode::MethodNotAllowed,
            "The specified method is not allowed against this resource",
        ),
        409 => match (method, object_name, bucket_name) {
            (&Method::PUT, None, Some(_)) => (
                S3ErrorCode::BucketAlreadyExists,
                "The requested bucket name is not available",
            ),
            (&Method::DELETE, None, Some(_)) => {
                (S3ErrorCode::BucketNotEmpty, "The bucket is not empty")
            }
            _ => (S3ErrorCode::ResourceConflict, "Request resource conflicts"),
        },
        413 => (
            S3ErrorCode::EntityTooLarge,
            "Your proposed upload exceeds the maximum allowed object size",
        ),
        _ => {
            return S3ServerError::ServerError {
                http_status_code,
                request_id: header_text(&headers, X_AMZ_REQUEST_ID),
                body_excerpt: String::new(),
            }
            .into();
        }
    };

    let request_id = header_text(&headers, X_AMZ_REQUEST_ID);
    let host_id = header_text(&headers, X_AMZ_ID_2);
    S3ErrorResponse::new(
        http_status_code,
        headers,
        code,
        Some(message.to_string()),
        resource.to_string(),
        request_id,
        host_id,
        bucket_name.map(String::from),
        object_name.map(String::from),
    )
    .into()
}

/// S3 may answer some requests (CompleteMultipartUpload in particular) with
/// `200 OK` and an `<Error>` document in the body. Returns that error, if any.
pub(crate) fn error_in_success_body(
    http_status_code: u16,
    headers: &HeaderMap,
    body: &Bytes,
) -> Option<Error> {
    S3ErrorResponse::from_body(http_status_code, body, headers.clone()).map(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    const ALL_CODES: &[S3ErrorCode] = &[
        S3ErrorCode::NoSuchBucket,
        S3ErrorCode::NoSuchKey,
        S3ErrorCode::NoSuchUpload,
        S3ErrorCode::AccessDenied,
        S3ErrorCode::BucketAlreadyExists,
        S3ErrorCode::BucketAlreadyOwnedByYou,
        S3ErrorCode::BucketNotEmpty,
        S3ErrorCode::InvalidArgument,
        S3ErrorCode::InvalidBucketName,
        S3ErrorCode::InvalidPart,
        S3ErrorCode::InvalidPartOrder,
        S3ErrorCode::InvalidRange,
        S3ErrorCode::EntityTooLarge,
        S3ErrorCode::EntityTooSmall,
        S3ErrorCode::MethodNotAllowed,
        S3ErrorCode::ResourceNotFound,
        S3ErrorCode::ResourceConflict,
        S3ErrorCode::BadRequest,
        S3ErrorCode::InternalError,
        S3ErrorCode::SlowDown,
    ];

    #[test]
    fn test_error_code_roundtrip() {
        for code in ALL_CODES {
            let s = code.to_string();
            let parsed: S3ErrorCode = s.parse().unwrap();
            assert_eq!(&parsed, code, "code {code} -> '{s}' -> {parsed}");
        }
        let other: S3ErrorCode = "XAmzContentSHA256Mismatch".parse().unwrap();
        assert_eq!(
            other,
            S3ErrorCode::OtherError("XAmzContentSHA256Mismatch".into())
        );
        assert_eq!(other.kind(), ErrorKind::ServerError);
    }

    #[test]
    fn test_parse_xml_error_body() {
        let body = Bytes::from_static(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
              <Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message>\
              <Key>a.txt</Key><BucketName>bucket1</BucketName><Resource>/bucket1/a.txt</Resource>\
              <RequestId>17A1B2C3</RequestId><HostId>host-1</HostId></Error>",
        );
        let err = error_from_response(
            404,
            HeaderMap::new(),
            body,
            &Method::GET,
            "/bucket1/a.txt",
            Some("bucket1"),
            Some("a.txt"),
        );
        assert_eq!(err.kind(), ErrorKind::NoSuchKey);
        assert_eq!(err.request_id(), Some("17A1B2C3"));
        assert_eq!(err.http_status(), Some(404));
        let er = err.s3_error_response().unwrap();
        assert_eq!(er.message(), Some("The specified key does not exist."));
        assert_eq!(er.resource(), "/bucket1/a.txt");
        assert_eq!(er.object_name(), Some("a.txt"));
    }

    #[test]
    fn test_unparseable_body_is_server_error() {
        let mut headers = HeaderMap::new();
        headers.insert(X_AMZ_REQUEST_ID, HeaderValue::from_static("REQ-9"));
        let body = Bytes::from("User-agent: go\nDisallow: /something/".repeat(20));
        let err = error_from_response(
            500,
            headers,
            body,
            &Method::GET,
            "/",
            None,
            None,
        );
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert_eq!(err.http_status(), Some(500));
        assert_eq!(err.request_id(), Some("REQ-9"));
        match err {
            Error::S3Server(S3ServerError::ServerError { body_excerpt, .. }) => {
                assert!(body_excerpt.starts_with("User-agent: go"));
                assert_eq!(body_excerpt.len(), BODY_EXCERPT_LEN);
            }
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[test]
    fn test_empty_body_mapping_by_status() {
        let head = |status, bucket: Option<&str>, object: Option<&str>, method: &Method| {
            error_from_response(
                status,
                HeaderMap::new(),
                Bytes::new(),
                method,
                "/",
                bucket,
                object,
            )
            .kind()
        };
        assert_eq!(
            head(404, Some("b1"), Some("k"), &Method::HEAD),
            ErrorKind::NoSuchKey
        );
        assert_eq!(
            head(404, Some("b1"), None, &Method::HEAD),
            ErrorKind::NoSuchBucket
        );
        assert_eq!(head(403, Some("b1"), None, &Method::GET), ErrorKind::AccessDenied);
        assert_eq!(
            head(409, Some("b1"), None, &Method::PUT),
            ErrorKind::BucketAlreadyExists
        );
        assert_eq!(
            head(409, Some("b1"), None, &Method::DELETE),
            ErrorKind::BucketNotEmpty
        );
        assert_eq!(
            head(413, Some("b1"), Some("k"), &Method::PUT),
            ErrorKind::EntityTooLarge
        );
        assert_eq!(head(503, None, None, &Method::GET), ErrorKind::ServerError);
    }

    #[test]
    fn test_error_in_success_body() {
        let body = Bytes::from_static(
            b"<Error><Code>InternalError</Code><Message>We encountered an internal error.</Message></Error>",
        );
        let err = error_in_success_body(200, &HeaderMap::new(), &body).unwrap();
        assert_eq!(err.kind(), ErrorKind::ServerError);

        let ok = Bytes::from_static(
            b"<CompleteMultipartUploadResult><ETag>\"abc-2\"</ETag></CompleteMultipartUploadResult>",
        );
        assert!(error_in_success_body(200, &HeaderMap::new(), &ok).is_none());
    }
}
