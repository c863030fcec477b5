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

//! Error definitions for S3 operations
//!
//! Every failure is reported as an [`Error`]. Callers branch on
//! [`Error::kind`], which collapses the detailed variants into the small
//! [`ErrorKind`] taxonomy.

use crate::s3::error_response::S3ErrorResponse;
use crate::s3::multipart::UploadState;
use std::fmt;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse error classification, sufficient to drive caller branching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Local validation failed; no network call was made. Also used for
    /// server codes that reject a request argument (e.g. `InvalidPart`).
    InvalidArgument,
    /// Connection or timeout failure after the retry budget was exhausted.
    TransportError,
    NoSuchBucket,
    NoSuchKey,
    NoSuchUpload,
    BucketAlreadyExists,
    BucketNotEmpty,
    AccessDenied,
    EntityTooLarge,
    /// Operation is not allowed in the current multipart upload state.
    InvalidState,
    /// Catch-all for unrecognized non-2xx responses and malformed bodies.
    ServerError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Errors detected locally, before any request is sent.
#[derive(Error, Debug)]
pub enum ValidationErr {
    #[error("invalid bucket name '{name}': {reason}")]
    InvalidBucketName { name: String, reason: String },

    #[error("invalid object name: {0}")]
    InvalidObjectName(String),

    #[error("invalid upload ID: {0}")]
    InvalidUploadId(String),

    #[error("part number {number} is out of range [1, {max}]")]
    InvalidPartNumber { number: u32, max: u16 },

    #[error("{0}")]
    EmptyParts(String),

    #[error("part numbers must be unique and ascending; part {current} follows part {previous}")]
    InvalidPartOrder { previous: u16, current: u16 },

    #[error("ETag mismatch for part {part_number}; uploaded: {recorded}, listed: {listed}")]
    PartEtagMismatch {
        part_number: u16,
        recorded: String,
        listed: String,
    },

    #[error("invalid range {start}-{end}; start must not exceed end")]
    InvalidRange { start: u64, end: u64 },

    #[error("range length must be greater than zero")]
    EmptyRange,

    #[error("range of {length} bytes at offset {offset} exceeds the maximum object offset")]
    RangeOverflow { offset: u64, length: u64 },

    #[error("object size {size} exceeds the single upload limit of {limit} bytes")]
    EntityTooLarge { size: u64, limit: u64 },

    #[error("content length is unknown; a single upload requires a known size")]
    ContentLengthUnknown,

    #[error("content length mismatch; declared {declared} bytes, got {actual} bytes")]
    ContentLengthMismatch { declared: u64, actual: u64 },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("URL build error: {0}")]
    UrlBuildError(String),

    #[error("invalid URI: {0}")]
    InvalidUrl(#[from] http::uri::InvalidUri),

    #[error("region must be {bucket_region}, but passed {region}")]
    RegionMismatch {
        bucket_region: String,
        region: String,
    },

    #[error("HTTP client could not be created: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failures of the network layer.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("invalid HTTP request: {0}")]
    InvalidRequest(String),
}

impl NetworkError {
    /// Returns true for connection level failures that are worth retrying:
    /// connect errors, timeouts and requests that failed in flight.
    pub fn is_transient(&self) -> bool {
        match self {
            NetworkError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            NetworkError::Connection { .. } | NetworkError::Timeout { .. } => true,
            NetworkError::InvalidRequest(_) => false,
        }
    }
}

/// Errors reported by, or decoded from, the server.
#[derive(Error, Debug)]
pub enum S3ServerError {
    #[error("{0}")]
    S3Error(Box<S3ErrorResponse>),

    #[error(
        "server failed with HTTP status code {http_status_code}; request_id: {request_id}; body: {body_excerpt}"
    )]
    ServerError {
        http_status_code: u16,
        request_id: String,
        body_excerpt: String,
    },

    #[error("invalid server response: {message}")]
    InvalidServerResponse { message: String },

    #[error("malformed XML in server response: {0}")]
    Xml(#[from] xmltree::ParseError),

    #[error("invalid date in server response: {0}")]
    InvalidDate(#[from] chrono::ParseError),
}

/// Error type for all S3 operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErr),

    #[error("operation '{operation}' is not allowed for upload {upload_id} in state {state}")]
    InvalidState {
        upload_id: String,
        state: UploadState,
        operation: &'static str,
    },

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("S3 server error: {0}")]
    S3Server(#[from] S3ServerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(ValidationErr::EntityTooLarge { .. }) => ErrorKind::EntityTooLarge,
            Error::Validation(_) => ErrorKind::InvalidArgument,
            Error::InvalidState { .. } => ErrorKind::InvalidState,
            Error::Network(_) | Error::Io(_) => ErrorKind::TransportError,
            Error::S3Server(S3ServerError::S3Error(er)) => er.code().kind(),
            Error::S3Server(_) => ErrorKind::ServerError,
        }
    }

    /// Returns the server-side request ID, when the server sent one.
    pub fn request_id(&self) -> Option<&str> {
        let id = match self {
            Error::S3Server(S3ServerError::S3Error(er)) => er.request_id(),
            Error::S3Server(S3ServerError::ServerError { request_id, .. }) => request_id.as_str(),
            _ => "",
        };
        (!id.is_empty()).then_some(id)
    }

    /// Returns the HTTP status code of the failed response, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::S3Server(S3ServerError::S3Error(er)) => Some(er.http_status_code()),
            Error::S3Server(S3ServerError::ServerError {
                http_status_code, ..
            }) => Some(*http_status_code),
            _ => None,
        }
    }

    /// Returns the decoded S3 error document, if this error carries one.
    pub fn s3_error_response(&self) -> Option<&S3ErrorResponse> {
        match self {
            Error::S3Server(S3ServerError::S3Error(er)) => Some(er),
            _ => None,
        }
    }

    /// Returns true when a transport retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(e) if e.is_transient())
    }

    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        Error::S3Server(S3ServerError::InvalidServerResponse {
            message: message.into(),
        })
    }
}

impl From<S3ErrorResponse> for Error {
    fn from(er: S3ErrorResponse) -> Self {
        Error::S3Server(S3ServerError::S3Error(Box::new(er)))
    }
}

impl From<xmltree::ParseError> for Error {
    fn from(err: xmltree::ParseError) -> Self {
        Error::S3Server(S3ServerError::Xml(err))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Self {
        Error::S3Server(S3ServerError::InvalidDate(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Error::invalid_response(format!("header value is not valid ASCII: {err}"))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::invalid_response(format!("invalid integer: {err}"))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(NetworkError::Http(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Error::Validation(ValidationErr::InvalidUrl(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_invalid_argument() {
        let e: Error = ValidationErr::InvalidObjectName("empty".into()).into();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        assert!(e.request_id().is_none());
        assert!(e.http_status().is_none());
    }

    #[test]
    fn test_entity_too_large_kind() {
        let e: Error = ValidationErr::EntityTooLarge { size: 10, limit: 5 }.into();
        assert_eq!(e.kind(), ErrorKind::EntityTooLarge);
    }

    #[test]
    fn test_network_errors_are_transport_errors() {
        let e: Error = NetworkError::Timeout {
            url: "http://localhost:9000/".into(),
        }
        .into();
        assert_eq!(e.kind(), ErrorKind::TransportError);
        assert!(e.is_transient());

        let e: Error = NetworkError::InvalidRequest("bad header".into()).into();
        assert_eq!(e.kind(), ErrorKind::TransportError);
        assert!(!e.is_transient());
    }

    #[test]
    fn test_server_error_carries_status_and_request_id() {
        let e: Error = S3ServerError::ServerError {
            http_status_code: 502,
            request_id: "REQ1".into(),
            body_excerpt: "<html>".into(),
        }
        .into();
        assert_eq!(e.kind(), ErrorKind::ServerError);
        assert_eq!(e.http_status(), Some(502));
        assert_eq!(e.request_id(), Some("REQ1"));
    }

    #[test]
    fn test_invalid_state_kind() {
        let e = Error::InvalidState {
            upload_id: "u1".into(),
            state: UploadState::Completed,
            operation: "upload_part",
        };
        assert_eq!(e.kind(), ErrorKind::InvalidState);
        assert!(e.to_string().contains("Completed"));
    }
}
