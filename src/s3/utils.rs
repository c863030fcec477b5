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

//! Various utility and helper functions

use crate::s3::error::{Error, ValidationErr};
use crate::s3::segmented_bytes::SegmentedBytes;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::{Buf, Bytes};
use chrono::{DateTime, NaiveDateTime, ParseError, Utc};
use lazy_static::lazy_static;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use xmltree::Element;

/// Date and time with UTC timezone
pub type UtcTime = DateTime<Utc>;

/// SHA256 hash of an empty payload
pub const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Payload hash sent when the body is streamed and cannot be hashed up front
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Maximum length in bytes of an object key
pub const MAX_OBJECT_NAME_LEN: usize = 1024;

/// Percent-encodes a string per RFC 3986 (unreserved characters are kept).
pub fn url_encode(s: &str) -> Cow<'_, str> {
    urlencoding::encode(s)
}

/// Decodes a percent-encoded string; returns the input unchanged if it is not valid.
pub fn url_decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

const OBJECT_KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Percent-encodes an object key for use in a URL path; `/` is preserved.
pub fn urlencode_object_key(key: &str) -> String {
    utf8_percent_encode(key, OBJECT_KEY_ENCODE_SET).collect()
}

/// Encodes data using base64 algorithm
pub fn b64encode<T: AsRef<[u8]>>(input: T) -> String {
    BASE64.encode(input)
}

/// Gets hex encoded SHA256 hash of given data
pub fn sha256_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Gets hex encoded SHA256 hash of all segments
pub fn sha256_hash_sb(sb: &SegmentedBytes) -> String {
    let mut hasher = Sha256::new();
    for data in sb.iter() {
        hasher.update(data);
    }
    hex::encode(hasher.finalize())
}

/// Gets base64 encoded MD5 hash of all segments
pub fn md5sum_hash_sb(sb: &SegmentedBytes) -> String {
    let mut hasher = md5::Context::new();
    for data in sb.iter() {
        hasher.consume(data);
    }
    b64encode(hasher.finalize().as_slice())
}

/// Gets signer date value of given time
pub fn to_signer_date(time: UtcTime) -> String {
    time.format("%Y%m%d").to_string()
}

/// Gets AMZ date value of given time
pub fn to_amz_date(time: UtcTime) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Gets HTTP header value (RFC 7231 IMF-fixdate) of given time
pub fn to_http_header_value(time: UtcTime) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses HTTP header value to time
pub fn from_http_header_value(s: &str) -> Result<UtcTime, ParseError> {
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(
        NaiveDateTime::parse_from_str(s, "%a, %d %b %Y %H:%M:%S GMT")?,
        Utc,
    ))
}

/// Gets ISO8601 UTC formatted value of given time
pub fn to_iso8601utc(time: UtcTime) -> String {
    time.format("%Y-%m-%dT%H:%M:%S.%3fZ").to_string()
}

/// Parses ISO8601 UTC formatted value to time
pub fn from_iso8601utc(s: &str) -> Result<UtcTime, ParseError> {
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(
        match NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S.%3fZ") {
            Ok(d) => d,
            _ => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ")?,
        },
        Utc,
    ))
}

/// Strips surrounding double quotes, as found in ETag values.
pub fn trim_quotes(mut s: String) -> String {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s.drain(0..1);
        s.pop();
    }
    s
}

/// Checks if given hostname is valid or not
pub fn match_hostname(value: &str) -> bool {
    lazy_static! {
        static ref HOSTNAME_REGEX: Regex =
            Regex::new(r"^([a-z_\d-]{1,63}\.)*([a-z_\d-]{1,63})$").unwrap();
    }

    if !HOSTNAME_REGEX.is_match(value.to_lowercase().as_str()) {
        return false;
    }

    !value.split('.').any(|token| {
        token.starts_with('-')
            || token.starts_with('_')
            || token.ends_with('-')
            || token.ends_with('_')
    })
}

fn invalid_bucket(bucket_name: &str, reason: &str) -> ValidationErr {
    ValidationErr::InvalidBucketName {
        name: bucket_name.to_string(),
        reason: reason.to_string(),
    }
}

/// Validates given bucket name.
///
/// Strict mode enforces the rules for creating new buckets (lowercase letters,
/// digits, `.` and `-` only); relaxed mode additionally accepts legacy names
/// containing uppercase letters, `_` or `:`.
pub fn check_bucket_name(bucket_name: &str, strict: bool) -> Result<(), ValidationErr> {
    if bucket_name.trim().is_empty() {
        return Err(invalid_bucket(bucket_name, "bucket name cannot be empty"));
    }

    if bucket_name.len() < 3 {
        return Err(invalid_bucket(
            bucket_name,
            "bucket name cannot be less than 3 characters",
        ));
    }

    if bucket_name.len() > 63 {
        return Err(invalid_bucket(
            bucket_name,
            "bucket name cannot be greater than 63 characters",
        ));
    }

    lazy_static! {
        static ref IPV4_REGEX: Regex = Regex::new(r"^((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])\.){3}(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])$").unwrap();
        static ref VALID_BUCKET_NAME_REGEX: Regex =
            Regex::new("^[A-Za-z0-9][A-Za-z0-9\\.\\-_:]{1,61}[A-Za-z0-9]$").unwrap();
        static ref VALID_BUCKET_NAME_STRICT_REGEX: Regex =
            Regex::new("^[a-z0-9][a-z0-9\\.\\-]{1,61}[a-z0-9]$").unwrap();
    }

    if IPV4_REGEX.is_match(bucket_name) {
        return Err(invalid_bucket(
            bucket_name,
            "bucket name cannot be an IP address",
        ));
    }

    if bucket_name.contains("..") || bucket_name.contains(".-") || bucket_name.contains("-.") {
        return Err(invalid_bucket(
            bucket_name,
            "bucket name contains invalid successive characters '..', '.-' or '-.'",
        ));
    }

    if strict {
        if !VALID_BUCKET_NAME_STRICT_REGEX.is_match(bucket_name) {
            return Err(invalid_bucket(
                bucket_name,
                "bucket name does not follow S3 standards strictly",
            ));
        }
    } else if !VALID_BUCKET_NAME_REGEX.is_match(bucket_name) {
        return Err(invalid_bucket(
            bucket_name,
            "bucket name does not follow S3 standards",
        ));
    }

    Ok(())
}

/// Validates given object name: non-empty and at most 1024 bytes.
pub fn check_object_name(object_name: &str) -> Result<(), ValidationErr> {
    if object_name.is_empty() {
        return Err(ValidationErr::InvalidObjectName(
            "object name cannot be empty".into(),
        ));
    }
    if object_name.len() > MAX_OBJECT_NAME_LEN {
        return Err(ValidationErr::InvalidObjectName(format!(
            "object name cannot be greater than {MAX_OBJECT_NAME_LEN} bytes; got {}",
            object_name.len()
        )));
    }
    Ok(())
}

/// Validates given multipart upload ID.
pub fn check_upload_id(upload_id: &str) -> Result<(), ValidationErr> {
    if upload_id.trim().is_empty() {
        return Err(ValidationErr::InvalidUploadId(
            "upload ID cannot be empty".into(),
        ));
    }
    Ok(())
}

/// Parses a response body as an XML document.
pub fn parse_xml(body: &Bytes) -> Result<Element, Error> {
    Ok(Element::parse(body.clone().reader())?)
}

/// Gets text value of given XML element for given tag.
pub fn get_text(element: &Element, tag: &str) -> Result<String, Error> {
    element
        .get_child(tag)
        .ok_or_else(|| Error::invalid_response(format!("<{tag}> tag not found")))
        .map(|v| v.get_text().unwrap_or_default().to_string())
}

/// Gets text value of given XML element for given tag, or an empty string.
pub fn get_text_default(element: &Element, tag: &str) -> String {
    element
        .get_child(tag)
        .and_then(|v| v.get_text())
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// Gets text value of given XML element for given tag, if present.
pub fn get_text_option(element: &Element, tag: &str) -> Option<String> {
    element
        .get_child(tag)
        .and_then(|v| v.get_text())
        .map(|v| v.to_string())
}
