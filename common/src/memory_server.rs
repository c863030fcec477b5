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

//! In-process S3 server.
//!
//! [`MemoryServer`] implements [`Transport`] and answers path-style requests
//! with the same XML documents and headers a real server sends, so the
//! client is exercised end to end without a network. Payload hashes
//! declared in `x-amz-content-sha256` are verified.

use crate::handler::RecordedRequest;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use chrono::Utc;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use objectstorage::s3::error::Error;
use objectstorage::s3::transport::{HttpRequest, RawResponse, Transport};
use objectstorage::s3::utils::{
    UNSIGNED_PAYLOAD, UtcTime, sha256_hash, to_http_header_value, to_iso8601utc, url_decode,
    url_encode,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use xmltree::{Element, XMLNode};

/// Smallest size of a part that is not the last one.
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

const DEFAULT_MAX_KEYS: usize = 1000;

#[derive(Clone, Debug)]
struct StoredObject {
    data: Bytes,
    etag: String,
    content_type: String,
    metadata: Vec<(String, String)>,
    last_modified: UtcTime,
}

#[derive(Debug, Default)]
struct BucketData {
    created: UtcTime,
    objects: BTreeMap<String, StoredObject>,
}

#[derive(Debug)]
struct StoredPart {
    data: Bytes,
    digest: md5::Digest,
    last_modified: UtcTime,
}

#[derive(Debug)]
struct PendingUpload {
    bucket: String,
    key: String,
    content_type: String,
    metadata: Vec<(String, String)>,
    parts: BTreeMap<u16, StoredPart>,
}

#[derive(Debug, Default)]
struct ServerState {
    buckets: BTreeMap<String, BucketData>,
    uploads: HashMap<String, PendingUpload>,
    requests: Vec<RecordedRequest>,
}

/// Fake S3 server holding buckets, objects and multipart uploads in memory.
#[derive(Debug, Default)]
pub struct MemoryServer {
    state: Mutex<ServerState>,
    next_id: AtomicU64,
}

struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Reply {
    fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    fn xml(status: u16, body: String) -> Self {
        Self::new(status)
            .header("Content-Type", "application/xml")
            .body(body)
    }

    fn error(status: u16, code: &str, message: &str, resource: &str) -> Self {
        Self::xml(
            status,
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Error><Code>{code}</Code>\
                 <Message>{}</Message><Resource>{}</Resource></Error>",
                escape(message),
                escape(resource),
            ),
        )
    }

    fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    fn into_response(self, request_id: String, head: bool) -> RawResponse {
        let mut headers = HeaderMap::new();
        let has_length = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"));
        let mut pairs = self.headers;
        if !has_length {
            pairs.push(("Content-Length".into(), self.body.len().to_string()));
        }
        pairs.push(("x-amz-request-id".into(), request_id));
        for (k, v) in pairs {
            if let (Ok(name), Ok(value)) = (HeaderName::try_from(k), HeaderValue::try_from(v)) {
                headers.append(name, value);
            }
        }
        let body = if head { Bytes::new() } else { self.body };
        RawResponse::from_bytes(self.status, headers, body)
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn quoted_hex(digest: &md5::Digest) -> String {
    format!("\"{digest:x}\"")
}

fn user_metadata(request: &RecordedRequest) -> Vec<(String, String)> {
    request
        .headers
        .iter_all()
        .filter(|(k, _)| k.to_ascii_lowercase().starts_with("x-amz-meta-"))
        .flat_map(|(k, vs)| vs.iter().map(move |v| (k.to_ascii_lowercase(), v.clone())))
        .collect()
}

fn content_type(request: &RecordedRequest) -> String {
    request
        .header("Content-Type")
        .unwrap_or("binary/octet-stream")
        .to_string()
}

/// Parses `bytes=a-b` or `bytes=a-` against an object of `len` bytes.
fn parse_range(value: &str, len: u64) -> Option<(u64, u64)> {
    let spec = value.strip_prefix("bytes=")?;
    let (start, end) = spec.split_once('-')?;
    let start: u64 = start.parse().ok()?;
    if start >= len {
        return None;
    }
    let end = match end {
        "" => len - 1,
        e => e.parse::<u64>().ok()?.min(len - 1),
    };
    (start <= end).then_some((start, end))
}

fn child_text(element: &Element, tag: &str) -> Option<String> {
    element
        .get_child(tag)
        .and_then(|e| e.get_text())
        .map(|t| t.into_owned())
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn object_data(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.lock()
            .buckets
            .get(bucket)?
            .objects
            .get(key)
            .map(|o| o.data.clone())
    }

    pub fn pending_uploads(&self) -> usize {
        self.lock().uploads.len()
    }

    fn handle(&self, request: &RecordedRequest) -> Reply {
        if let Some(declared) = request.header("x-amz-content-sha256")
            && declared != UNSIGNED_PAYLOAD
            && declared != sha256_hash(&request.body)
        {
            return Reply::error(
                400,
                "XAmzContentSHA256Mismatch",
                "The provided 'x-amz-content-sha256' header does not match what was computed.",
                &request.path,
            );
        }
        if let Some(length) = request.header("Content-Length")
            && length.parse::<usize>().ok() != Some(request.body.len())
        {
            return Reply::error(
                400,
                "IncompleteBody",
                "You did not provide the number of bytes specified by the Content-Length HTTP header.",
                &request.path,
            );
        }

        let path = request.path.trim_start_matches('/');
        let (bucket, key) = match path.split_once('/') {
            Some((b, k)) => (b.to_string(), url_decode(k)),
            None => (path.to_string(), String::new()),
        };

        let mut state = self.lock();
        match (bucket.is_empty(), key.is_empty()) {
            (true, _) if request.method == Method::GET => self.list_buckets(&state),
            (true, _) => Reply::error(405, "MethodNotAllowed", "Method not allowed", "/"),
            (false, true) => self.bucket_request(&mut state, request, &bucket),
            (false, false) => self.object_request(&mut state, request, &bucket, &key),
        }
    }

    fn list_buckets(&self, state: &ServerState) -> Reply {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <ListAllMyBucketsResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
             <Owner><ID>memory</ID><DisplayName>memory</DisplayName></Owner><Buckets>",
        );
        for (name, data) in &state.buckets {
            xml.push_str(&format!(
                "<Bucket><Name>{}</Name><CreationDate>{}</CreationDate></Bucket>",
                escape(name),
                to_iso8601utc(data.created)
            ));
        }
        xml.push_str("</Buckets></ListAllMyBucketsResult>");
        Reply::xml(200, xml)
    }

    fn bucket_request(
        &self,
        state: &mut ServerState,
        request: &RecordedRequest,
        bucket: &str,
    ) -> Reply {
        let resource = format!("/{bucket}");
        match request.method {
            Method::PUT => {
                if state.buckets.contains_key(bucket) {
                    return Reply::error(
                        409,
                        "BucketAlreadyOwnedByYou",
                        "Your previous request to create the named bucket succeeded and you already own it.",
                        &resource,
                    );
                }
                state.buckets.insert(
                    bucket.to_string(),
                    BucketData {
                        created: Utc::now(),
                        ..Default::default()
                    },
                );
                Reply::new(200).header("Location", resource)
            }
            Method::DELETE => match state.buckets.get(bucket) {
                None => no_such_bucket(&resource),
                Some(b) if !b.objects.is_empty() => Reply::error(
                    409,
                    "BucketNotEmpty",
                    "The bucket you tried to delete is not empty",
                    &resource,
                ),
                Some(_) => {
                    state.buckets.remove(bucket);
                    Reply::new(204)
                }
            },
            Method::HEAD => match state.buckets.contains_key(bucket) {
                true => Reply::new(200),
                false => Reply::new(404),
            },
            Method::GET => match state.buckets.get(bucket) {
                None => no_such_bucket(&resource),
                Some(b) => list_objects(bucket, b, request),
            },
            _ => Reply::error(405, "MethodNotAllowed", "Method not allowed", &resource),
        }
    }

    fn object_request(
        &self,
        state: &mut ServerState,
        request: &RecordedRequest,
        bucket: &str,
        key: &str,
    ) -> Reply {
        let resource = format!("/{bucket}/{key}");
        if !state.buckets.contains_key(bucket) {
            return match request.method {
                Method::HEAD => Reply::new(404),
                _ => no_such_bucket(&format!("/{bucket}")),
            };
        }

        let upload_id = request.query_param("uploadId").map(String::from);
        match (&request.method, upload_id) {
            (&Method::POST, None) if request.query.contains_key("uploads") => {
                self.initiate(state, request, bucket, key)
            }
            (&Method::PUT, Some(id)) => upload_part(state, request, &id, &resource),
            (&Method::GET, Some(id)) => list_parts(state, request, &id, &resource),
            (&Method::POST, Some(id)) => complete(state, request, &id, &resource),
            (&Method::DELETE, Some(id)) => match state.uploads.remove(&id) {
                Some(_) => Reply::new(204),
                None => no_such_upload(&resource),
            },
            (&Method::PUT, None) => {
                let data = request.body.clone();
                let etag = quoted_hex(&md5::compute(&data));
                let object = StoredObject {
                    data,
                    etag: etag.clone(),
                    content_type: content_type(request),
                    metadata: user_metadata(request),
                    last_modified: Utc::now(),
                };
                if let Some(b) = state.buckets.get_mut(bucket) {
                    b.objects.insert(key.to_string(), object);
                }
                Reply::new(200).header("ETag", etag)
            }
            (&Method::GET, None) | (&Method::HEAD, None) => {
                let head = request.method == Method::HEAD;
                let Some(object) = state.buckets.get(bucket).and_then(|b| b.objects.get(key))
                else {
                    return match head {
                        true => Reply::new(404),
                        false => Reply::error(
                            404,
                            "NoSuchKey",
                            "The specified key does not exist.",
                            &resource,
                        ),
                    };
                };
                get_object(object, request, head, &resource)
            }
            (&Method::DELETE, None) => {
                if let Some(b) = state.buckets.get_mut(bucket) {
                    b.objects.remove(key);
                }
                Reply::new(204)
            }
            _ => Reply::error(405, "MethodNotAllowed", "Method not allowed", &resource),
        }
    }

    fn initiate(
        &self,
        state: &mut ServerState,
        request: &RecordedRequest,
        bucket: &str,
        key: &str,
    ) -> Reply {
        let upload_id = format!("upload-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        state.uploads.insert(
            upload_id.clone(),
            PendingUpload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                content_type: content_type(request),
                metadata: user_metadata(request),
                parts: BTreeMap::new(),
            },
        );
        Reply::xml(
            200,
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                 <InitiateMultipartUploadResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
                 <Bucket>{}</Bucket><Key>{}</Key><UploadId>{upload_id}</UploadId>\
                 </InitiateMultipartUploadResult>",
                escape(bucket),
                escape(key),
            ),
        )
    }
}

fn no_such_bucket(resource: &str) -> Reply {
    Reply::error(404, "NoSuchBucket", "The specified bucket does not exist", resource)
}

fn no_such_upload(resource: &str) -> Reply {
    Reply::error(
        404,
        "NoSuchUpload",
        "The specified multipart upload does not exist.",
        resource,
    )
}

fn list_objects(name: &str, bucket: &BucketData, request: &RecordedRequest) -> Reply {
    let prefix = request.query_param("prefix").unwrap_or_default();
    let marker = request.query_param("marker").unwrap_or_default();
    let delimiter = request.query_param("delimiter").filter(|d| !d.is_empty());
    let max_keys = request
        .query_param("max-keys")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_KEYS);
    let url_encoded = request.query_param("encoding-type") == Some("url");
    let enc = |s: &str| match url_encoded {
        true => url_encode(s).into_owned(),
        false => escape(s),
    };

    let mut contents = String::new();
    let mut prefixes = String::new();
    let mut last_prefix: Option<String> = None;
    let mut count = 0;
    let mut is_truncated = false;
    let mut next_marker: Option<String> = None;

    for (key, object) in bucket.objects.range::<str, _>((
        std::ops::Bound::Excluded(marker),
        std::ops::Bound::Unbounded,
    )) {
        if !key.starts_with(prefix) {
            continue;
        }
        let common = delimiter.and_then(|d| {
            key[prefix.len()..]
                .find(d)
                .map(|i| key[..prefix.len() + i + d.len()].to_string())
        });
        if let Some(p) = &common
            && last_prefix.as_deref() == Some(p.as_str())
        {
            continue;
        }
        if count == max_keys {
            is_truncated = true;
            break;
        }
        count += 1;
        match common {
            Some(p) => {
                prefixes.push_str(&format!(
                    "<CommonPrefixes><Prefix>{}</Prefix></CommonPrefixes>",
                    enc(&p)
                ));
                next_marker = Some(p.clone());
                last_prefix = Some(p);
            }
            None => {
                contents.push_str(&format!(
                    "<Contents><Key>{}</Key><LastModified>{}</LastModified><ETag>{}</ETag>\
                     <Size>{}</Size><StorageClass>STANDARD</StorageClass></Contents>",
                    enc(key),
                    to_iso8601utc(object.last_modified),
                    escape(&object.etag),
                    object.data.len(),
                ));
                next_marker = Some(key.clone());
            }
        }
    }

    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
         <Name>{}</Name><Prefix>{}</Prefix><Marker>{}</Marker><MaxKeys>{max_keys}</MaxKeys>",
        escape(name),
        enc(prefix),
        enc(marker),
    );
    if let Some(d) = delimiter {
        xml.push_str(&format!("<Delimiter>{}</Delimiter>", enc(d)));
    }
    if url_encoded {
        xml.push_str("<EncodingType>url</EncodingType>");
    }
    xml.push_str(&format!("<IsTruncated>{is_truncated}</IsTruncated>"));
    // Like S3, NextMarker is only sent when a delimiter is used.
    if is_truncated
        && delimiter.is_some()
        && let Some(m) = next_marker
    {
        xml.push_str(&format!("<NextMarker>{}</NextMarker>", enc(&m)));
    }
    xml.push_str(&contents);
    xml.push_str(&prefixes);
    xml.push_str("</ListBucketResult>");
    Reply::xml(200, xml)
}

fn get_object(object: &StoredObject, request: &RecordedRequest, head: bool, resource: &str) -> Reply {
    let len = object.data.len() as u64;
    let (status, data, content_range) = match request.header("Range") {
        Some(range) if !head => match parse_range(range, len) {
            Some((start, end)) => (
                206,
                object.data.slice(start as usize..=end as usize),
                Some(format!("bytes {start}-{end}/{len}")),
            ),
            None => {
                return Reply::error(
                    416,
                    "InvalidRange",
                    "The requested range is not satisfiable",
                    resource,
                );
            }
        },
        _ => (200, object.data.clone(), None),
    };

    let mut reply = Reply::new(status)
        .header("Content-Length", data.len().to_string())
        .header("Content-Type", object.content_type.clone())
        .header("ETag", object.etag.clone())
        .header("Last-Modified", to_http_header_value(object.last_modified))
        .header("Accept-Ranges", "bytes");
    if let Some(v) = content_range {
        reply = reply.header("Content-Range", v);
    }
    for (k, v) in &object.metadata {
        reply = reply.header(k, v.clone());
    }
    reply.body(data)
}

fn upload_part(
    state: &mut ServerState,
    request: &RecordedRequest,
    upload_id: &str,
    resource: &str,
) -> Reply {
    let Some(upload) = state.uploads.get_mut(upload_id) else {
        return no_such_upload(resource);
    };
    let Some(number) = request
        .query_param("partNumber")
        .and_then(|v| v.parse::<u16>().ok())
        .filter(|n| (1..=10000).contains(n))
    else {
        return Reply::error(
            400,
            "InvalidArgument",
            "Part number must be an integer between 1 and 10000, inclusive",
            resource,
        );
    };
    let digest = md5::compute(&request.body);
    let etag = quoted_hex(&digest);
    upload.parts.insert(
        number,
        StoredPart {
            data: request.body.clone(),
            digest,
            last_modified: Utc::now(),
        },
    );
    Reply::new(200).header("ETag", etag)
}

fn list_parts(
    state: &ServerState,
    request: &RecordedRequest,
    upload_id: &str,
    resource: &str,
) -> Reply {
    let Some(upload) = state.uploads.get(upload_id) else {
        return no_such_upload(resource);
    };
    let marker = request
        .query_param("part-number-marker")
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(0);
    let max_parts = request
        .query_param("max-parts")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(1000);

    let remaining: Vec<_> = upload.parts.range(marker + 1..).collect();
    let is_truncated = remaining.len() > max_parts;
    let page = &remaining[..remaining.len().min(max_parts)];

    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <ListPartsResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
         <Bucket>{}</Bucket><Key>{}</Key><UploadId>{}</UploadId>\
         <PartNumberMarker>{marker}</PartNumberMarker>",
        escape(&upload.bucket),
        escape(&upload.key),
        escape(upload_id),
    );
    if let Some((n, _)) = page.last() {
        xml.push_str(&format!("<NextPartNumberMarker>{n}</NextPartNumberMarker>"));
    }
    xml.push_str(&format!(
        "<MaxParts>{max_parts}</MaxParts><IsTruncated>{is_truncated}</IsTruncated>"
    ));
    for (n, part) in page {
        xml.push_str(&format!(
            "<Part><PartNumber>{n}</PartNumber><LastModified>{}</LastModified>\
             <ETag>{}</ETag><Size>{}</Size></Part>",
            to_iso8601utc(part.last_modified),
            escape(&quoted_hex(&part.digest)),
            part.data.len(),
        ));
    }
    xml.push_str("</ListPartsResult>");
    Reply::xml(200, xml)
}

fn complete(
    state: &mut ServerState,
    request: &RecordedRequest,
    upload_id: &str,
    resource: &str,
) -> Reply {
    let Some(upload) = state.uploads.get(upload_id) else {
        return no_such_upload(resource);
    };
    let Ok(root) = Element::parse(request.body.as_ref()) else {
        return Reply::error(
            400,
            "MalformedXML",
            "The XML you provided was not well-formed",
            resource,
        );
    };

    let mut manifest: Vec<(u16, String)> = Vec::new();
    for node in &root.children {
        let XMLNode::Element(part) = node else {
            continue;
        };
        let number = child_text(part, "PartNumber").and_then(|v| v.parse::<u16>().ok());
        let etag = child_text(part, "ETag");
        match (number, etag) {
            (Some(n), Some(e)) => manifest.push((n, e.trim_matches('"').to_string())),
            _ => {
                return Reply::error(
                    400,
                    "MalformedXML",
                    "The XML you provided was not well-formed",
                    resource,
                );
            }
        }
    }
    if manifest.is_empty() {
        return Reply::error(
            400,
            "MalformedXML",
            "You must specify at least one part",
            resource,
        );
    }
    if manifest.windows(2).any(|w| w[0].0 >= w[1].0) {
        return Reply::error(
            400,
            "InvalidPartOrder",
            "The list of parts was not in ascending order.",
            resource,
        );
    }

    let mut data = BytesMut::new();
    let mut digests = Vec::with_capacity(manifest.len() * 16);
    for (i, (n, etag)) in manifest.iter().enumerate() {
        let Some(part) = upload
            .parts
            .get(n)
            .filter(|p| format!("{:x}", p.digest) == *etag)
        else {
            return Reply::error(
                400,
                "InvalidPart",
                "One or more of the specified parts could not be found.",
                resource,
            );
        };
        if i + 1 < manifest.len() && (part.data.len() as u64) < MIN_PART_SIZE {
            return Reply::error(
                400,
                "EntityTooSmall",
                "Your proposed upload is smaller than the minimum allowed object size.",
                resource,
            );
        }
        data.extend_from_slice(&part.data);
        digests.extend_from_slice(&part.digest.0);
    }

    let Some(upload) = state.uploads.remove(upload_id) else {
        return no_such_upload(resource);
    };
    let etag = format!("\"{:x}-{}\"", md5::compute(&digests), manifest.len());
    let object = StoredObject {
        data: data.freeze(),
        etag: etag.clone(),
        content_type: upload.content_type,
        metadata: upload.metadata,
        last_modified: Utc::now(),
    };
    if let Some(b) = state.buckets.get_mut(&upload.bucket) {
        b.objects.insert(upload.key.clone(), object);
    }

    Reply::xml(
        200,
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <CompleteMultipartUploadResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
             <Location>http://localhost/{}/{}</Location><Bucket>{}</Bucket><Key>{}</Key>\
             <ETag>{}</ETag></CompleteMultipartUploadResult>",
            escape(&upload.bucket),
            escape(&upload.key),
            escape(&upload.bucket),
            escape(&upload.key),
            escape(&etag),
        ),
    )
}

#[async_trait]
impl Transport for MemoryServer {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, Error> {
        let request = RecordedRequest::read(request).await?;
        let reply = self.handle(&request);
        let head = request.method == Method::HEAD;
        log::debug!("{} {} -> {}", request.method, request.path, reply.status);

        let request_id = format!("MEM{:08}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.lock().requests.push(request);
        Ok(reply.into_response(request_id, head))
    }
}
