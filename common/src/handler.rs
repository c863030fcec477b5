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

//! Closure-backed mock server.

use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use objectstorage::s3::error::Error;
use objectstorage::s3::multimap_ext::Multimap;
use objectstorage::s3::transport::{HttpRequest, RawResponse, Transport};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A request as seen by a fake server, with its body read into memory.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub host: String,
    pub path: String,
    pub query: Multimap,
    pub headers: Multimap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub(crate) async fn read(request: HttpRequest) -> Result<Self, Error> {
        let body = match request.body {
            Some(b) => b.into_bytes().await?,
            None => Bytes::new(),
        };
        Ok(Self {
            method: request.method,
            host: request.url.host_header_value(),
            path: request.url.path,
            query: request.url.query,
            headers: request.headers,
            body,
        })
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        crate::utils::header(&self.headers, name)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

type Handler = dyn Fn(&RecordedRequest) -> RawResponse + Send + Sync;

/// Answers every request with the response produced by a closure and keeps
/// a log of what was received.
pub struct HandlerTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl HandlerTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> RawResponse + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replies with the same status and body to every request.
    pub fn fixed(status: u16, body: &'static str) -> Self {
        Self::new(move |_| RawResponse::from_bytes(status, Default::default(), body))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for HandlerTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HandlerTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, Error> {
        let request = RecordedRequest::read(request).await?;
        let response = (self.handler)(&request);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Ok(response)
    }
}
