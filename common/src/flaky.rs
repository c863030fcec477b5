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

//! Fault injection for transport retry tests.

use async_trait::async_trait;
use http::Method;
use objectstorage::s3::error::{Error, NetworkError};
use objectstorage::s3::multimap_ext::Multimap;
use objectstorage::s3::transport::{HttpRequest, RawResponse, Transport};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Fails the first `failures` requests with a connection error, then
/// delegates to the wrapped transport.
#[derive(Debug)]
pub struct FlakyTransport {
    inner: Arc<dyn Transport>,
    remaining_failures: AtomicU32,
    attempts: Mutex<Vec<(Method, Multimap)>>,
}

impl FlakyTransport {
    pub fn new(inner: Arc<dyn Transport>, failures: u32) -> Self {
        Self {
            inner,
            remaining_failures: AtomicU32::new(failures),
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Methods of every attempt, failed or not, in order.
    pub fn attempts(&self) -> Vec<Method> {
        self.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    /// Signed headers of every attempt, in order.
    pub fn attempt_headers(&self) -> Vec<Multimap> {
        self.lock().iter().map(|(_, h)| h.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Method, Multimap)>> {
        self.attempts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for FlakyTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, Error> {
        self.lock()
            .push((request.method.clone(), request.headers.clone()));

        let fail = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            log::debug!("injecting connection failure for {}", request.url);
            return Err(NetworkError::Connection {
                url: request.url.to_string(),
                message: "connection reset by peer".into(),
            }
            .into());
        }
        self.inner.send(request).await
    }
}
