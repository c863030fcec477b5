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

//! Holds selected responses until the test releases them, to order a
//! concurrent call between the server's reply and the client seeing it.

use async_trait::async_trait;
use objectstorage::s3::error::Error;
use objectstorage::s3::transport::{HttpRequest, RawResponse, Transport};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Notify;

type Matcher = Box<dyn Fn(&HttpRequest) -> bool + Send + Sync>;

/// Delegates every request to the wrapped transport. For requests accepted
/// by the matcher, the server's response is held back until
/// [`GatedTransport::release`] is called.
pub struct GatedTransport {
    inner: Arc<dyn Transport>,
    matcher: Matcher,
    answered: Notify,
    release: Notify,
}

impl GatedTransport {
    pub fn new<F>(inner: Arc<dyn Transport>, matcher: F) -> Self
    where
        F: Fn(&HttpRequest) -> bool + Send + Sync + 'static,
    {
        Self {
            inner,
            matcher: Box::new(matcher),
            answered: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Waits until the server has answered a gated request.
    pub async fn answered(&self) {
        self.answered.notified().await;
    }

    /// Lets one held response through.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

impl fmt::Debug for GatedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatedTransport")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, Error> {
        if !(self.matcher)(&request) {
            return self.inner.send(request).await;
        }
        let url = request.url.to_string();
        let resp = self.inner.send(request).await;
        log::debug!("holding response for {url}");
        self.answered.notify_one();
        self.release.notified().await;
        resp
    }
}
