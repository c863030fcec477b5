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

//! HTTP transport and retry policy.
//!
//! The client talks to the network only through the [`Transport`] trait.
//! [`ReqwestTransport`] is the production implementation with a pooled
//! connection set; tests inject an in-process fake through
//! [`ClientBuilder::transport`](crate::s3::client::ClientBuilder::transport).
//!
//! # HTTP Version Support
//!
//! Over TLS the transport negotiates HTTP/2 via ALPN when the `http2` feature
//! is enabled and the server supports it, otherwise it uses HTTP/1.1.

use crate::s3::error::{Error, NetworkError, ValidationErr};
use crate::s3::http::Url;
use crate::s3::multimap_ext::Multimap;
use crate::s3::segmented_bytes::SegmentedBytes;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream, StreamExt, TryStreamExt};
use http::{HeaderMap, Method};
use log::{debug, warn};
use reqwest::Body;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

/// A boxed stream of body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Body of an outgoing request.
pub enum RequestBody {
    /// In-memory body; can be hashed up front and replayed on retry.
    Buffered(SegmentedBytes),
    /// One-shot streamed body of a known size.
    Streaming { stream: ByteStream, size: u64 },
}

impl RequestBody {
    pub fn len(&self) -> u64 {
        match self {
            RequestBody::Buffered(sb) => sb.len() as u64,
            RequestBody::Streaming { size, .. } => *size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the body can be sent more than once.
    pub fn is_replayable(&self) -> bool {
        matches!(self, RequestBody::Buffered(_))
    }

    /// Returns a copy of a buffered body; streams cannot be copied.
    pub fn try_clone(&self) -> Option<Self> {
        match self {
            RequestBody::Buffered(sb) => Some(RequestBody::Buffered(sb.clone())),
            RequestBody::Streaming { .. } => None,
        }
    }

    pub fn into_stream(self) -> ByteStream {
        match self {
            RequestBody::Buffered(sb) => Box::pin(stream::iter(sb.into_iter().map(Ok))),
            RequestBody::Streaming { stream, .. } => stream,
        }
    }

    /// Reads the whole body into memory.
    pub async fn into_bytes(self) -> io::Result<Bytes> {
        match self {
            RequestBody::Buffered(sb) => Ok(sb.to_bytes()),
            RequestBody::Streaming { stream, size } => {
                let buf = BytesMut::with_capacity(size as usize);
                let buf = stream
                    .try_fold(buf, |mut buf, chunk| async move {
                        buf.extend_from_slice(&chunk);
                        Ok(buf)
                    })
                    .await?;
                Ok(buf.freeze())
            }
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Buffered(sb) => write!(f, "Buffered({} bytes)", sb.len()),
            RequestBody::Streaming { size, .. } => write!(f, "Streaming({size} bytes)"),
        }
    }
}

/// A fully prepared (addressed and signed) HTTP request.
#[derive(Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Multimap,
    pub body: Option<RequestBody>,
}

/// Status, headers and a lazily read body.
pub struct RawResponse {
    status: u16,
    headers: HeaderMap,
    body: ByteStream,
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl RawResponse {
    pub fn new(
        status: u16,
        headers: HeaderMap,
        body: impl Stream<Item = io::Result<Bytes>> + Send + 'static,
    ) -> Self {
        Self {
            status,
            headers,
            body: Box::pin(body),
        }
    }

    pub fn from_bytes(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        let chunks = if body.is_empty() { vec![] } else { vec![Ok(body)] };
        Self::new(status, headers, stream::iter(chunks))
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_parts(self) -> (u16, HeaderMap, ByteStream) {
        (self.status, self.headers, self.body)
    }

    /// Reads the whole body into memory.
    pub async fn bytes(self) -> Result<Bytes, Error> {
        let (_, _, body) = self.into_parts();
        let buf = body
            .try_fold(BytesMut::new(), |mut buf, chunk| async move {
                buf.extend_from_slice(&chunk);
                Ok(buf)
            })
            .await?;
        Ok(buf.freeze())
    }
}

/// Sends prepared requests to the server.
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    /// Sends one request. Non-2xx responses are returned as `Ok`; only
    /// failures to obtain a response are errors.
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, Error>;
}

/// Configuration for the HTTP connection pool.
///
/// These settings allow tuning the client for different workloads:
/// - **High-throughput**: Increase `max_idle_per_host` and `idle_timeout`
/// - **Low-latency**: Enable `tcp_nodelay` (default)
/// - **Resource-constrained**: Reduce `max_idle_per_host` and `idle_timeout`
///
/// # Example
///
/// ```
/// use objectstorage::s3::transport::ConnectionPoolConfig;
/// use std::time::Duration;
///
/// let config = ConnectionPoolConfig::default()
///     .max_idle_per_host(64)
///     .idle_timeout(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionPoolConfig {
    /// Maximum number of idle connections per host. Default: 32
    pub max_idle_per_host: usize,

    /// How long idle connections are kept in the pool. Default: 90 seconds
    pub idle_timeout: Duration,

    /// TCP keepalive interval. Default: 60 seconds
    pub tcp_keepalive: Duration,

    /// Enable TCP_NODELAY (disable Nagle's algorithm). Default: true
    pub tcp_nodelay: bool,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 32,
            idle_timeout: Duration::from_secs(90),
            tcp_keepalive: Duration::from_secs(60),
            tcp_nodelay: true,
        }
    }
}

impl ConnectionPoolConfig {
    pub fn max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn tcp_keepalive(mut self, interval: Duration) -> Self {
        self.tcp_keepalive = interval;
        self
    }

    pub fn tcp_nodelay(mut self, enable: bool) -> Self {
        self.tcp_nodelay = enable;
        self
    }
}

/// Retry policy for idempotent requests failing at the connection level.
///
/// The delay before retry `n` (0-based) is `initial_delay * 2^n`, capped at
/// `max_delay`, with random jitter over its upper half.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt. Default: 3
    pub max_retries: u32,
    /// Default: 100 ms
    pub initial_delay: Duration,
    /// Default: 5 s
    pub max_delay: Duration,
    /// Deadline for a single attempt, enforced by the default transport.
    /// Default: none
    pub request_timeout: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            request_timeout: None,
        }
    }
}

impl RetryConfig {
    /// Disables retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Backoff ceiling for given retry, before jitter.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn jittered_backoff(&self, retry: u32) -> Duration {
        let ceiling = self.backoff(retry);
        ceiling / 2 + ceiling.mul_f64(rand::random::<f64>() / 2.0)
    }
}

/// Returns true for methods whose requests may be safely repeated.
///
/// POST (initiate and complete multipart upload) is excluded.
pub fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::PUT | Method::DELETE
    )
}

/// Sends a request through `transport`, retrying transient failures.
///
/// `prepare` is called once per attempt with that attempt's body and must
/// return a freshly signed request. Only idempotent methods with a
/// replayable (or absent) body are retried; server responses, including
/// error statuses, are never retried here.
pub(crate) async fn send_with_retry<F>(
    transport: &dyn Transport,
    config: &RetryConfig,
    method: &Method,
    mut body: Option<RequestBody>,
    mut prepare: F,
) -> Result<RawResponse, Error>
where
    F: FnMut(Option<RequestBody>) -> Result<HttpRequest, Error>,
{
    let retryable = is_idempotent(method) && body.as_ref().is_none_or(RequestBody::is_replayable);
    let mut retry = 0u32;
    loop {
        let attempt_body = if retryable {
            body.as_ref().and_then(RequestBody::try_clone)
        } else {
            body.take()
        };
        let request = prepare(attempt_body)?;
        let url = request.url.to_string();
        debug!("{} {url} (attempt {})", request.method, retry + 1);

        match transport.send(request).await {
            Ok(resp) => {
                debug!("{method} {url} -> {}", resp.status());
                return Ok(resp);
            }
            Err(e) if retryable && retry < config.max_retries && e.is_transient() => {
                let delay = config.jittered_backoff(retry);
                warn!(
                    "{method} {url} failed on attempt {}: {e}; retrying in {delay:?}",
                    retry + 1
                );
                async_std::task::sleep(delay).await;
                retry += 1;
            }
            Err(e) => {
                debug!("{method} {url} failed: {e}");
                return Err(e);
            }
        }
    }
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with default settings.
    pub fn new() -> Result<Self, Error> {
        ReqwestTransportBuilder::default().build()
    }

    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }
}

/// Options of the default transport.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportBuilder {
    pub(crate) connection_pool_config: ConnectionPoolConfig,
    pub(crate) ssl_cert_file: Option<PathBuf>,
    pub(crate) ignore_cert_check: Option<bool>,
    pub(crate) app_info: Option<(String, String)>,
    pub(crate) request_timeout: Option<Duration>,
}

impl ReqwestTransportBuilder {
    pub fn connection_pool_config(mut self, config: ConnectionPoolConfig) -> Self {
        self.connection_pool_config = config;
        self
    }

    /// Set file for loading CAs certs to trust. This is in addition to the
    /// system trust store. The file must contain PEM encoded certificates.
    pub fn ssl_cert_file(mut self, ssl_cert_file: Option<&Path>) -> Self {
        self.ssl_cert_file = ssl_cert_file.map(PathBuf::from);
        self
    }

    /// Set flag to ignore certificate check. This is insecure and should only
    /// be used for testing.
    pub fn ignore_cert_check(mut self, ignore_cert_check: Option<bool>) -> Self {
        self.ignore_cert_check = ignore_cert_check;
        self
    }

    /// Set the app info as an Option of (app_name, app_version) pair. This
    /// will show up in the user-agent.
    pub fn app_info(mut self, app_info: Option<(String, String)>) -> Self {
        self.app_info = app_info;
        self
    }

    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ReqwestTransport, Error> {
        let pool_config = &self.connection_pool_config;
        let mut builder = reqwest::Client::builder()
            .no_gzip()
            .tcp_nodelay(pool_config.tcp_nodelay)
            .tcp_keepalive(pool_config.tcp_keepalive)
            .pool_max_idle_per_host(pool_config.max_idle_per_host)
            .pool_idle_timeout(pool_config.idle_timeout);

        #[cfg(feature = "http2")]
        {
            builder = builder.http2_adaptive_window(true);
        }

        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        let mut user_agent = String::from("objectstorage-rs/")
            + env!("CARGO_PKG_VERSION")
            + " ("
            + std::env::consts::OS
            + "; "
            + std::env::consts::ARCH
            + ")";
        if let Some((app_name, app_version)) = self.app_info {
            user_agent.push_str(&format!(" {app_name}/{app_version}"));
        }
        builder = builder.user_agent(user_agent);

        #[cfg(any(
            feature = "default-tls",
            feature = "native-tls",
            feature = "rustls-tls"
        ))]
        if let Some(v) = self.ignore_cert_check {
            builder = builder.danger_accept_invalid_certs(v);
        }

        #[cfg(any(
            feature = "default-tls",
            feature = "native-tls",
            feature = "rustls-tls"
        ))]
        if let Some(v) = self.ssl_cert_file {
            let buf = std::fs::read(v)?;
            let certs =
                reqwest::Certificate::from_pem_bundle(&buf).map_err(ValidationErr::HttpClient)?;
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        Ok(ReqwestTransport {
            http_client: builder.build().map_err(ValidationErr::HttpClient)?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, Error> {
        let mut req = self
            .http_client
            .request(request.method, request.url.to_string());

        for (key, values) in request.headers.iter_all() {
            for value in values {
                req = req.header(key, value);
            }
        }

        if let Some(body) = request.body {
            req = req.body(Body::wrap_stream(body.into_stream()));
        }

        let resp = req.send().await.map_err(NetworkError::from)?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes_stream().map(|r| r.map_err(io::Error::other));
        Ok(RawResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, Default)]
    struct FailingTransport {
        calls: AtomicU32,
        failures: u32,
    }

    #[async_trait]
    impl Transport for FailingTransport {
        async fn send(&self, request: HttpRequest) -> Result<RawResponse, Error> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(NetworkError::Connection {
                    url: request.url.to_string(),
                    message: "connection reset by peer".into(),
                }
                .into());
            }
            Ok(RawResponse::from_bytes(200, HeaderMap::new(), "ok"))
        }
    }

    fn fast_retries(max_retries: u32) -> RetryConfig {
        RetryConfig::default()
            .max_retries(max_retries)
            .initial_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(2))
    }

    fn request(method: &Method, body: Option<RequestBody>) -> Result<HttpRequest, Error> {
        Ok(HttpRequest {
            method: method.clone(),
            url: Url {
                host: "localhost".into(),
                port: 9000,
                ..Default::default()
            },
            headers: Multimap::new(),
            body,
        })
    }

    #[test]
    fn test_backoff_is_exponential_and_capped() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff(0), Duration::from_millis(100));
        assert_eq!(config.backoff(1), Duration::from_millis(200));
        assert_eq!(config.backoff(3), Duration::from_millis(800));
        assert_eq!(config.backoff(10), Duration::from_secs(5));
        assert_eq!(config.backoff(64), Duration::from_secs(5));
        for retry in 0..8 {
            let d = config.jittered_backoff(retry);
            assert!(d >= config.backoff(retry) / 2);
            assert!(d <= config.backoff(retry));
        }
    }

    #[test]
    fn test_idempotent_methods() {
        assert!(is_idempotent(&Method::GET));
        assert!(is_idempotent(&Method::HEAD));
        assert!(is_idempotent(&Method::PUT));
        assert!(is_idempotent(&Method::DELETE));
        assert!(!is_idempotent(&Method::POST));
    }

    #[tokio::test]
    async fn test_get_is_retried_until_success() {
        let transport = Arc::new(FailingTransport {
            failures: 2,
            ..Default::default()
        });
        let mut prepared = 0;
        let resp = send_with_retry(
            transport.as_ref(),
            &fast_retries(3),
            &Method::GET,
            None,
            |body| {
                prepared += 1;
                request(&Method::GET, body)
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
        assert_eq!(prepared, 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let transport = FailingTransport {
            failures: 10,
            ..Default::default()
        };
        let err = send_with_retry(&transport, &fast_retries(2), &Method::HEAD, None, |body| {
            request(&Method::HEAD, body)
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), crate::s3::error::ErrorKind::TransportError);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_post_is_not_retried() {
        let transport = FailingTransport {
            failures: 1,
            ..Default::default()
        };
        let result = send_with_retry(&transport, &fast_retries(3), &Method::POST, None, |body| {
            request(&Method::POST, body)
        })
        .await;
        assert!(result.is_err());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_buffered_body_is_replayed() {
        let transport = FailingTransport {
            failures: 1,
            ..Default::default()
        };
        let mut seen = Vec::new();
        send_with_retry(
            &transport,
            &fast_retries(3),
            &Method::PUT,
            Some(RequestBody::Buffered(SegmentedBytes::from("part data"))),
            |body| {
                seen.push(body.as_ref().map(RequestBody::len));
                request(&Method::PUT, body)
            },
        )
        .await
        .unwrap();
        assert_eq!(seen, vec![Some(9), Some(9)]);
    }

    #[tokio::test]
    async fn test_streaming_body_is_not_retried() {
        let transport = FailingTransport {
            failures: 1,
            ..Default::default()
        };
        let body = RequestBody::Streaming {
            stream: Box::pin(stream::iter(vec![Ok(Bytes::from_static(b"abc"))])),
            size: 3,
        };
        let result = send_with_retry(
            &transport,
            &fast_retries(3),
            &Method::PUT,
            Some(body),
            |body| request(&Method::PUT, body),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_raw_response_bytes() {
        let chunks = vec![Ok(Bytes::from_static(b"hello ")), Ok(Bytes::from_static(b"world"))];
        let resp = RawResponse::new(200, HeaderMap::new(), stream::iter(chunks));
        assert!(resp.is_success());
        assert_eq!(resp.bytes().await.unwrap(), "hello world");
    }
}
