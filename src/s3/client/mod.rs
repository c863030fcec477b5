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

//! S3 client to perform bucket and object operations.
//!
//! # HTTP Version Support
//!
//! The default transport supports both HTTP/1.1 and HTTP/2. When connecting
//! over TLS, HTTP/2 is negotiated via ALPN if the server supports it,
//! otherwise the connection falls back to HTTP/1.1.
//!
//! HTTP/2 support is enabled by default via the `http2` feature flag. For
//! HTTP/1.1-only legacy S3-compatible services, you can disable it:
//!
//! ```toml
//! [dependencies]
//! objectstorage = { version = "0.1", default-features = false, features = ["default-tls"] }
//! ```

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::s3::builders::ObjectContent;
use crate::s3::clock::{Clock, RequestIdGenerator, SystemClock, UuidRequestIdGenerator};
use crate::s3::creds::Provider;
use crate::s3::error::Error;
use crate::s3::error_response::error_from_response;
use crate::s3::header_constants::*;
use crate::s3::http::{BaseUrl, Url};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::signer::sign_v4_s3;
use crate::s3::transport::{
    ConnectionPoolConfig, HttpRequest, RawResponse, RequestBody, ReqwestTransport, RetryConfig,
    Transport, send_with_retry,
};
use crate::s3::utils::{EMPTY_SHA256, UNSIGNED_PAYLOAD, md5sum_hash_sb, sha256_hash_sb, to_amz_date};
pub use http::Method;

mod create_bucket;
mod delete_bucket;
mod delete_object;
mod get_object;
mod list_buckets;
mod list_objects;
mod multipart;
mod put_object;
mod stat_object;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Size limits applied locally before a request is sent.
///
/// The defaults match Amazon S3. Servers with other limits may be targeted by
/// overriding them through [`ClientBuilder::limits`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Minimum size of every part except the last one. Default: 5 MiB
    pub min_part_size: u64,
    /// Maximum size of one part. Default: 5 GiB
    pub max_part_size: u64,
    /// Maximum size of a single `PutObject`. Default: 5 GiB
    pub max_single_put_size: u64,
    /// Highest valid part number. Default: 10000
    pub max_parts: u16,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_part_size: 5 * 1024 * 1024,
            max_part_size: 5 * 1024 * 1024 * 1024,
            max_single_put_size: 5 * 1024 * 1024 * 1024,
            max_parts: 10_000,
        }
    }
}

impl Limits {
    pub fn min_part_size(mut self, size: u64) -> Self {
        self.min_part_size = size;
        self
    }

    pub fn max_part_size(mut self, size: u64) -> Self {
        self.max_part_size = size;
        self
    }

    pub fn max_single_put_size(mut self, size: u64) -> Self {
        self.max_single_put_size = size;
        self
    }

    pub fn max_parts(mut self, max: u16) -> Self {
        self.max_parts = max;
        self
    }
}

/// Builder for [`Client`].
///
/// Transport options (`connection_pool_config`, `ssl_cert_file`,
/// `ignore_cert_check`, `app_info`) configure the default
/// [`ReqwestTransport`] and are ignored when a custom transport is set.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: BaseUrl,
    provider: Option<Arc<dyn Provider>>,
    transport: Option<Arc<dyn Transport>>,
    ssl_cert_file: Option<PathBuf>,
    ignore_cert_check: Option<bool>,
    app_info: Option<(String, String)>,
    connection_pool_config: ConnectionPoolConfig,
    retry_config: RetryConfig,
    limits: Limits,
    clock: Arc<dyn Clock>,
    request_id_generator: Arc<dyn RequestIdGenerator>,
    region: Option<String>,
}

impl ClientBuilder {
    /// Creates a builder given a base URL for the object storage service.
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            provider: None,
            transport: None,
            ssl_cert_file: None,
            ignore_cert_check: None,
            app_info: None,
            connection_pool_config: ConnectionPoolConfig::default(),
            retry_config: RetryConfig::default(),
            limits: Limits::default(),
            clock: Arc::new(SystemClock),
            request_id_generator: Arc::new(UuidRequestIdGenerator),
            region: None,
        }
    }

    /// Set the credential provider. If not set, anonymous (unsigned)
    /// requests are made.
    pub fn provider<P: Provider + 'static>(mut self, provider: Option<P>) -> Self {
        self.provider = provider.map(|p| Arc::new(p) as Arc<dyn Provider>);
        self
    }

    /// Replace the HTTP transport, e.g. with an in-process fake server.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the app info as an Option of (app_name, app_version) pair. This will show up in the
    /// client's user-agent.
    pub fn app_info(mut self, app_info: Option<(String, String)>) -> Self {
        self.app_info = app_info;
        self
    }

    /// Set file for loading CAs certs to trust. This is in addition to the system trust store.
    ///
    /// The file must contain PEM encoded certificates.
    pub fn ssl_cert_file(mut self, ssl_cert_file: Option<&Path>) -> Self {
        self.ssl_cert_file = ssl_cert_file.map(PathBuf::from);
        self
    }

    /// Set flag to ignore certificate check.
    ///
    /// This is insecure and should only be used for testing.
    pub fn ignore_cert_check(mut self, ignore_cert_check: Option<bool>) -> Self {
        self.ignore_cert_check = ignore_cert_check;
        self
    }

    /// Configure the HTTP connection pool settings.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use objectstorage::s3::ClientBuilder;
    /// use objectstorage::s3::transport::ConnectionPoolConfig;
    /// use std::time::Duration;
    ///
    /// let client = ClientBuilder::new("http://localhost:9000".parse().unwrap())
    ///     .connection_pool_config(
    ///         ConnectionPoolConfig::default()
    ///             .max_idle_per_host(64)
    ///             .idle_timeout(Duration::from_secs(120)),
    ///     )
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn connection_pool_config(mut self, config: ConnectionPoolConfig) -> Self {
        self.connection_pool_config = config;
        self
    }

    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the clock used for request timestamps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn request_id_generator(mut self, generator: Arc<dyn RequestIdGenerator>) -> Self {
        self.request_id_generator = generator;
        self
    }

    /// Set the region used for signing. Defaults to the region embedded in
    /// an Amazon S3 host name, or `us-east-1`.
    pub fn region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    /// Build the Client.
    pub fn build(self) -> Result<Client, Error> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                ReqwestTransport::builder()
                    .connection_pool_config(self.connection_pool_config)
                    .ssl_cert_file(self.ssl_cert_file.as_deref())
                    .ignore_cert_check(self.ignore_cert_check)
                    .app_info(self.app_info)
                    .request_timeout(self.retry_config.request_timeout)
                    .build()?,
            ),
        };

        let region = match self.region {
            Some(r) if !r.is_empty() => r,
            _ if !self.base_url.region.is_empty() => self.base_url.region.clone(),
            _ => DEFAULT_REGION.to_string(),
        };

        Ok(Client {
            shared: Arc::new(SharedClientItems {
                base_url: self.base_url,
                provider: self.provider,
                transport,
                retry_config: self.retry_config,
                limits: self.limits,
                clock: self.clock,
                request_id_generator: self.request_id_generator,
                region,
            }),
        })
    }
}

/// Simple Storage Service (aka S3) client to perform bucket and object operations.
///
/// If credential provider is passed, all S3 operation requests are signed using
/// AWS Signature Version 4; else they are performed anonymously.
///
/// The client is cheap to clone; clones share one transport and its
/// connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) shared: Arc<SharedClientItems>,
}

impl Client {
    /// Returns a S3 client with given base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use objectstorage::s3::client::Client;
    /// use objectstorage::s3::creds::StaticProvider;
    /// use objectstorage::s3::http::BaseUrl;
    ///
    /// let base_url: BaseUrl = "play.min.io".parse().unwrap();
    /// let static_provider = StaticProvider::new(
    ///     "Q3AM3UQ867SPQQA43P2F",
    ///     "zuf+tfteSlswRu7BJ86wekitnifILbZam1KYY3TG",
    ///     None,
    /// );
    /// let client = Client::new(base_url, Some(static_provider), None, None).unwrap();
    /// ```
    pub fn new<P: Provider + 'static>(
        base_url: BaseUrl,
        provider: Option<P>,
        ssl_cert_file: Option<&Path>,
        ignore_cert_check: Option<bool>,
    ) -> Result<Self, Error> {
        ClientBuilder::new(base_url)
            .provider(provider)
            .ssl_cert_file(ssl_cert_file)
            .ignore_cert_check(ignore_cert_check)
            .build()
    }

    pub fn builder(base_url: BaseUrl) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Returns whether this client uses an AWS host.
    pub fn is_aws_host(&self) -> bool {
        self.shared.base_url.is_aws_host()
    }

    /// Returns whether this client is configured to use HTTPS.
    pub fn is_secure(&self) -> bool {
        self.shared.base_url.https
    }

    /// Returns the region requests are signed for.
    pub fn region(&self) -> &str {
        &self.shared.region
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.shared.base_url
    }

    pub fn limits(&self) -> &Limits {
        &self.shared.limits
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.shared.retry_config
    }

    /// Builds one signed attempt of a request.
    ///
    /// `Host` and `x-amz-date` are set from `url` and the client clock on
    /// every call, so each retry carries a fresh signature.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn prepare_request(
        &self,
        method: &Method,
        url: &Url,
        region: &str,
        headers: &Multimap,
        query_params: &Multimap,
        content_sha256: &str,
        body: Option<RequestBody>,
    ) -> HttpRequest {
        let mut headers = headers.clone();
        headers.add(HOST, url.host_header_value());

        let date = self.shared.clock.now();
        headers.add(X_AMZ_DATE, to_amz_date(date));

        if let Some(p) = &self.shared.provider {
            let creds = p.fetch();
            sign_v4_s3(
                method,
                &url.path,
                region,
                &mut headers,
                query_params,
                &creds,
                content_sha256,
                date,
            );
        }

        HttpRequest {
            method: method.clone(),
            url: url.clone(),
            headers,
            body,
        }
    }

    /// Sends a request and returns the raw response on 2xx.
    ///
    /// Any other status is converted into exactly one [`Error`].
    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn execute(
        &self,
        method: Method,
        region: &str,
        headers: &mut Multimap,
        query_params: &Multimap,
        bucket_name: Option<&str>,
        object_name: Option<&str>,
        body: Option<ObjectContent>,
        content_md5: bool,
    ) -> Result<RawResponse, Error> {
        let url = self
            .shared
            .base_url
            .build_url(&method, query_params, bucket_name, object_name)?;

        let body: Option<RequestBody> = match body {
            Some(content) => Some(content.into_request_body().await?),
            None => None,
        };

        if matches!(method, Method::PUT | Method::POST) {
            if !headers.contains_key_ignore_case(CONTENT_TYPE) {
                headers.add(CONTENT_TYPE, "application/octet-stream");
            }
            let len = body.as_ref().map_or(0, RequestBody::len);
            headers.add(CONTENT_LENGTH, len.to_string());
        }

        let content_sha256: String = match &body {
            None => EMPTY_SHA256.into(),
            Some(RequestBody::Buffered(sb)) if sb.is_empty() => EMPTY_SHA256.into(),
            Some(RequestBody::Buffered(sb)) => {
                let sb = sb.clone();
                async_std::task::spawn_blocking(move || sha256_hash_sb(&sb)).await
            }
            Some(RequestBody::Streaming { .. }) => UNSIGNED_PAYLOAD.into(),
        };
        headers.add(X_AMZ_CONTENT_SHA256, content_sha256.clone());

        if content_md5
            && let Some(RequestBody::Buffered(sb)) = &body
            && !headers.contains_key_ignore_case(CONTENT_MD5)
        {
            headers.add(CONTENT_MD5, md5sum_hash_sb(sb));
        }

        headers.add(
            AMZ_SDK_INVOCATION_ID,
            self.shared.request_id_generator.next_id(),
        );

        let headers: &Multimap = headers;
        let resp = send_with_retry(
            self.shared.transport.as_ref(),
            &self.shared.retry_config,
            &method,
            body,
            |body| {
                Ok(self.prepare_request(
                    &method,
                    &url,
                    region,
                    headers,
                    query_params,
                    &content_sha256,
                    body,
                ))
            },
        )
        .await?;

        if resp.is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let body = resp.bytes().await?;
        debug!("{method} {url} failed with status {status}");
        Err(error_from_response(
            status,
            resp_headers,
            body,
            &method,
            &url.path,
            bucket_name,
            object_name,
        ))
    }
}

#[derive(Debug)]
pub(crate) struct SharedClientItems {
    pub(crate) base_url: BaseUrl,
    pub(crate) provider: Option<Arc<dyn Provider>>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) retry_config: RetryConfig,
    pub(crate) limits: Limits,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) request_id_generator: Arc<dyn RequestIdGenerator>,
    pub(crate) region: String,
}
