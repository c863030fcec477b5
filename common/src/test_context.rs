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

use crate::memory_server::MemoryServer;
use crate::utils::{init_logger, rand_bucket_name};
use objectstorage::s3::creds::StaticProvider;
use objectstorage::s3::http::BaseUrl;
use objectstorage::s3::transport::{RetryConfig, Transport};
use objectstorage::s3::types::S3Api;
use objectstorage::s3::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::Duration;

pub const ACCESS_KEY: &str = "minioadmin";
pub const SECRET_KEY: &str = "minioadmin";
pub const SERVER_ENDPOINT: &str = "http://localhost:9000";

/// A client wired to a fresh [`MemoryServer`].
#[derive(Clone)]
pub struct TestContext {
    pub client: Client,
    pub server: Arc<MemoryServer>,
}

impl TestContext {
    pub fn new() -> Self {
        let server = Arc::new(MemoryServer::new());
        let client = Self::client_builder(server.clone()).build().unwrap();
        Self { client, server }
    }

    /// Builder with static credentials and millisecond retry delays.
    pub fn client_builder(transport: Arc<dyn Transport>) -> ClientBuilder {
        init_logger();
        let base_url: BaseUrl = SERVER_ENDPOINT.parse().unwrap();
        Client::builder(base_url)
            .provider(Some(StaticProvider::new(ACCESS_KEY, SECRET_KEY, None)))
            .retry_config(
                RetryConfig::default()
                    .initial_delay(Duration::from_millis(1))
                    .max_delay(Duration::from_millis(4)),
            )
            .transport(transport)
    }

    /// Creates a bucket with a random name and returns the name.
    pub async fn create_bucket(&self) -> String {
        let bucket_name = rand_bucket_name();
        self.client
            .create_bucket(&bucket_name)
            .send()
            .await
            .unwrap();
        bucket_name
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
