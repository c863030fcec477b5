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

//! S3Request struct and implementation for executing HTTP requests.

use crate::s3::builders::ObjectContent;
use crate::s3::client::Client;
use crate::s3::error::Error;
use crate::s3::multimap_ext::Multimap;
use crate::s3::transport::RawResponse;
use crate::s3::types::{BucketName, ObjectKey};
use http::Method;
use typed_builder::TypedBuilder;

#[derive(Debug, TypedBuilder)]
/// Generic S3Request
pub struct S3Request {
    #[builder(!default)] // force required
    pub(crate) client: Client,

    #[builder(!default)] // force required
    pub(crate) method: Method,

    #[builder(default, setter(into))]
    pub(crate) bucket: Option<BucketName>,

    #[builder(default, setter(into))]
    pub(crate) object: Option<ObjectKey>,

    #[builder(default)]
    pub(crate) query_params: Multimap,

    #[builder(default)]
    pub(crate) headers: Multimap,

    #[builder(default, setter(into))]
    body: Option<ObjectContent>,

    /// Adds a `Content-MD5` header for in-memory bodies.
    #[builder(default = false)]
    content_md5: bool,

    /// region computed by [`S3Request::execute`]
    #[builder(default, setter(skip))]
    pub(crate) inner_region: String,
}

impl S3Request {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    pub fn region(&self) -> &str {
        &self.inner_region
    }

    /// Execute the request, returning the response. Only used in
    /// [`S3Api::send()`](crate::s3::types::S3Api::send).
    ///
    /// The body is consumed; executing the same request twice sends an empty
    /// body the second time.
    pub async fn execute(&mut self) -> Result<RawResponse, Error> {
        self.inner_region = self.client.region().to_string();

        self.client
            .execute(
                self.method.clone(),
                &self.inner_region,
                &mut self.headers,
                &self.query_params,
                self.bucket.as_ref().map(|b| b.as_str()),
                self.object.as_ref().map(|o| o.as_str()),
                self.body.take(),
                self.content_md5,
            )
            .await
    }
}
