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

use super::Client;
use crate::s3::builders::{ObjectContent, PutObject};

impl Client {
    /// Creates a [`PutObject`] request builder to upload an object in a single request.
    ///
    /// To execute the request, call [`PutObject::send()`](crate::s3::types::S3Api::send),
    /// which returns a [`Result`] containing a [`PutObjectResponse`](crate::s3::response::PutObjectResponse).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use objectstorage::s3::Client;
    /// use objectstorage::s3::response::PutObjectResponse;
    /// use objectstorage::s3::types::S3Api;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = Client::builder("http://localhost:9000".parse().unwrap()).build().unwrap();
    ///     let resp: PutObjectResponse = client
    ///         .put_object("bucket-name", "object-name", "hello world")
    ///         .content_type(Some("text/plain".into()))
    ///         .send()
    ///         .await
    ///         .unwrap();
    ///     println!("uploaded with ETag {}", resp.etag);
    /// }
    /// ```
    pub fn put_object<S1: Into<String>, S2: Into<String>, C: Into<ObjectContent>>(
        &self,
        bucket: S1,
        object: S2,
        content: C,
    ) -> PutObject {
        PutObject::new(self.clone(), bucket.into(), object.into(), content.into())
    }
}
