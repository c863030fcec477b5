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
use crate::s3::builders::ListBuckets;

impl Client {
    /// Creates a [`ListBuckets`] request builder.
    ///
    /// To execute the request, call [`ListBuckets::send()`](crate::s3::types::S3Api::send),
    /// which returns a [`Result`] containing a [`ListBucketsResponse`](crate::s3::response::ListBucketsResponse).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use objectstorage::s3::Client;
    /// use objectstorage::s3::response::ListBucketsResponse;
    /// use objectstorage::s3::types::S3Api;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = Client::builder("http://localhost:9000".parse().unwrap()).build().unwrap();
    ///     let resp: ListBucketsResponse = client.list_buckets().send().await.unwrap();
    ///     for bucket in resp.buckets {
    ///         println!("{} created at {}", bucket.name, bucket.creation_date);
    ///     }
    /// }
    /// ```
    pub fn list_buckets(&self) -> ListBuckets {
        ListBuckets::new(self.clone())
    }
}
