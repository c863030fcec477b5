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
use crate::s3::builders::ListObjects;

impl Client {
    /// Creates a [`ListObjects`] request builder for one page of a bucket listing.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use objectstorage::s3::Client;
    /// use objectstorage::s3::types::S3Api;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = Client::builder("http://localhost:9000".parse().unwrap()).build().unwrap();
    ///     let mut marker: Option<String> = None;
    ///     loop {
    ///         let page = client
    ///             .list_objects("bucket-name")
    ///             .prefix(Some("photos/".into()))
    ///             .marker(marker.take())
    ///             .send()
    ///             .await
    ///             .unwrap();
    ///         for entry in page.objects() {
    ///             println!("{} ({:?} bytes)", entry.name, entry.size);
    ///         }
    ///         if !page.is_truncated {
    ///             break;
    ///         }
    ///         marker = page.next_marker;
    ///     }
    /// }
    /// ```
    pub fn list_objects<S: Into<String>>(&self, bucket: S) -> ListObjects {
        ListObjects::new(self.clone(), bucket.into())
    }
}
