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
use crate::s3::builders::{
    AbortMultipartUpload, CompleteMultipartUpload, CreateMultipartUpload, ListParts,
    ObjectContent, UploadPart,
};
use crate::s3::error::Error;
use crate::s3::multipart::MultipartUpload;
use crate::s3::types::{Part, S3Api};

impl Client {
    /// Starts a multipart upload and returns its session handle in the
    /// `Initiated` state.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use objectstorage::s3::Client;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = Client::builder("http://localhost:9000".parse().unwrap()).build().unwrap();
    ///     let upload = client.initiate_multipart_upload("bucket-name", "big.bin").await.unwrap();
    ///     upload.upload_part(1, vec![0u8; 5 * 1024 * 1024]).await.unwrap();
    ///     upload.upload_part(2, vec![1u8; 1024]).await.unwrap();
    ///     let resp = upload.complete_recorded().await.unwrap();
    ///     println!("assembled object ETag {}", resp.etag);
    /// }
    /// ```
    pub async fn initiate_multipart_upload<S1: Into<String>, S2: Into<String>>(
        &self,
        bucket: S1,
        object: S2,
    ) -> Result<MultipartUpload, Error> {
        let resp = self.create_multipart_upload(bucket, object).send().await?;
        MultipartUpload::new(self.clone(), resp.bucket, resp.object, resp.upload_id)
    }

    /// Creates a [`CreateMultipartUpload`] request builder.
    pub fn create_multipart_upload<S1: Into<String>, S2: Into<String>>(
        &self,
        bucket: S1,
        object: S2,
    ) -> CreateMultipartUpload {
        CreateMultipartUpload::new(self.clone(), bucket.into(), object.into())
    }

    /// Creates an [`UploadPart`] request builder.
    pub fn upload_part<S1: Into<String>, S2: Into<String>, S3: Into<String>, C: Into<ObjectContent>>(
        &self,
        bucket: S1,
        object: S2,
        upload_id: S3,
        part_number: u16,
        content: C,
    ) -> UploadPart {
        UploadPart::new(
            self.clone(),
            bucket.into(),
            object.into(),
            upload_id.into(),
            part_number,
            content.into(),
        )
    }

    /// Creates a [`ListParts`] request builder.
    pub fn list_parts<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        &self,
        bucket: S1,
        object: S2,
        upload_id: S3,
    ) -> ListParts {
        ListParts::new(self.clone(), bucket.into(), object.into(), upload_id.into())
    }

    /// Creates a [`CompleteMultipartUpload`] request builder.
    pub fn complete_multipart_upload<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        &self,
        bucket: S1,
        object: S2,
        upload_id: S3,
        parts: Vec<Part>,
    ) -> CompleteMultipartUpload {
        CompleteMultipartUpload::new(
            self.clone(),
            bucket.into(),
            object.into(),
            upload_id.into(),
            parts,
        )
    }

    /// Creates an [`AbortMultipartUpload`] request builder.
    pub fn abort_multipart_upload<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        &self,
        bucket: S1,
        object: S2,
        upload_id: S3,
    ) -> AbortMultipartUpload {
        AbortMultipartUpload::new(self.clone(), bucket.into(), object.into(), upload_id.into())
    }
}
