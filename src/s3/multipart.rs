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

//! Multipart upload sessions
//!
//! A [`MultipartUpload`] tracks one server-side upload through the states
//!
//! ```text
//! Initiated ──upload_part──▶ PartsUploading ──complete──▶ Completed
//!     │                            │
//!     └───────────abort────────────┴──────▶ Aborted
//! ```
//!
//! `Completed` and `Aborted` are terminal. Clones of a session share its
//! state, so parts may be uploaded from several tasks at once; the caller
//! decides when all parts are done and calls [`MultipartUpload::complete`].
//! A failed call leaves the state and the recorded parts unchanged, and the
//! session never aborts on its own.

use crate::s3::builders::{ObjectContent, check_parts};
use crate::s3::client::Client;
use crate::s3::error::{Error, ErrorKind, ValidationErr};
use crate::s3::response::{CompleteMultipartUploadResponse, ListPartsResponse};
use crate::s3::types::{Part, PartInfo, S3Api, UploadId};
use crate::s3::utils::trim_quotes;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Lifecycle state of a multipart upload session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UploadState {
    Initiated,
    PartsUploading,
    Completed,
    Aborted,
}

impl UploadState {
    /// Returns true for `Completed` and `Aborted`.
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadState::Completed | UploadState::Aborted)
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug)]
struct SessionState {
    state: UploadState,
    parts: BTreeMap<u16, PartInfo>,
}

/// Handle to one multipart upload.
///
/// Created by [`Client::initiate_multipart_upload`]. Cloning is cheap and
/// clones share state.
#[derive(Clone, Debug)]
pub struct MultipartUpload {
    client: Client,
    bucket: String,
    object: String,
    upload_id: UploadId,
    inner: Arc<Mutex<SessionState>>,
}

impl MultipartUpload {
    pub(crate) fn new(
        client: Client,
        bucket: String,
        object: String,
        upload_id: String,
    ) -> Result<Self, Error> {
        let upload_id = UploadId::new(upload_id)?;
        debug!("multipart upload {upload_id} for {bucket}/{object}: Initiated");
        Ok(Self {
            client,
            bucket,
            object,
            upload_id,
            inner: Arc::new(Mutex::new(SessionState {
                state: UploadState::Initiated,
                parts: BTreeMap::new(),
            })),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn upload_id(&self) -> &str {
        self.upload_id.as_str()
    }

    pub fn state(&self) -> UploadState {
        self.lock().state
    }

    /// Parts recorded after successful uploads, in ascending part-number order.
    pub fn recorded_parts(&self) -> Vec<PartInfo> {
        self.lock().parts.values().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn invalid_state(&self, state: UploadState, operation: &'static str) -> Error {
        Error::InvalidState {
            upload_id: self.upload_id.to_string(),
            state,
            operation,
        }
    }

    fn ensure_active(&self, operation: &'static str) -> Result<(), Error> {
        let state = self.lock().state;
        if state.is_terminal() {
            return Err(self.invalid_state(state, operation));
        }
        Ok(())
    }

    /// Uploads one part and records its ETag and size.
    ///
    /// Uploading a part number again replaces the earlier record.
    pub async fn upload_part<C: Into<ObjectContent>>(
        &self,
        part_number: u16,
        content: C,
    ) -> Result<PartInfo, Error> {
        self.ensure_active("upload_part")?;

        let max_parts = self.client.limits().max_parts;
        if part_number < 1 || part_number > max_parts {
            return Err(ValidationErr::InvalidPartNumber {
                number: part_number as u32,
                max: max_parts,
            }
            .into());
        }

        let content: ObjectContent = content.into();
        let size = content.size().value().unwrap_or_default();
        let resp = self
            .client
            .upload_part(
                self.bucket.as_str(),
                self.object.as_str(),
                self.upload_id.as_str(),
                part_number,
                content,
            )
            .send()
            .await?;

        let part = PartInfo::new(part_number, resp.etag, size);
        let mut session = self.lock();
        if session.state.is_terminal() {
            return Err(self.invalid_state(session.state, "upload_part"));
        }
        session.parts.insert(part_number, part.clone());
        if session.state == UploadState::Initiated {
            session.state = UploadState::PartsUploading;
            debug!(
                "multipart upload {}: Initiated -> PartsUploading",
                self.upload_id
            );
        }
        Ok(part)
    }

    /// Lists the parts the server holds for this upload, one page at a time.
    pub async fn list_parts(
        &self,
        part_number_marker: Option<u16>,
        max_parts: Option<u16>,
    ) -> Result<ListPartsResponse, Error> {
        self.ensure_active("list_parts")?;
        self.client
            .list_parts(
                self.bucket.as_str(),
                self.object.as_str(),
                self.upload_id.as_str(),
            )
            .part_number_marker(part_number_marker)
            .max_parts(max_parts)
            .send()
            .await
    }

    /// Assembles the object from `parts`, which must be in ascending
    /// part-number order.
    ///
    /// Valid only after at least one part was uploaded through this session.
    /// A part whose ETag differs from the one recorded locally is rejected
    /// before contacting the server.
    pub async fn complete(&self, parts: Vec<Part>) -> Result<CompleteMultipartUploadResponse, Error> {
        {
            let session = self.lock();
            if session.state != UploadState::PartsUploading {
                return Err(self.invalid_state(session.state, "complete"));
            }
            check_parts(&parts, self.client.limits().max_parts)?;
            for part in &parts {
                if let Some(recorded) = session.parts.get(&part.number) {
                    let listed = trim_quotes(part.etag.clone());
                    if recorded.etag != listed {
                        return Err(ValidationErr::PartEtagMismatch {
                            part_number: part.number,
                            recorded: recorded.etag.clone(),
                            listed,
                        }
                        .into());
                    }
                }
            }
        }

        let resp = self
            .client
            .complete_multipart_upload(
                self.bucket.as_str(),
                self.object.as_str(),
                self.upload_id.as_str(),
                parts,
            )
            .send()
            .await?;

        let mut session = self.lock();
        if session.state != UploadState::PartsUploading {
            return Err(self.invalid_state(session.state, "complete"));
        }
        session.state = UploadState::Completed;
        debug!(
            "multipart upload {}: PartsUploading -> Completed",
            self.upload_id
        );
        Ok(resp)
    }

    /// Completes the upload with every recorded part, in ascending order.
    pub async fn complete_recorded(&self) -> Result<CompleteMultipartUploadResponse, Error> {
        let parts: Vec<Part> = self.lock().parts.values().map(Part::from).collect();
        self.complete(parts).await
    }

    /// Aborts the upload. Aborting an already aborted session is a no-op;
    /// a completed session cannot be aborted.
    pub async fn abort(&self) -> Result<(), Error> {
        let previous = self.lock().state;
        match previous {
            UploadState::Aborted => return Ok(()),
            UploadState::Completed => return Err(self.invalid_state(previous, "abort")),
            UploadState::Initiated | UploadState::PartsUploading => {}
        }

        let resp = self
            .client
            .abort_multipart_upload(
                self.bucket.as_str(),
                self.object.as_str(),
                self.upload_id.as_str(),
            )
            .send()
            .await;
        match resp {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NoSuchUpload => {
                debug!("multipart upload {} already gone: {e}", self.upload_id);
            }
            Err(e) => return Err(e),
        }

        let mut session = self.lock();
        if session.state == UploadState::Completed {
            return Err(self.invalid_state(session.state, "abort"));
        }
        session.state = UploadState::Aborted;
        debug!("multipart upload {}: {previous} -> Aborted", self.upload_id);
        Ok(())
    }
}
