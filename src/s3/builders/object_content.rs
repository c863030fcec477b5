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

use crate::s3::error::{Error, ValidationErr};
use crate::s3::segmented_bytes::SegmentedBytes;
use crate::s3::transport::{ByteStream, RequestBody};
use async_std::io::{ReadExt, WriteExt};
use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use std::path::{Path, PathBuf};
use uuid::Uuid;

type IoResult<T> = core::result::Result<T, std::io::Error>;

const FILE_READ_CHUNK_SIZE: usize = 64 * 1024;

// region: Size

#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub enum Size {
    Known(u64),
    #[default]
    Unknown,
}

impl Size {
    /// Returns `true` if the size is known and `false` otherwise.
    pub fn is_known(&self) -> bool {
        matches!(self, Size::Known(_))
    }

    /// Returns the size if known, otherwise returns `None`.
    pub fn value(&self) -> Option<u64> {
        match self {
            Size::Known(v) => Some(*v),
            Size::Unknown => None,
        }
    }
}

impl From<Option<u64>> for Size {
    fn from(value: Option<u64>) -> Self {
        match value {
            Some(v) => Size::Known(v),
            None => Size::Unknown,
        }
    }
}

impl From<u64> for Size {
    fn from(value: u64) -> Self {
        Size::Known(value)
    }
}

// endregion: Size

/// Object content that can be uploaded or downloaded.
///
/// Can be constructed from a stream of `Bytes`, a file path, or in-memory
/// data. In-memory content is hashed and signed; streamed content is sent
/// with an unsigned payload and never buffered as a whole.
pub struct ObjectContent(ObjectContentInner);

enum ObjectContentInner {
    Stream(ByteStream, Size),
    FilePath(PathBuf),
    Bytes(SegmentedBytes),
}

impl std::fmt::Debug for ObjectContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            ObjectContentInner::Stream(_, size) => write!(f, "ObjectContent::Stream({size:?})"),
            ObjectContentInner::FilePath(p) => write!(f, "ObjectContent::FilePath({p:?})"),
            ObjectContentInner::Bytes(sb) => write!(f, "ObjectContent::Bytes({} bytes)", sb.len()),
        }
    }
}

impl From<SegmentedBytes> for ObjectContent {
    fn from(value: SegmentedBytes) -> Self {
        ObjectContent(ObjectContentInner::Bytes(value))
    }
}

impl From<Bytes> for ObjectContent {
    fn from(value: Bytes) -> Self {
        SegmentedBytes::from(value).into()
    }
}

impl From<String> for ObjectContent {
    fn from(value: String) -> Self {
        SegmentedBytes::from(value).into()
    }
}

impl From<Vec<u8>> for ObjectContent {
    fn from(value: Vec<u8>) -> Self {
        SegmentedBytes::from(value).into()
    }
}

impl From<&'static [u8]> for ObjectContent {
    fn from(value: &'static [u8]) -> Self {
        SegmentedBytes::from(Bytes::from_static(value)).into()
    }
}

impl From<&'static str> for ObjectContent {
    fn from(value: &'static str) -> Self {
        SegmentedBytes::from(value).into()
    }
}

impl From<&Path> for ObjectContent {
    fn from(value: &Path) -> Self {
        ObjectContent(ObjectContentInner::FilePath(value.to_path_buf()))
    }
}

impl Default for ObjectContent {
    fn default() -> Self {
        ObjectContent(ObjectContentInner::Bytes(SegmentedBytes::new()))
    }
}

impl ObjectContent {
    /// Create a new `ObjectContent` from a stream of `Bytes`.
    pub fn new_from_stream(
        r: impl Stream<Item = IoResult<Bytes>> + Send + 'static,
        size: impl Into<Size>,
    ) -> Self {
        ObjectContent(ObjectContentInner::Stream(Box::pin(r), size.into()))
    }

    /// Returns the content size when it is known without consuming the
    /// content. The size of a file that cannot be inspected is unknown.
    pub fn size(&self) -> Size {
        match &self.0 {
            ObjectContentInner::Stream(_, size) => *size,
            ObjectContentInner::FilePath(path) => std::fs::metadata(path)
                .map(|m| Size::Known(m.len()))
                .unwrap_or(Size::Unknown),
            ObjectContentInner::Bytes(sb) => Size::Known(sb.len() as u64),
        }
    }

    pub async fn to_stream(self) -> IoResult<(ByteStream, Size)> {
        match self.0 {
            ObjectContentInner::Stream(r, size) => Ok((r, size)),

            ObjectContentInner::FilePath(path) => {
                let mut file = async_std::fs::File::open(&path).await?;
                let size = file.metadata().await?.len();

                let stream = async_stream::try_stream! {
                    let mut buf = vec![0u8; FILE_READ_CHUNK_SIZE];
                    loop {
                        let n = file.read(&mut buf).await?;
                        if n == 0 {
                            break;
                        }
                        yield Bytes::copy_from_slice(&buf[..n]);
                    }
                };

                Ok((Box::pin(stream), Size::Known(size)))
            }

            ObjectContentInner::Bytes(sb) => {
                let k = sb.len();
                let r = Box::pin(stream::iter(sb.into_iter().map(Ok)));
                Ok((r, Size::Known(k as u64)))
            }
        }
    }

    /// Converts the content into a request body.
    ///
    /// In-memory content stays buffered so it can be hashed and replayed on
    /// retry. Streams must have a known size; the produced stream fails if
    /// the actual length differs from the declared one.
    pub(crate) async fn into_request_body(self) -> Result<RequestBody, Error> {
        if let ObjectContentInner::Bytes(sb) = self.0 {
            return Ok(RequestBody::Buffered(sb));
        }
        let (r, size) = self.to_stream().await?;
        let Size::Known(declared) = size else {
            return Err(ValidationErr::ContentLengthUnknown.into());
        };
        Ok(RequestBody::Streaming {
            stream: Box::pin(length_checked(r, declared)),
            size: declared,
        })
    }

    /// Load the content into memory and return a `SegmentedBytes` object.
    pub async fn to_segmented_bytes(self) -> IoResult<SegmentedBytes> {
        if let ObjectContentInner::Bytes(sb) = self.0 {
            return Ok(sb);
        }
        let mut segmented_bytes = SegmentedBytes::new();
        let (mut r, _) = self.to_stream().await?;
        while let Some(bytes) = r.next().await {
            segmented_bytes.append(bytes?);
        }
        Ok(segmented_bytes)
    }

    /// Write the content to a file and return the number of bytes written.
    ///
    /// The content is first written to a temporary file next to `file_path`,
    /// which is then renamed; an existing file is replaced.
    pub async fn to_file(self, file_path: &Path) -> IoResult<u64> {
        if file_path.is_dir() {
            return Err(std::io::Error::other("path is a directory"));
        }
        let parent_dir = file_path.parent().ok_or(std::io::Error::other(format!(
            "path {file_path:?} does not have a parent directory"
        )))?;
        if !parent_dir.as_os_str().is_empty() && !parent_dir.is_dir() {
            async_std::fs::create_dir_all(parent_dir).await?;
        }
        let file_name = file_path.file_name().ok_or(std::io::Error::other(
            "could not get filename-component of path",
        ))?;
        let mut tmp_file_name = file_name.to_os_string();
        tmp_file_name.push(format!(".{}.part", Uuid::new_v4().simple()));
        let tmp_file_path = parent_dir.join(tmp_file_name);

        let mut total_bytes_written = 0;
        let mut fp = async_std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_file_path)
            .await?;
        let (mut r, _) = self.to_stream().await?;
        while let Some(bytes) = r.next().await {
            let bytes = bytes?;
            total_bytes_written += bytes.len() as u64;
            fp.write_all(&bytes).await?;
        }
        fp.flush().await?;
        async_std::fs::rename(&tmp_file_path, file_path).await?;
        Ok(total_bytes_written)
    }
}

/// Passes chunks through and fails once the stream yields more or fewer
/// bytes than declared.
fn length_checked(
    mut r: ByteStream,
    declared: u64,
) -> impl Stream<Item = IoResult<Bytes>> + Send + 'static {
    async_stream::try_stream! {
        let mut actual: u64 = 0;
        while let Some(bytes) = r.next().await {
            let bytes = bytes?;
            actual += bytes.len() as u64;
            if actual > declared {
                Err::<(), _>(std::io::Error::other(ValidationErr::ContentLengthMismatch { declared, actual }))?;
            }
            yield bytes;
        }
        if actual != declared {
            Err::<(), _>(std::io::Error::other(ValidationErr::ContentLengthMismatch { declared, actual }))?;
        }
    }
}
