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

use bytes::Bytes;
use futures_util::Stream;
use objectstorage::s3::builders::{ObjectContent, Size};
use rand::prelude::SmallRng;
use rand::{RngCore, SeedableRng};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

const CHUNK_SIZE: u64 = 64 * 1024;

/// Stream of `size` pseudo-random bytes, produced in 64 KiB chunks.
pub struct RandReader {
    size: u64,
    rng: SmallRng,
}

impl RandReader {
    pub fn new(size: u64) -> RandReader {
        RandReader {
            size,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Same bytes for the same seed.
    pub fn seeded(size: u64, seed: u64) -> RandReader {
        RandReader {
            size,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Wraps the reader as streamed object content of known size.
    pub fn into_content(self) -> ObjectContent {
        let size = self.size;
        ObjectContent::new_from_stream(self, Size::Known(size))
    }
}

impl Stream for RandReader {
    type Item = Result<Bytes, io::Error>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.size == 0 {
            return Poll::Ready(None);
        }
        let n = this.size.min(CHUNK_SIZE) as usize;
        let mut buf = vec![0u8; n];
        this.rng.fill_bytes(&mut buf);
        this.size -= n as u64;
        Poll::Ready(Some(Ok(Bytes::from(buf))))
    }
}
