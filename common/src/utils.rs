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
use objectstorage::s3::multimap_ext::Multimap;
use rand::RngCore;
use rand::distr::{Alphanumeric, SampleString};

pub fn rand_bucket_name() -> String {
    format!(
        "test-{}",
        Alphanumeric.sample_string(&mut rand::rng(), 8).to_lowercase()
    )
}

pub fn rand_object_name() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 8)
}

/// Returns `size` random bytes.
pub fn rand_bytes(size: usize) -> Bytes {
    let mut buf = vec![0u8; size];
    rand::rng().fill_bytes(&mut buf);
    Bytes::from(buf)
}

/// Case-insensitive header lookup.
pub fn header<'a>(headers: &'a Multimap, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Installs `env_logger` for the test binary; later calls are no-ops.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
