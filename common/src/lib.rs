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

//! Test support for `objectstorage`: in-process fake servers and data helpers.

pub mod flaky;
pub mod gated;
pub mod handler;
pub mod memory_server;
pub mod rand_reader;
pub mod test_context;
pub mod utils;

pub use flaky::FlakyTransport;
pub use gated::GatedTransport;
pub use handler::{HandlerTransport, RecordedRequest};
pub use memory_server::MemoryServer;
pub use test_context::TestContext;
