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

use crate::common_benches::{Ctx2, benchmark_s3_api};

use criterion::Criterion;
use objectstorage::s3::builders::PutObject;
use objectstorage_common::utils::{rand_bytes, rand_object_name};

pub(crate) fn bench_object_put(criterion: &mut Criterion) {
    benchmark_s3_api(
        "object_put",
        criterion,
        || async { Ctx2::new().await },
        |ctx| {
            PutObject::new(
                ctx.client.clone(),
                ctx.bucket.clone(),
                rand_object_name(),
                rand_bytes(1024 * 1024).into(),
            )
        },
    )
}
