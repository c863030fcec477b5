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
use objectstorage::s3::builders::{GetObject, ListBuckets, ListObjects, StatObject};

pub(crate) fn bench_list_buckets(criterion: &mut Criterion) {
    benchmark_s3_api(
        "list_buckets",
        criterion,
        || async { Ctx2::new().await },
        |ctx| ListBuckets::new(ctx.client.clone()),
    )
}

pub(crate) fn bench_list_objects(criterion: &mut Criterion) {
    benchmark_s3_api(
        "list_objects",
        criterion,
        || async { Ctx2::new_with_object().await },
        |ctx| ListObjects::new(ctx.client.clone(), ctx.bucket.clone()).max_keys(Some(100)),
    )
}

pub(crate) fn bench_stat_object(criterion: &mut Criterion) {
    benchmark_s3_api(
        "stat_object",
        criterion,
        || async { Ctx2::new_with_object().await },
        |ctx| StatObject::new(ctx.client.clone(), ctx.bucket.clone(), ctx.object.clone()),
    )
}

pub(crate) fn bench_get_object(criterion: &mut Criterion) {
    benchmark_s3_api(
        "get_object",
        criterion,
        || async { Ctx2::new_with_object().await },
        |ctx| {
            GetObject::new(ctx.client.clone(), ctx.bucket.clone(), ctx.object.clone()).range(0, 4)
        },
    )
}
