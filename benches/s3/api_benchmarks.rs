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

mod bench_object_put;
mod bench_read_apis;
mod common_benches;

use criterion::{Criterion, criterion_group, criterion_main};
use std::time::Duration;

use crate::bench_object_put::bench_object_put;
use crate::bench_read_apis::*;

criterion_group!(
    name = benches;
    config = Criterion::default()
        .configure_from_args()
        .warm_up_time(Duration::from_secs_f32(0.01))
        .sample_size(100)
        .measurement_time(Duration::from_secs_f32(5.0));
    targets =
        bench_list_buckets,
        bench_list_objects,
        bench_stat_object,
        bench_get_object,
        bench_object_put,
);
criterion_main!(benches);
