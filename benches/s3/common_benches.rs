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

use criterion::Criterion;
use objectstorage::s3::Client;
use objectstorage::s3::transport::RawResponse;
use objectstorage::s3::types::{FromS3Response, S3Api, S3Request, ToS3Request};
use objectstorage_common::TestContext;
use objectstorage_common::utils::rand_object_name;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

pub(crate) struct Ctx2 {
    pub client: Client,
    pub bucket: String,
    pub object: String,
}

impl Ctx2 {
    /// Create a new context with a bucket
    pub async fn new() -> Self {
        let ctx = TestContext::new();
        let bucket = ctx.create_bucket().await;
        Self {
            client: ctx.client,
            bucket,
            object: String::new(),
        }
    }

    /// Create a new context with a bucket and an object
    pub async fn new_with_object() -> Self {
        let mut ctx = Self::new().await;
        let object = rand_object_name();
        ctx.client
            .put_object(&ctx.bucket, &object, "hello, world")
            .send()
            .await
            .unwrap();
        ctx.object = object;
        ctx
    }
}

/// Benchmarks the request building, response parsing and full round trip
/// of one API against an in-process server.
pub(crate) fn benchmark_s3_api<ApiType, GlobalSetupFuture>(
    name: &str,
    criterion: &mut Criterion,
    global_setup: impl Fn() -> GlobalSetupFuture,
    per_iter_setup: impl Fn(&Ctx2) -> ApiType,
) where
    ApiType: S3Api,
    GlobalSetupFuture: Future<Output = Ctx2>,
{
    let rt = Runtime::new().unwrap();
    let mut group = criterion.benchmark_group(name);

    let ctx: Ctx2 = rt.block_on(global_setup());

    group.bench_function("to_s3request", |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;
            for _ in 0..iters {
                let api = per_iter_setup(&ctx);
                let start = Instant::now();
                let _request = api.to_s3request();
                total += start.elapsed();
            }
            total
        })
    });

    group.bench_function("from_s3response", |b| {
        b.iter_custom(|iters| {
            let mut request: S3Request = per_iter_setup(&ctx).to_s3request().unwrap();
            let (status, headers, body) = rt.block_on(async {
                let resp = request.execute().await.unwrap();
                let status = resp.status();
                let headers = resp.headers().clone();
                (status, headers, resp.bytes().await.unwrap())
            });

            let mut total = Duration::ZERO;
            for _ in 0..iters {
                let request = per_iter_setup(&ctx).to_s3request().unwrap();
                let response = Ok(RawResponse::from_bytes(status, headers.clone(), body.clone()));
                let start = Instant::now();
                rt.block_on(async {
                    let _ = <ApiType as S3Api>::S3Response::from_s3response(request, response).await;
                });
                total += start.elapsed();
            }
            total
        })
    });

    group.bench_function("send", |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;
            for _ in 0..iters {
                let api = per_iter_setup(&ctx);
                let start = Instant::now();
                rt.block_on(async {
                    let _ = api.send().await;
                });
                total += start.elapsed();
            }
            total
        })
    });

    group.finish();
}
