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

use objectstorage::s3::error::ErrorKind;
use objectstorage::s3::response::ListObjectsResponse;
use objectstorage::s3::types::S3Api;
use objectstorage_common::utils::rand_bucket_name;
use objectstorage_common::{HandlerTransport, TestContext};
use std::sync::Arc;

#[tokio::test]
async fn create_then_list_includes_bucket_once() {
    let ctx = TestContext::new();
    let names = [rand_bucket_name(), rand_bucket_name(), rand_bucket_name()];
    for name in &names {
        ctx.client.create_bucket(name).send().await.unwrap();
    }

    let resp = ctx.client.list_buckets().send().await.unwrap();
    for name in &names {
        let count = resp.buckets.iter().filter(|b| b.name.as_str() == name).count();
        assert_eq!(count, 1, "bucket {name} listed {count} times");
    }
    let listed: Vec<&str> = resp.buckets.iter().map(|b| b.name.as_str()).collect();
    let mut sorted = listed.clone();
    sorted.sort();
    assert_eq!(listed, sorted);
}

#[tokio::test]
async fn create_existing_bucket_fails() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;

    let err = ctx.client.create_bucket(&bucket_name).send().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BucketAlreadyExists);
    assert_eq!(err.http_status(), Some(409));
    assert!(err.request_id().is_some());
}

#[tokio::test]
async fn invalid_bucket_name_is_rejected_before_sending() {
    let transport = Arc::new(HandlerTransport::fixed(200, ""));
    let client = TestContext::client_builder(transport.clone())
        .build()
        .unwrap();

    for name in ["ab", "Has_Upper", "192.168.1.1", "a..b", "-leading"] {
        let err = client.create_bucket(name).send().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{name}");
    }
    let err = client.list_objects("x").send().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn create_bucket_sends_location_constraint_outside_default_region() {
    let transport = Arc::new(HandlerTransport::fixed(200, ""));
    let client = TestContext::client_builder(transport.clone())
        .build()
        .unwrap();

    client
        .create_bucket("in-default-region")
        .send()
        .await
        .unwrap();
    client
        .create_bucket("in-eu")
        .region(Some("eu-west-1".into()))
        .send()
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].body.is_empty());
    let body = String::from_utf8(requests[1].body.to_vec()).unwrap();
    assert!(body.contains("<LocationConstraint>eu-west-1</LocationConstraint>"));
    assert_eq!(requests[1].path, "/in-eu");
}

#[tokio::test]
async fn delete_bucket() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    ctx.client
        .put_object(&bucket_name, "keep.txt", "data")
        .send()
        .await
        .unwrap();

    let err = ctx.client.delete_bucket(&bucket_name).send().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BucketNotEmpty);

    ctx.client
        .delete_object(&bucket_name, "keep.txt")
        .send()
        .await
        .unwrap();
    ctx.client.delete_bucket(&bucket_name).send().await.unwrap();

    let err = ctx.client.delete_bucket(&bucket_name).send().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSuchBucket);

    let resp = ctx.client.list_buckets().send().await.unwrap();
    assert!(resp.buckets.iter().all(|b| b.name.as_str() != bucket_name));
}

async fn put_keys(ctx: &TestContext, bucket_name: &str, keys: &[&str]) {
    for key in keys {
        ctx.client
            .put_object(bucket_name, *key, "x")
            .send()
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn list_objects_paginates_with_marker() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let keys = ["a/1", "a/2", "a/3", "b/1", "c"];
    put_keys(&ctx, &bucket_name, &keys).await;

    let mut marker: Option<String> = None;
    let mut seen: Vec<String> = Vec::new();
    let mut pages = 0;
    loop {
        let resp: ListObjectsResponse = ctx
            .client
            .list_objects(&bucket_name)
            .max_keys(Some(2))
            .marker(marker.clone())
            .send()
            .await
            .unwrap();
        pages += 1;
        seen.extend(resp.objects().map(|e| e.name.clone()));
        if !resp.is_truncated {
            break;
        }
        assert_eq!(resp.next_marker.as_deref(), seen.last().map(String::as_str));
        marker = resp.next_marker;
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, keys);
}

#[tokio::test]
async fn list_objects_with_prefix_and_delimiter() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    put_keys(&ctx, &bucket_name, &["a/1", "a/2", "a/sub/3", "b/1", "c d"]).await;

    let resp = ctx
        .client
        .list_objects(&bucket_name)
        .delimiter(Some("/".into()))
        .send()
        .await
        .unwrap();
    let objects: Vec<&str> = resp.objects().map(|e| e.name.as_str()).collect();
    let prefixes: Vec<&str> = resp.common_prefixes().collect();
    assert_eq!(objects, ["c d"]);
    assert_eq!(prefixes, ["a/", "b/"]);

    let resp = ctx
        .client
        .list_objects(&bucket_name)
        .prefix(Some("a/".into()))
        .delimiter(Some("/".into()))
        .send()
        .await
        .unwrap();
    let objects: Vec<&str> = resp.objects().map(|e| e.name.as_str()).collect();
    let prefixes: Vec<&str> = resp.common_prefixes().collect();
    assert_eq!(objects, ["a/1", "a/2"]);
    assert_eq!(prefixes, ["a/sub/"]);
    assert_eq!(resp.prefix.as_deref(), Some("a/"));

    let entry = resp.objects().next().unwrap();
    assert_eq!(entry.size, Some(1));
    assert!(entry.etag.as_deref().is_some_and(|e| !e.starts_with('"')));
}

#[tokio::test]
async fn list_objects_on_missing_bucket() {
    let ctx = TestContext::new();
    let err = ctx
        .client
        .list_objects(rand_bucket_name())
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSuchBucket);
}
