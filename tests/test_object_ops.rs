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
use objectstorage::s3::builders::{ObjectContent, Size};
use objectstorage::s3::client::Limits;
use objectstorage::s3::error::ErrorKind;
use objectstorage::s3::multimap_ext::{Multimap, MultimapExt};
use objectstorage::s3::types::S3Api;
use objectstorage::s3::utils::b64encode;
use objectstorage_common::rand_reader::RandReader;
use objectstorage_common::utils::{rand_bytes, rand_object_name};
use objectstorage_common::{HandlerTransport, TestContext};
use std::sync::Arc;

async fn get_bytes(ctx: &TestContext, bucket_name: &str, object_name: &str) -> (Bytes, String) {
    let resp = ctx
        .client
        .get_object(bucket_name, object_name)
        .send()
        .await
        .unwrap();
    let etag = resp.etag.clone();
    let data = resp.content.to_segmented_bytes().await.unwrap().to_bytes();
    (data, etag)
}

#[tokio::test]
async fn put_then_get_returns_same_content_and_etag() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;

    for object_name in [rand_object_name(), "name with+spaces/ü.txt".to_string()] {
        let data = rand_bytes(4096);
        let put = ctx
            .client
            .put_object(&bucket_name, &object_name, data.clone())
            .send()
            .await
            .unwrap();
        assert_eq!(put.bucket, bucket_name);
        assert_eq!(put.object, object_name);
        assert!(!put.etag.starts_with('"'));

        let (got, etag) = get_bytes(&ctx, &bucket_name, &object_name).await;
        assert_eq!(got, data);
        assert_eq!(etag, put.etag);
    }
}

#[tokio::test]
async fn put_then_stat_reports_size_and_metadata() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let object_name = rand_object_name();

    let mut metadata = Multimap::new();
    metadata.add("color", "blue");
    ctx.client
        .put_object(&bucket_name, &object_name, rand_bytes(1234))
        .content_type(Some("text/plain".into()))
        .user_metadata(Some(metadata))
        .send()
        .await
        .unwrap();

    let stat = ctx
        .client
        .stat_object(&bucket_name, &object_name)
        .send()
        .await
        .unwrap();
    assert_eq!(stat.size, 1234);
    assert_eq!(stat.content_type.as_deref(), Some("text/plain"));
    assert_eq!(stat.user_metadata.get("color").map(String::as_str), Some("blue"));
    assert!(stat.last_modified.is_some());
}

#[tokio::test]
async fn put_streamed_content() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let object_name = rand_object_name();
    let size = 300 * 1024;

    ctx.client
        .put_object(&bucket_name, &object_name, RandReader::seeded(size, 7).into_content())
        .send()
        .await
        .unwrap();

    let request = ctx.server.requests().pop().unwrap();
    assert_eq!(request.header("x-amz-content-sha256"), Some("UNSIGNED-PAYLOAD"));
    assert_eq!(request.header("Content-Length"), Some(size.to_string().as_str()));

    let expected = RandReader::seeded(size, 7)
        .into_content()
        .to_segmented_bytes()
        .await
        .unwrap()
        .to_bytes();
    let (got, _) = get_bytes(&ctx, &bucket_name, &object_name).await;
    assert_eq!(got, expected);
}

#[tokio::test]
async fn put_file_content() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let object_name = rand_object_name();

    let data = rand_bytes(70 * 1024);
    let path = std::env::temp_dir().join(format!("objectstorage-{object_name}"));
    std::fs::write(&path, &data).unwrap();

    let result = ctx
        .client
        .put_object(&bucket_name, &object_name, path.as_path())
        .send()
        .await;
    std::fs::remove_file(&path).unwrap();
    result.unwrap();

    let (got, _) = get_bytes(&ctx, &bucket_name, &object_name).await;
    assert_eq!(got, data);
}

#[tokio::test]
async fn put_with_content_md5() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let object_name = rand_object_name();

    ctx.client
        .put_object(&bucket_name, &object_name, "hello, world")
        .content_md5(true)
        .send()
        .await
        .unwrap();

    let request = ctx.server.requests().pop().unwrap();
    let expected = b64encode(md5::compute(b"hello, world").0);
    assert_eq!(request.header("Content-MD5"), Some(expected.as_str()));
}

#[tokio::test]
async fn put_rejects_oversized_and_unsized_content_locally() {
    let transport = Arc::new(HandlerTransport::fixed(200, ""));
    let client = TestContext::client_builder(transport.clone())
        .limits(Limits::default().max_single_put_size(10))
        .build()
        .unwrap();

    let err = client
        .put_object("bucket", "too-big", vec![0u8; 11])
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EntityTooLarge);

    let content = ObjectContent::new_from_stream(RandReader::new(5), Size::Unknown);
    let err = client
        .put_object("bucket", "unsized", content)
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = client.put_object("bucket", "", "x").send().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn server_entity_too_large() {
    let transport = Arc::new(HandlerTransport::new(|_| {
        objectstorage::s3::transport::RawResponse::from_bytes(413, Default::default(), "")
    }));
    let client = TestContext::client_builder(transport).build().unwrap();

    let err = client
        .put_object("bucket", "object", "data")
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EntityTooLarge);
    assert_eq!(err.http_status(), Some(413));
}

#[tokio::test]
async fn get_object_ranges() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let object_name = rand_object_name();
    ctx.client
        .put_object(&bucket_name, &object_name, "0123456789")
        .send()
        .await
        .unwrap();

    let read = |builder: objectstorage::s3::builders::GetObject| async move {
        let resp = builder.send().await.unwrap();
        let size = resp.object_size;
        let data = resp.content.to_segmented_bytes().await.unwrap().to_bytes();
        (size, data)
    };

    let (size, data) = read(ctx.client.get_object(&bucket_name, &object_name).range(0, 4)).await;
    assert_eq!(size, 5);
    assert_eq!(data, "01234");

    let get = ctx
        .client
        .get_object(&bucket_name, &object_name)
        .offset(Some(3))
        .length(Some(4));
    assert_eq!(read(get).await.1, "3456");

    let get = ctx
        .client
        .get_object(&bucket_name, &object_name)
        .offset(Some(7));
    assert_eq!(read(get).await.1, "789");

    let err = ctx
        .client
        .get_object(&bucket_name, &object_name)
        .range(5, 2)
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let sent = ctx.server.requests().len();
    let err = ctx
        .client
        .get_object(&bucket_name, &object_name)
        .offset(Some(u64::MAX))
        .length(Some(2))
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(ctx.server.requests().len(), sent);

    let err = ctx
        .client
        .get_object(&bucket_name, &object_name)
        .offset(Some(10))
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(err.http_status(), Some(416));
}

#[tokio::test]
async fn missing_objects() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let object_name = rand_object_name();

    let err = ctx
        .client
        .get_object(&bucket_name, &object_name)
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSuchKey);
    let er = err.s3_error_response().unwrap();
    assert_eq!(er.resource(), format!("/{bucket_name}/{object_name}"));

    let err = ctx
        .client
        .stat_object(&bucket_name, &object_name)
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSuchKey);
    assert_eq!(err.http_status(), Some(404));

    let err = ctx
        .client
        .get_object("no-such-bucket", &object_name)
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSuchBucket);
}

#[tokio::test]
async fn delete_object_is_idempotent() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let object_name = rand_object_name();

    ctx.client
        .delete_object(&bucket_name, "never-existed")
        .send()
        .await
        .unwrap();

    ctx.client
        .put_object(&bucket_name, &object_name, "data")
        .send()
        .await
        .unwrap();
    for _ in 0..2 {
        ctx.client
            .delete_object(&bucket_name, &object_name)
            .send()
            .await
            .unwrap();
    }
    assert!(ctx.server.object_data(&bucket_name, &object_name).is_none());
}

#[tokio::test]
async fn delete_object_treats_no_such_key_as_success() {
    let transport = Arc::new(HandlerTransport::fixed(
        404,
        "<Error><Code>NoSuchKey</Code><Message>gone</Message></Error>",
    ));
    let client = TestContext::client_builder(transport).build().unwrap();

    let resp = client
        .delete_object("bucket", "object")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.object, "object");
    assert!(resp.headers.is_empty());
}
