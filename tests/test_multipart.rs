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

use bytes::{Bytes, BytesMut};
use http::HeaderMap;
use http::header::{ETAG, HeaderValue};
use objectstorage::s3::error::{Error, ErrorKind};
use objectstorage::s3::error_response::S3ErrorCode;
use objectstorage::s3::multipart::UploadState;
use objectstorage::s3::transport::RawResponse;
use objectstorage::s3::types::{Part, S3Api};
use objectstorage_common::utils::rand_bytes;
use objectstorage_common::{GatedTransport, HandlerTransport, RecordedRequest, TestContext};
use std::sync::Arc;

const MIB: usize = 1024 * 1024;

fn complete_requests(ctx: &TestContext) -> usize {
    ctx.server
        .requests()
        .iter()
        .filter(|r| r.method == http::Method::POST && r.query_param("uploadId").is_some())
        .count()
}

#[tokio::test]
async fn eight_mib_upload_in_two_parts() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;

    let upload = ctx
        .client
        .initiate_multipart_upload(&bucket_name, "big.bin")
        .await
        .unwrap();
    assert_eq!(upload.state(), UploadState::Initiated);
    assert_eq!(upload.bucket(), bucket_name);
    assert_eq!(upload.object(), "big.bin");

    let first = rand_bytes(5 * MIB);
    let second = rand_bytes(3 * MIB);
    let p1 = upload.upload_part(1, first.clone()).await.unwrap();
    assert_eq!(upload.state(), UploadState::PartsUploading);
    let p2 = upload.upload_part(2, second.clone()).await.unwrap();
    assert_eq!(p1.size, (5 * MIB) as u64);
    assert_eq!(p2.size, (3 * MIB) as u64);

    let resp = upload
        .complete(vec![Part::new(1, p1.etag), Part::new(2, p2.etag)])
        .await
        .unwrap();
    assert_eq!(upload.state(), UploadState::Completed);
    assert!(resp.etag.ends_with("-2"));
    assert_eq!(resp.object, "big.bin");

    let stat = ctx
        .client
        .stat_object(&bucket_name, "big.bin")
        .send()
        .await
        .unwrap();
    assert_eq!(stat.size, (8 * MIB) as u64);
    assert_eq!(stat.etag, resp.etag);

    let mut expected = BytesMut::from(first.as_ref());
    expected.extend_from_slice(&second);
    assert_eq!(
        ctx.server.object_data(&bucket_name, "big.bin").unwrap(),
        expected.freeze()
    );
    assert_eq!(ctx.server.pending_uploads(), 0);
}

#[tokio::test]
async fn completed_session_is_final() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let upload = ctx
        .client
        .initiate_multipart_upload(&bucket_name, "final.bin")
        .await
        .unwrap();
    let part = upload.upload_part(1, "only part").await.unwrap();
    let manifest = vec![Part::from(&part)];

    upload.complete(manifest.clone()).await.unwrap();

    let err = upload.complete(manifest).await.unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidState {
            state: UploadState::Completed,
            operation: "complete",
            ..
        }
    ));
    assert_eq!(complete_requests(&ctx), 1);

    let err = upload.upload_part(2, "late").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = upload.abort().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = upload.list_parts(None, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(upload.state(), UploadState::Completed);
}

#[tokio::test]
async fn abort_is_idempotent() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let upload = ctx
        .client
        .initiate_multipart_upload(&bucket_name, "aborted.bin")
        .await
        .unwrap();
    upload.upload_part(1, "data").await.unwrap();
    assert_eq!(ctx.server.pending_uploads(), 1);

    upload.abort().await.unwrap();
    assert_eq!(upload.state(), UploadState::Aborted);
    assert_eq!(ctx.server.pending_uploads(), 0);

    let requests_before = ctx.server.requests().len();
    upload.abort().await.unwrap();
    assert_eq!(ctx.server.requests().len(), requests_before);

    let err = upload.upload_part(2, "data").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = upload.complete_recorded().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(
        ctx.server
            .object_data(&bucket_name, "aborted.bin")
            .is_none()
    );
}

#[tokio::test]
async fn abort_of_vanished_upload_succeeds() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let upload = ctx
        .client
        .initiate_multipart_upload(&bucket_name, "gone.bin")
        .await
        .unwrap();

    ctx.client
        .abort_multipart_upload(&bucket_name, "gone.bin", upload.upload_id())
        .send()
        .await
        .unwrap();
    let err = ctx
        .client
        .abort_multipart_upload(&bucket_name, "gone.bin", upload.upload_id())
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSuchUpload);

    upload.abort().await.unwrap();
    assert_eq!(upload.state(), UploadState::Aborted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn abort_during_complete_wins() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let gate = Arc::new(GatedTransport::new(ctx.server.clone(), |req| {
        req.method == http::Method::POST && req.url.query.contains_key("uploadId")
    }));
    let client = TestContext::client_builder(gate.clone()).build().unwrap();

    let upload = client
        .initiate_multipart_upload(&bucket_name, "race.bin")
        .await
        .unwrap();
    upload.upload_part(1, rand_bytes(1024)).await.unwrap();

    let completing = tokio::spawn({
        let upload = upload.clone();
        async move { upload.complete_recorded().await }
    });

    // The server has assembled the object, the session has not seen it yet.
    gate.answered().await;
    upload.abort().await.unwrap();
    assert_eq!(upload.state(), UploadState::Aborted);
    gate.release();

    let err = completing.await.unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(matches!(
        err,
        Error::InvalidState {
            state: UploadState::Aborted,
            operation: "complete",
            ..
        }
    ));
    assert_eq!(upload.state(), UploadState::Aborted);
}

#[tokio::test]
async fn invalid_manifests_are_rejected_locally() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let upload = ctx
        .client
        .initiate_multipart_upload(&bucket_name, "manifest.bin")
        .await
        .unwrap();
    let p1 = upload.upload_part(1, rand_bytes(5 * MIB)).await.unwrap();
    let p2 = upload.upload_part(2, "tail").await.unwrap();

    let manifests = [
        vec![],
        vec![Part::from(&p2), Part::from(&p1)],
        vec![Part::from(&p1), Part::from(&p1)],
        vec![Part::new(0, "x")],
        vec![Part::new(1, "not-the-recorded-etag")],
    ];
    for manifest in manifests {
        let err = upload.complete(manifest).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{err}");
    }
    assert_eq!(complete_requests(&ctx), 0);
    assert_eq!(upload.state(), UploadState::PartsUploading);

    let quoted = Part::new(1, format!("\"{}\"", p1.etag));
    upload.complete(vec![quoted, Part::from(&p2)]).await.unwrap();
    assert_eq!(upload.state(), UploadState::Completed);
}

#[tokio::test]
async fn server_rejected_part_keeps_session_open() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let upload = ctx
        .client
        .initiate_multipart_upload(&bucket_name, "retry.bin")
        .await
        .unwrap();
    upload.upload_part(1, "first").await.unwrap();

    let err = upload
        .complete(vec![Part::new(2, "0123456789abcdef")])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(
        err.s3_error_response().map(|e| e.code().clone()),
        Some(S3ErrorCode::InvalidPart)
    );
    assert_eq!(upload.state(), UploadState::PartsUploading);
    assert_eq!(upload.recorded_parts().len(), 1);

    upload.complete_recorded().await.unwrap();
    assert_eq!(
        ctx.server.object_data(&bucket_name, "retry.bin").unwrap(),
        "first"
    );
}

#[tokio::test]
async fn reuploading_a_part_replaces_it() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let upload = ctx
        .client
        .initiate_multipart_upload(&bucket_name, "replace.bin")
        .await
        .unwrap();

    let old = upload.upload_part(1, "old content").await.unwrap();
    let new = upload.upload_part(1, "new content").await.unwrap();
    assert_ne!(old.etag, new.etag);

    let recorded = upload.recorded_parts();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].etag, new.etag);

    upload.complete_recorded().await.unwrap();
    assert_eq!(
        ctx.server.object_data(&bucket_name, "replace.bin").unwrap(),
        "new content"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_part_uploads_share_one_session() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let upload = ctx
        .client
        .initiate_multipart_upload(&bucket_name, "parallel.bin")
        .await
        .unwrap();

    let parts: Vec<Bytes> = (0..4)
        .map(|i| match i {
            3 => rand_bytes(1024),
            _ => rand_bytes(5 * MIB),
        })
        .collect();

    let mut handles = Vec::new();
    for (i, data) in parts.iter().enumerate() {
        let upload = upload.clone();
        let data = data.clone();
        handles.push(tokio::spawn(async move {
            upload.upload_part(i as u16 + 1, data).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let recorded = upload.recorded_parts();
    let numbers: Vec<u16> = recorded.iter().map(|p| p.number).collect();
    assert_eq!(numbers, [1, 2, 3, 4]);

    let listed = upload.list_parts(None, None).await.unwrap();
    assert_eq!(listed.parts.len(), 4);
    for (listed, recorded) in listed.parts.iter().zip(&recorded) {
        assert_eq!(listed.etag, recorded.etag);
        assert_eq!(listed.size, recorded.size);
    }

    upload.complete_recorded().await.unwrap();
    let expected: Vec<u8> = parts.iter().flat_map(|p| p.iter().copied()).collect();
    assert_eq!(
        ctx.server.object_data(&bucket_name, "parallel.bin").unwrap(),
        expected
    );
}

#[tokio::test]
async fn list_parts_pages() {
    let ctx = TestContext::new();
    let bucket_name = ctx.create_bucket().await;
    let upload = ctx
        .client
        .initiate_multipart_upload(&bucket_name, "pages.bin")
        .await
        .unwrap();
    for n in 1..=3u16 {
        upload.upload_part(n, format!("part {n}")).await.unwrap();
    }

    let page = upload.list_parts(None, Some(2)).await.unwrap();
    assert!(page.is_truncated);
    assert_eq!(page.upload_id, upload.upload_id());
    assert_eq!(page.parts.iter().map(|p| p.number).collect::<Vec<_>>(), [1, 2]);
    assert_eq!(page.next_part_number_marker, Some(2));

    let page = upload
        .list_parts(page.next_part_number_marker, Some(2))
        .await
        .unwrap();
    assert!(!page.is_truncated);
    assert_eq!(page.parts.len(), 1);
    assert_eq!(page.parts[0].number, 3);
    assert_eq!(page.parts[0].size, 6);
}

fn answer_complete_with_error(request: &RecordedRequest) -> RawResponse {
    match (&request.method, request.query_param("uploadId")) {
        (&http::Method::POST, None) => RawResponse::from_bytes(
            200,
            HeaderMap::new(),
            "<InitiateMultipartUploadResult><Bucket>bucket</Bucket><Key>key</Key>\
             <UploadId>u-1</UploadId></InitiateMultipartUploadResult>",
        ),
        (&http::Method::PUT, Some(_)) => {
            let mut headers = HeaderMap::new();
            headers.insert(ETAG, HeaderValue::from_static("\"abc\""));
            RawResponse::from_bytes(200, headers, Bytes::new())
        }
        _ => RawResponse::from_bytes(
            200,
            HeaderMap::new(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\n<Error><Code>InternalError</Code>\
             <Message>We encountered an internal error. Please try again.</Message>\
             <RequestId>REQ-200</RequestId></Error>",
        ),
    }
}

#[tokio::test]
async fn complete_with_error_in_200_body_fails() {
    let transport = Arc::new(HandlerTransport::new(answer_complete_with_error));
    let client = TestContext::client_builder(transport.clone())
        .build()
        .unwrap();

    let upload = client
        .initiate_multipart_upload("bucket", "key")
        .await
        .unwrap();
    assert_eq!(upload.upload_id(), "u-1");
    upload.upload_part(1, "data").await.unwrap();

    let err = upload.complete_recorded().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert_eq!(err.request_id(), Some("REQ-200"));
    assert_eq!(err.http_status(), Some(200));
    assert_eq!(upload.state(), UploadState::PartsUploading);

    let posts = transport
        .requests()
        .iter()
        .filter(|r| r.method == http::Method::POST)
        .count();
    assert_eq!(posts, 2);
}
