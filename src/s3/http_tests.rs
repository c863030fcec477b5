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

use super::http::{BaseUrl, Url};
use super::multimap_ext::{Multimap, MultimapExt};
use http::Method;

// ===========================
// Url Tests
// ===========================

#[test]
fn test_url_default() {
    let url = Url::default();
    assert!(url.https);
    assert!(url.host.is_empty());
    assert_eq!(url.port, 0);
    assert_eq!(url.path, "/");
    assert!(url.query.is_empty());
}

#[test]
fn test_url_host_header_value() {
    let mut url = Url {
        host: "example.com".to_string(),
        port: 9000,
        ..Default::default()
    };
    assert_eq!(url.host_header_value(), "example.com:9000");
    url.port = 0;
    assert_eq!(url.host_header_value(), "example.com");
}

#[test]
fn test_url_display() {
    let url = Url {
        https: false,
        host: "localhost".to_string(),
        port: 9000,
        path: "bucket/object".to_string(),
        query: Multimap::default(),
    };
    assert_eq!(url.to_string(), "http://localhost:9000/bucket/object");

    let mut query = Multimap::default();
    query.add("uploadId", "a b");
    let url = Url {
        host: "s3.amazonaws.com".to_string(),
        path: "/bucket/key".to_string(),
        query,
        ..Default::default()
    };
    assert_eq!(
        url.to_string(),
        "https://s3.amazonaws.com/bucket/key?uploadId=a%20b"
    );
}

#[test]
fn test_url_display_empty_host() {
    let url = Url::default();
    assert_eq!(url.to_string(), "https://<invalid-host>/");
}

// ===========================
// BaseUrl Parsing Tests
// ===========================

#[test]
fn test_base_url_parse_local() {
    let base_url: BaseUrl = "http://127.0.0.1:9000".parse().unwrap();
    assert!(!base_url.https);
    assert_eq!(base_url.host(), "127.0.0.1");
    assert_eq!(base_url.port(), 9000);
    assert!(!base_url.is_aws_host());
    assert!(!base_url.virtual_style);
    assert!(base_url.region.is_empty());
}

#[test]
fn test_base_url_default_ports_are_dropped() {
    let base_url: BaseUrl = "https://storage.local:443".parse().unwrap();
    assert_eq!(base_url.port(), 0);
    let base_url: BaseUrl = "http://storage.local:80".parse().unwrap();
    assert_eq!(base_url.port(), 0);
    let base_url: BaseUrl = "storage.local:9000".parse().unwrap();
    assert!(base_url.https);
    assert_eq!(base_url.port(), 9000);
}

#[test]
fn test_base_url_parse_ipv6() {
    let base_url: BaseUrl = "http://[::1]:9000".parse().unwrap();
    assert_eq!(base_url.host(), "[::1]");
}

#[test]
fn test_base_url_parse_aws() {
    let base_url: BaseUrl = "s3.amazonaws.com".parse().unwrap();
    assert!(base_url.is_aws_host());
    assert!(base_url.virtual_style);
    assert!(base_url.region.is_empty());

    let base_url: BaseUrl = "https://s3.eu-west-1.amazonaws.com".parse().unwrap();
    assert!(base_url.is_aws_host());
    assert_eq!(base_url.region, "eu-west-1");
}

#[test]
fn test_base_url_parse_errors() {
    assert!("ftp://localhost".parse::<BaseUrl>().is_err());
    assert!("http://localhost:9000/path".parse::<BaseUrl>().is_err());
    assert!("http://localhost:9000/?query=1".parse::<BaseUrl>().is_err());
    assert!("http://-bad-.host".parse::<BaseUrl>().is_err());
}

// ===========================
// URL Building Tests
// ===========================

#[test]
fn test_build_url_path_style() {
    let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
    let query = Multimap::new();

    let url = base_url
        .build_url(&Method::GET, &query, None, None)
        .unwrap();
    assert_eq!(url.to_string(), "http://localhost:9000/");

    let url = base_url
        .build_url(&Method::GET, &query, Some("bucket1"), None)
        .unwrap();
    assert_eq!(url.to_string(), "http://localhost:9000/bucket1");

    let url = base_url
        .build_url(&Method::GET, &query, Some("bucket1"), Some("dir/my file.txt"))
        .unwrap();
    assert_eq!(
        url.to_string(),
        "http://localhost:9000/bucket1/dir/my%20file.txt"
    );
}

#[test]
fn test_build_url_virtual_style() {
    let base_url: BaseUrl = "https://s3.us-west-2.amazonaws.com".parse().unwrap();
    let query = Multimap::new();

    let url = base_url
        .build_url(&Method::GET, &query, Some("bucket1"), Some("a.txt"))
        .unwrap();
    assert_eq!(url.host, "bucket1.s3.us-west-2.amazonaws.com");
    assert_eq!(url.path, "/a.txt");

    let url = base_url
        .build_url(&Method::GET, &query, Some("bucket1"), None)
        .unwrap();
    assert_eq!(url.host, "bucket1.s3.us-west-2.amazonaws.com");
    assert_eq!(url.path, "/");
}

#[test]
fn test_build_url_forces_path_style() {
    let base_url: BaseUrl = "https://s3.us-west-2.amazonaws.com".parse().unwrap();
    let query = Multimap::new();

    // create bucket
    let url = base_url
        .build_url(&Method::PUT, &query, Some("bucket1"), None)
        .unwrap();
    assert_eq!(url.host, "s3.us-west-2.amazonaws.com");
    assert_eq!(url.path, "/bucket1");

    // dotted bucket over TLS
    let url = base_url
        .build_url(&Method::GET, &query, Some("my.bucket"), Some("k"))
        .unwrap();
    assert_eq!(url.host, "s3.us-west-2.amazonaws.com");
    assert_eq!(url.path, "/my.bucket/k");
}

#[test]
fn test_build_url_keeps_query() {
    let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
    let mut query = Multimap::new();
    query.add("partNumber", "3");
    let url = base_url
        .build_url(&Method::PUT, &query, Some("bucket1"), Some("big.bin"))
        .unwrap();
    assert_eq!(
        url.to_string(),
        "http://localhost:9000/bucket1/big.bin?partNumber=3"
    );
}
