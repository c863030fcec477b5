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

//! Endpoint description and URL construction

use crate::s3::error::ValidationErr;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::utils::{match_hostname, urlencode_object_key};
use http::{Method, Uri};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref AWS_S3_ENDPOINT_REGEX: Regex =
        Regex::new(r"^s3(?:[.-](dualstack\.)?([a-z]{2}(?:-gov)?-[a-z]+-\d))?\.amazonaws\.com(\.cn)?$")
            .unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Represents HTTP URL
pub struct Url {
    pub https: bool,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: Multimap,
}

impl Url {
    pub fn host_header_value(&self) -> String {
        if self.port > 0 {
            return format!("{}:{}", self.host, self.port);
        }
        self.host.clone()
    }
}

impl Default for Url {
    fn default() -> Self {
        Self {
            https: true,
            host: String::default(),
            port: u16::default(),
            path: String::from("/"),
            query: Multimap::default(),
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(if self.https { "https://" } else { "http://" })?;
        if self.host.is_empty() {
            f.write_str("<invalid-host>")?;
        } else {
            f.write_str(&self.host_header_value())?;
        }

        if !self.path.starts_with('/') {
            f.write_str("/")?;
        }
        f.write_str(&self.path)?;

        if !self.query.is_empty() {
            f.write_str("?")?;
            f.write_str(&self.query.to_query_string())?;
        }

        Ok(())
    }
}

/// Returns the region embedded in an Amazon S3 host name, or an empty string
/// for the global endpoint. Returns `None` when the host is not Amazon S3.
fn aws_s3_region(host: &str) -> Option<String> {
    let host = host.to_lowercase();
    AWS_S3_ENDPOINT_REGEX
        .captures(&host)
        .map(|caps| caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Represents Base URL of S3 endpoint
///
/// Immutable once constructed. Addressing is virtual-host style for Amazon
/// S3 hosts and path style otherwise; see [`BaseUrl::virtual_style`].
pub struct BaseUrl {
    pub https: bool,
    host: String,
    port: u16,
    pub region: String,
    aws: bool,
    pub virtual_style: bool,
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            https: true,
            host: "127.0.0.1".to_string(),
            port: 9000,
            region: String::new(),
            aws: false,
            virtual_style: false,
        }
    }
}

impl FromStr for BaseUrl {
    type Err = ValidationErr;

    /// Convert a string to a BaseUrl.
    ///
    /// # Examples
    ///
    /// ```
    /// use objectstorage::s3::http::BaseUrl;
    ///
    /// let base_url: BaseUrl = "http://127.0.0.1:9000".parse().unwrap();
    /// assert!(!base_url.https);
    /// let base_url: BaseUrl = "s3.eu-west-1.amazonaws.com".parse().unwrap();
    /// assert_eq!(base_url.region, "eu-west-1");
    /// assert!(base_url.virtual_style);
    /// ```
    fn from_str(s: &str) -> Result<Self, ValidationErr> {
        let url = s.parse::<Uri>()?;

        let https = match url.scheme_str() {
            None | Some("https") => true,
            Some("http") => false,
            Some(_) => {
                return Err(ValidationErr::InvalidBaseUrl(
                    "scheme must be http or https".into(),
                ));
            }
        };

        let host = match url.host() {
            Some(h) if !h.is_empty() => h,
            _ => {
                return Err(ValidationErr::InvalidBaseUrl(
                    "valid host must be provided".into(),
                ));
            }
        };

        let host = if host.parse::<std::net::Ipv6Addr>().is_ok() {
            format!("[{host}]")
        } else {
            host.to_string()
        };

        if !host.starts_with('[')
            && host.parse::<std::net::Ipv4Addr>().is_err()
            && !match_hostname(&host)
        {
            return Err(ValidationErr::InvalidBaseUrl(format!(
                "invalid host name {host}"
            )));
        }

        let mut port = url.port_u16().unwrap_or(0);
        if (https && port == 443) || (!https && port == 80) {
            port = 0;
        }

        if url.path() != "/" && !url.path().is_empty() {
            return Err(ValidationErr::InvalidBaseUrl(
                "path must be empty for base URL".into(),
            ));
        }

        if url.query().is_some() {
            return Err(ValidationErr::InvalidBaseUrl(
                "query must be none for base URL".into(),
            ));
        }

        let (aws, region) = match aws_s3_region(&host) {
            Some(region) => (true, region),
            None => (false, String::new()),
        };

        Ok(BaseUrl {
            https,
            host,
            port,
            region,
            aws,
            virtual_style: aws,
        })
    }
}

impl BaseUrl {
    /// Checks base URL is AWS host
    pub fn is_aws_host(&self) -> bool {
        self.aws
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Builds URL from base URL for given parameters for S3 operation
    pub fn build_url(
        &self,
        method: &Method,
        query: &Multimap,
        bucket_name: Option<&str>,
        object_name: Option<&str>,
    ) -> Result<Url, ValidationErr> {
        let mut url = Url {
            https: self.https,
            host: self.host.clone(),
            port: self.port,
            path: String::from("/"),
            query: query.clone(),
        };

        let Some(bucket) = bucket_name else {
            return Ok(url);
        };

        // CreateBucket requires path style; dotted bucket names break TLS
        // certificate validation in virtual-host style.
        let enforce_path_style = (method == Method::PUT && object_name.is_none() && query.is_empty())
            || (bucket.contains('.') && self.https);

        let mut path = String::new();
        if enforce_path_style || !self.virtual_style {
            path.push('/');
            path.push_str(bucket);
        } else {
            url.host = format!("{bucket}.{}", self.host);
        }

        if let Some(v) = object_name {
            if !v.starts_with('/') {
                path.push('/');
            }
            path.push_str(&urlencode_object_key(v));
        }

        if path.is_empty() {
            path.push('/');
        }
        url.path = path;

        Ok(url)
    }
}
