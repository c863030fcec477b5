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

//! Signature V4 for S3 API
//!
//! Signing is a pure function of its inputs: the caller supplies the date,
//! so the same request signed twice at the same instant yields the same
//! `Authorization` header.

use crate::s3::creds::Credentials;
use crate::s3::header_constants::{AUTHORIZATION, X_AMZ_SECURITY_TOKEN};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::utils::{UtcTime, sha256_hash, to_amz_date, to_signer_date};
use hmac::{Hmac, Mac};
use http::Method;
use sha2::Sha256;

pub const SIGN_V4_ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE_NAME: &str = "s3";

/// Returns HMAC hash for given key and data
fn hmac_hash(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut hasher = Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
    hasher.update(data);
    hasher.finalize().into_bytes().to_vec()
}

/// Returns scope value of given date, region and service name
pub(crate) fn get_scope(date: UtcTime, region: &str, service_name: &str) -> String {
    format!(
        "{}/{region}/{service_name}/aws4_request",
        to_signer_date(date)
    )
}

/// Returns the canonical request for given request parts
pub(crate) fn get_canonical_request(
    method: &Method,
    uri: &str,
    query_string: &str,
    headers: &str,
    signed_headers: &str,
    content_sha256: &str,
) -> String {
    // CanonicalRequest =
    //   HTTPRequestMethod + '\n' +
    //   CanonicalURI + '\n' +
    //   CanonicalQueryString + '\n' +
    //   CanonicalHeaders + '\n\n' +
    //   SignedHeaders + '\n' +
    //   HexEncode(Hash(RequestPayload))
    format!("{method}\n{uri}\n{query_string}\n{headers}\n\n{signed_headers}\n{content_sha256}")
}

/// Returns string-to-sign value of given date, scope and canonical request hash
pub(crate) fn get_string_to_sign(
    date: UtcTime,
    scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!(
        "{SIGN_V4_ALGORITHM}\n{}\n{scope}\n{canonical_request_hash}",
        to_amz_date(date)
    )
}

/// Returns signing key of given secret key, date, region and service name
pub(crate) fn get_signing_key(
    secret_key: &str,
    date: UtcTime,
    region: &str,
    service_name: &str,
) -> Vec<u8> {
    let mut key: Vec<u8> = b"AWS4".to_vec();
    key.extend(secret_key.as_bytes());

    let date_key = hmac_hash(&key, to_signer_date(date).as_bytes());
    let date_region_key = hmac_hash(&date_key, region.as_bytes());
    let date_region_service_key = hmac_hash(&date_region_key, service_name.as_bytes());
    hmac_hash(&date_region_service_key, b"aws4_request")
}

/// Returns hex encoded signature for given signing key and string-to-sign
pub(crate) fn get_signature(signing_key: &[u8], string_to_sign: &[u8]) -> String {
    hex::encode(hmac_hash(signing_key, string_to_sign))
}

/// Returns authorization value for given access key, scope, signed headers and signature
pub(crate) fn get_authorization(
    access_key: &str,
    scope: &str,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{SIGN_V4_ALGORITHM} Credential={access_key}/{scope}, SignedHeaders={signed_headers}, Signature={signature}"
    )
}

/// Signs an S3 request and inserts the `Authorization` header.
///
/// `headers` must already contain `Host`, `x-amz-date` and
/// `x-amz-content-sha256`. When the credentials carry a session token the
/// `x-amz-security-token` header is added before signing so that it is
/// covered by the signature. Any previous `Authorization` header is replaced,
/// which allows a request to be re-signed on retry.
#[allow(clippy::too_many_arguments)]
pub fn sign_v4_s3(
    method: &Method,
    uri: &str,
    region: &str,
    headers: &mut Multimap,
    query_params: &Multimap,
    creds: &Credentials,
    content_sha256: &str,
    date: UtcTime,
) {
    headers.remove(AUTHORIZATION);
    if let Some(token) = &creds.session_token
        && !headers.contains_key_ignore_case(X_AMZ_SECURITY_TOKEN)
    {
        headers.add(X_AMZ_SECURITY_TOKEN, token);
    }

    let scope = get_scope(date, region, SERVICE_NAME);
    let (signed_headers, canonical_headers) = headers.get_canonical_headers();
    let canonical_query_string = query_params.get_canonical_query_string();
    let canonical_request = get_canonical_request(
        method,
        uri,
        &canonical_query_string,
        &canonical_headers,
        &signed_headers,
        content_sha256,
    );
    let string_to_sign = get_string_to_sign(
        date,
        &scope,
        &sha256_hash(canonical_request.as_bytes()),
    );
    let signing_key = get_signing_key(&creds.secret_key, date, region, SERVICE_NAME);
    let signature = get_signature(&signing_key, string_to_sign.as_bytes());
    let authorization = get_authorization(&creds.access_key, &scope, &signed_headers, &signature);

    headers.add(AUTHORIZATION, authorization);
}
