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

//! Validated wrapper types for S3 API parameters
//!
//! Once a value is wrapped in one of these types it is known to be valid, so
//! request builders validate names exactly once, before any network call.

use crate::s3::error::ValidationErr;
use crate::s3::utils::{check_bucket_name, check_object_name, check_upload_id};
use std::fmt;

macro_rules! impl_validated_string {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $ty {
                /// Returns the value as a string slice.
                pub fn as_str(&self) -> &str {
                    &self.0
                }

                /// Consumes self and returns the inner `String`.
                pub fn into_inner(self) -> String {
                    self.0
                }
            }

            impl AsRef<str> for $ty {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }

            impl std::ops::Deref for $ty {
                type Target = str;

                fn deref(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl std::str::FromStr for $ty {
                type Err = ValidationErr;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::new(s)
                }
            }

            impl TryFrom<String> for $ty {
                type Error = ValidationErr;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }

            impl TryFrom<&str> for $ty {
                type Error = ValidationErr;

                fn try_from(value: &str) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }
        )*
    };
}

/// A validated S3 bucket name.
///
/// - Length: 3-63 characters
/// - Lowercase letters, numbers, hyphens, and dots; [`BucketName::new`]
///   additionally accepts legacy names with uppercase letters, `_` or `:`
/// - Cannot be IP address format
/// - No successive special characters (`..`, `.-`, `-.`)
///
/// # Example
///
/// ```
/// use objectstorage::s3::types::BucketName;
///
/// let bucket = BucketName::new_strict("my-bucket").unwrap();
/// assert_eq!(bucket.as_str(), "my-bucket");
///
/// assert!(BucketName::new("ab").is_err());
/// assert!(BucketName::new("192.168.1.1").is_err());
/// assert!(BucketName::new("Legacy_Bucket").is_ok());
/// assert!(BucketName::new_strict("Legacy_Bucket").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketName(String);

impl BucketName {
    /// Creates a bucket name for an existing bucket (relaxed rules).
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationErr> {
        let name = name.into();
        check_bucket_name(&name, false)?;
        Ok(Self(name))
    }

    /// Creates a bucket name valid for creating a new bucket.
    pub fn new_strict(name: impl Into<String>) -> Result<Self, ValidationErr> {
        let name = name.into();
        check_bucket_name(&name, true)?;
        Ok(Self(name))
    }
}

/// A validated S3 object key: non-empty, at most 1024 bytes of UTF-8.
///
/// ```
/// use objectstorage::s3::types::ObjectKey;
///
/// assert!(ObjectKey::new("path/to/object.txt").is_ok());
/// assert!(ObjectKey::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationErr> {
        let key = key.into();
        check_object_name(&key)?;
        Ok(Self(key))
    }
}

/// A non-empty multipart upload ID, as issued by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadId(String);

impl UploadId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationErr> {
        let id = id.into();
        check_upload_id(&id)?;
        Ok(Self(id))
    }
}

impl_validated_string!(BucketName, ObjectKey, UploadId);
