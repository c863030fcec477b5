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

use crate::s3::utils::url_encode;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Multimap for string key and string value
pub type Multimap = multimap::MultiMap<String, String>;

/// Trims and collapses runs of spaces into a single space, as required for
/// canonical header values.
#[inline]
fn collapse_spaces(s: &str) -> Cow<'_, str> {
    let trimmed = s.trim();
    if !trimmed.contains("  ") {
        return Cow::Borrowed(trimmed);
    }
    let mut result = String::with_capacity(trimmed.len());
    let mut prev_space = false;
    for c in trimmed.chars() {
        if c == ' ' {
            if !prev_space {
                result.push(' ');
                prev_space = true;
            }
        } else {
            result.push(c);
            prev_space = false;
        }
    }
    Cow::Owned(result)
}

pub trait MultimapExt {
    /// Adds a key-value pair to the multimap
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V);

    /// Adds a multimap to the current multimap
    fn add_multimap(&mut self, other: Multimap);

    /// Returns true if a key matches `key` ignoring ASCII case
    fn contains_key_ignore_case(&self, key: &str) -> bool;

    /// Converts multimap to HTTP query string
    fn to_query_string(&self) -> String;

    /// Converts multimap to canonical query string (sorted by key, then value)
    fn get_canonical_query_string(&self) -> String;

    /// Converts multimap to signed headers and canonical headers
    fn get_canonical_headers(&self) -> (String, String);
}

impl MultimapExt for Multimap {
    fn add<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.insert(key.into(), value.into());
    }

    fn add_multimap(&mut self, other: Multimap) {
        for (key, values) in other.into_iter() {
            self.insert_many(key, values);
        }
    }

    fn contains_key_ignore_case(&self, key: &str) -> bool {
        self.keys().any(|k| k.eq_ignore_ascii_case(key))
    }

    fn to_query_string(&self) -> String {
        let mut query = String::new();
        for (key, values) in self.iter_all() {
            for value in values {
                if !query.is_empty() {
                    query.push('&');
                }
                query.push_str(&url_encode(key));
                query.push('=');
                query.push_str(&url_encode(value));
            }
        }
        query
    }

    fn get_canonical_query_string(&self) -> String {
        let mut sorted: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, values) in self.iter_all() {
            sorted
                .entry(url_encode(key).into_owned())
                .or_default()
                .extend(values.iter().map(|v| url_encode(v).into_owned()));
        }

        let mut query = String::new();
        for (key, mut values) in sorted {
            values.sort();
            for value in values {
                if !query.is_empty() {
                    query.push('&');
                }
                query.push_str(&key);
                query.push('=');
                query.push_str(&value);
            }
        }
        query
    }

    fn get_canonical_headers(&self) -> (String, String) {
        let mut btmap: BTreeMap<String, String> = BTreeMap::new();

        for (k, values) in self.iter_all() {
            let key = k.to_lowercase();
            if key == "authorization" || key == "user-agent" {
                continue;
            }

            let mut vs: Vec<&String> = values.iter().collect();
            vs.sort();

            let mut value = String::new();
            for v in vs {
                if !value.is_empty() {
                    value.push(',');
                }
                value.push_str(&collapse_spaces(v));
            }

            // Same header under different casing is folded into one entry.
            btmap
                .entry(key)
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let mut signed_headers = String::new();
        let mut canonical_headers = String::new();
        let mut add_delim = false;
        for (key, value) in &btmap {
            if add_delim {
                signed_headers.push(';');
                canonical_headers.push('\n');
            }

            signed_headers.push_str(key);

            canonical_headers.push_str(key);
            canonical_headers.push(':');
            canonical_headers.push_str(value);

            add_delim = true;
        }

        (signed_headers, canonical_headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_spaces() {
        let result = collapse_spaces("hello world");
        assert_eq!(result, "hello world");
        assert!(matches!(result, Cow::Borrowed(_)));

        let result = collapse_spaces("  hello   world  ");
        assert_eq!(result, "hello world");
        assert!(matches!(result, Cow::Owned(_)));

        assert_eq!(collapse_spaces("   "), "");
        assert_eq!(collapse_spaces("hello\t\tworld"), "hello\t\tworld");
    }

    #[test]
    fn test_canonical_query_string_is_sorted() {
        let mut query = Multimap::new();
        query.add("uploadId", "abc def");
        query.add("partNumber", "2");
        query.add("uploads", "");
        assert_eq!(
            query.get_canonical_query_string(),
            "partNumber=2&uploadId=abc%20def&uploads="
        );
    }

    #[test]
    fn test_canonical_query_string_sorts_repeated_values() {
        let mut query = Multimap::new();
        query.add("prefix", "b");
        query.add("prefix", "a");
        assert_eq!(query.get_canonical_query_string(), "prefix=a&prefix=b");
    }

    #[test]
    fn test_canonical_headers_lowercase_and_skip_authorization() {
        let mut headers = Multimap::new();
        headers.add("Host", "localhost:9000");
        headers.add("X-Amz-Date", "20130524T000000Z");
        headers.add("Authorization", "should-be-skipped");
        headers.add("User-Agent", "objectstorage-rs");
        headers.add("Content-Type", "  text/plain   charset ");

        let (signed, canonical) = headers.get_canonical_headers();
        assert_eq!(signed, "content-type;host;x-amz-date");
        assert_eq!(
            canonical,
            "content-type:text/plain charset\nhost:localhost:9000\nx-amz-date:20130524T000000Z"
        );
    }

    #[test]
    fn test_contains_key_ignore_case() {
        let mut headers = Multimap::new();
        headers.add("content-type", "text/plain");
        assert!(headers.contains_key_ignore_case("Content-Type"));
        assert!(!headers.contains_key_ignore_case("Content-Length"));
    }

    quickcheck! {
        fn prop_canonical_query_string_is_order_independent(pairs: Vec<(String, String)>) -> bool {
            let mut forward = Multimap::new();
            let mut backward = Multimap::new();
            for (k, v) in pairs.iter() {
                forward.add(k.clone(), v.clone());
            }
            for (k, v) in pairs.iter().rev() {
                backward.add(k.clone(), v.clone());
            }
            forward.get_canonical_query_string() == backward.get_canonical_query_string()
        }
    }
}
