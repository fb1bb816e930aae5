// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
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

//! Option and value types shared by object stores and verification

use crate::s3::error::Error;
use crate::s3::header_constants::*;
use crate::s3::multimap::{Multimap, MultimapExt};
use crate::s3::sse::{Sse, SseCustomerKey};
use crate::s3::utils::{UtcTime, to_iso8601utc};
use std::fmt;
use std::sync::Arc;
use typed_builder::TypedBuilder;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Retention mode
pub enum RetentionMode {
    GOVERNANCE,
    COMPLIANCE,
}

impl RetentionMode {
    pub fn parse(s: &str) -> Result<RetentionMode, Error> {
        if s.eq_ignore_ascii_case("GOVERNANCE") {
            Ok(RetentionMode::GOVERNANCE)
        } else if s.eq_ignore_ascii_case("COMPLIANCE") {
            Ok(RetentionMode::COMPLIANCE)
        } else {
            Err(Error::InvalidRetentionMode(s.to_string()))
        }
    }
}

impl fmt::Display for RetentionMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RetentionMode::GOVERNANCE => write!(f, "GOVERNANCE"),
            RetentionMode::COMPLIANCE => write!(f, "COMPLIANCE"),
        }
    }
}

#[derive(Clone, Debug)]
/// Contains retention mode and retain until date
pub struct Retention {
    pub mode: RetentionMode,
    pub retain_until_date: UtcTime,
}

/// Parses 'legal hold' string value
pub fn parse_legal_hold(s: &str) -> Result<bool, Error> {
    if s.eq_ignore_ascii_case("ON") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("OFF") {
        Ok(false)
    } else {
        Err(Error::InvalidLegalHold(s.to_string()))
    }
}

#[derive(Clone, Debug)]
/// Uploaded part of a multipart upload
pub struct Part {
    pub number: u16,
    pub etag: String,
}

/// Options of [`ObjectStore::put_object_content`](crate::s3::store::ObjectStore::put_object_content)
#[derive(Clone, Debug, TypedBuilder)]
pub struct PutObjectOptions {
    /// Defaults to `application/octet-stream`.
    #[builder(default, setter(into))]
    pub content_type: Option<String>,
    /// Keys are stored with the `X-Amz-Meta-` prefix, added when missing.
    #[builder(default, setter(into))]
    pub user_metadata: Option<Multimap>,
    #[builder(default, setter(into))]
    pub sse: Option<Arc<dyn Sse>>,
    #[builder(default, setter(into))]
    pub retention: Option<Retention>,
    #[builder(default = false)]
    pub legal_hold: bool,
    #[builder(default, setter(into))]
    pub storage_class: Option<String>,
    /// Part size of multipart uploads; computed from the object size when unset.
    #[builder(default, setter(into))]
    pub part_size: Option<u64>,
}

impl Default for PutObjectOptions {
    fn default() -> Self {
        PutObjectOptions::builder().build()
    }
}

impl PutObjectOptions {
    /// Headers persisted with an object written with these options.
    ///
    /// Customer key material is never part of the result.
    pub fn object_headers(&self) -> Result<Multimap, Error> {
        let mut map = Multimap::new();

        map.add(
            CONTENT_TYPE,
            self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE),
        );

        if let Some(v) = &self.user_metadata {
            for (key, values) in v.iter_all() {
                let key = normalize_metadata_key(key)?;
                for value in values {
                    map.add(key.clone(), value.clone());
                }
            }
        }

        if let Some(v) = &self.sse {
            map.add_multimap(v.stored_headers());
        }

        if let Some(v) = &self.storage_class {
            map.add(X_AMZ_STORAGE_CLASS, v.clone());
        }

        if let Some(v) = &self.retention {
            map.add(X_AMZ_OBJECT_LOCK_MODE, v.mode.to_string());
            map.add(
                X_AMZ_OBJECT_LOCK_RETAIN_UNTIL_DATE,
                to_iso8601utc(v.retain_until_date),
            );
        }

        if self.legal_hold {
            map.add(X_AMZ_OBJECT_LOCK_LEGAL_HOLD, "ON");
        }

        Ok(map)
    }

    /// Customer key the object is encrypted with, if any.
    pub fn customer_key(&self) -> Option<&SseCustomerKey> {
        self.sse
            .as_ref()
            .and_then(|v| v.as_any().downcast_ref::<SseCustomerKey>())
    }
}

fn normalize_metadata_key(key: &str) -> Result<String, Error> {
    let name = match key.get(..X_AMZ_META_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(X_AMZ_META_PREFIX) => {
            &key[X_AMZ_META_PREFIX.len()..]
        }
        _ => key,
    };
    if name.is_empty() {
        return Err(Error::InvalidUserMetadata(String::from(
            "user metadata key cannot be empty",
        )));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_graphic() && b != b':')
    {
        return Err(Error::InvalidUserMetadata(format!(
            "user metadata key '{name}' contains invalid characters"
        )));
    }
    Ok(format!("{X_AMZ_META_PREFIX}{name}"))
}

/// Options of [`ObjectStore::get_object`](crate::s3::store::ObjectStore::get_object)
#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct GetObjectOptions {
    /// Latest version when unset.
    #[builder(default, setter(into))]
    pub version_id: Option<String>,
    #[builder(default, setter(into))]
    pub offset: Option<u64>,
    /// Up to the end of the object when unset.
    #[builder(default, setter(into))]
    pub length: Option<u64>,
    /// Required for objects written with a customer key.
    #[builder(default, setter(into))]
    pub ssec: Option<SseCustomerKey>,
}
