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

//! Responses of [`ObjectStore`](crate::s3::store::ObjectStore) operations

use crate::s3::header_constants::*;
use crate::s3::multimap::{Multimap, MultimapExt};
use crate::s3::object_content::ObjectContent;
use crate::s3::error::Error;
use crate::s3::types::{Retention, RetentionMode, parse_legal_hold};
use crate::s3::utils::{UtcTime, from_iso8601utc};
use std::fmt;

#[derive(Clone, Debug)]
pub struct CreateBucketResponse {
    pub bucket: String,
    pub object_lock: bool,
}

#[derive(Clone, Debug)]
pub struct PutObjectContentResponse {
    pub bucket: String,
    pub object: String,
    /// MD5 hex of the content, or `<md5 of part md5s>-<part count>` for
    /// multipart uploads.
    pub etag: String,
    pub version_id: Option<String>,
    pub object_size: u64,
    /// `None` for single-shot uploads.
    pub part_count: Option<u16>,
}

/// Response of [`ObjectStore::get_object`](crate::s3::store::ObjectStore::get_object)
pub struct GetObjectResponse {
    pub bucket: String,
    pub object: String,
    pub version_id: Option<String>,
    pub etag: String,
    /// Size of the whole object, not of the returned range.
    pub object_size: u64,
    pub content: ObjectContent,
    /// Number of bytes in `content`.
    pub content_length: u64,
}

impl fmt::Debug for GetObjectResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetObjectResponse")
            .field("bucket", &self.bucket)
            .field("object", &self.object)
            .field("version_id", &self.version_id)
            .field("etag", &self.etag)
            .field("object_size", &self.object_size)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct StatObjectResponse {
    pub bucket: String,
    pub object: String,
    pub version_id: Option<String>,
    pub etag: String,
    pub size: u64,
    pub last_modified: UtcTime,
    pub headers: Multimap,
}

impl StatObjectResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get_ignore_case(CONTENT_TYPE)
    }

    /// User metadata keyed by name, without the `X-Amz-Meta-` prefix.
    pub fn user_metadata(&self) -> Multimap {
        let mut map = Multimap::new();
        for (key, values) in self.headers.iter_all() {
            let Some(name) = key.strip_prefix(X_AMZ_META_PREFIX) else {
                continue;
            };
            for value in values {
                map.add(name, value.clone());
            }
        }
        map
    }

    /// Legal hold status; `false` when the object carries none.
    pub fn legal_hold(&self) -> Result<bool, Error> {
        match self.headers.get_ignore_case(X_AMZ_OBJECT_LOCK_LEGAL_HOLD) {
            Some(v) => parse_legal_hold(v),
            None => Ok(false),
        }
    }

    /// Retention the object was written with, if any.
    pub fn retention(&self) -> Result<Option<Retention>, Error> {
        let Some(mode) = self.headers.get_ignore_case(X_AMZ_OBJECT_LOCK_MODE) else {
            return Ok(None);
        };
        let date = self
            .headers
            .get_ignore_case(X_AMZ_OBJECT_LOCK_RETAIN_UNTIL_DATE)
            .ok_or_else(|| {
                Error::InvalidRetentionMode(format!("{mode} without retain until date"))
            })?;
        Ok(Some(Retention {
            mode: RetentionMode::parse(mode)?,
            retain_until_date: from_iso8601utc(date)?,
        }))
    }
}

#[derive(Clone, Debug)]
pub struct RemoveObjectResponse {
    pub bucket: String,
    pub object: String,
    /// Version removed, or the id of the delete marker written.
    pub version_id: Option<String>,
    pub is_delete_marker: bool,
}
