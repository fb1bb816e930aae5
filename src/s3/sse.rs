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

//! Server side encryption definitions

use crate::s3::header_constants::*;
use crate::s3::multimap::{Multimap, MultimapExt};
use crate::s3::utils::{b64encode, md5sum_hash};
use std::any::Any;

/// Base server side encryption
pub trait Sse: std::fmt::Debug + Send + Sync {
    /// Headers persisted with the object, without any key material
    fn stored_headers(&self) -> Multimap;
    fn tls_required(&self) -> bool;
    fn as_any(&self) -> &dyn Any;
}

#[derive(Clone, Debug)]
/// Server side encryption customer key type
///
/// Only the MD5 fingerprint of the key is kept.
pub struct SseCustomerKey {
    key_md5: String,
}

impl SseCustomerKey {
    pub fn new(key: &str) -> Self {
        Self {
            key_md5: md5sum_hash(key.as_bytes()),
        }
    }

    /// Base64 encoded MD5 of the key; identifies the key without revealing it.
    pub fn key_md5(&self) -> &str {
        &self.key_md5
    }
}

impl Sse for SseCustomerKey {
    fn stored_headers(&self) -> Multimap {
        let mut headers = Multimap::with_capacity(2);
        headers.add(X_AMZ_SERVER_SIDE_ENCRYPTION_CUSTOMER_ALGORITHM, "AES256");
        headers.add(
            X_AMZ_SERVER_SIDE_ENCRYPTION_CUSTOMER_KEY_MD5,
            self.key_md5.clone(),
        );
        headers
    }

    fn tls_required(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Clone, Debug)]
/// Server side encryption KMS type
pub struct SseKms {
    headers: Multimap,
}

impl SseKms {
    pub fn new(key: &str, context: Option<&str>) -> SseKms {
        let mut headers = Multimap::with_capacity(3);

        headers.add(X_AMZ_SERVER_SIDE_ENCRYPTION_AWS_KMS_KEY_ID, key);
        headers.add(X_AMZ_SERVER_SIDE_ENCRYPTION, "aws:kms");
        if let Some(v) = context {
            headers.add(X_AMZ_SERVER_SIDE_ENCRYPTION_CONTEXT, b64encode(v));
        }

        SseKms { headers }
    }
}

impl Sse for SseKms {
    fn stored_headers(&self) -> Multimap {
        self.headers.clone()
    }

    fn tls_required(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Clone, Debug)]
/// Server side encryption S3 type
pub struct SseS3 {
    headers: Multimap,
}

impl SseS3 {
    pub fn new() -> Self {
        let mut headers = Multimap::new();
        headers.add(X_AMZ_SERVER_SIDE_ENCRYPTION, "AES256");

        Self { headers }
    }
}

impl Default for SseS3 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sse for SseS3 {
    fn stored_headers(&self) -> Multimap {
        self.headers.clone()
    }

    fn tls_required(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
