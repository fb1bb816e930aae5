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

use crate::cleanup_guard::CleanupGuard;
use crate::test_config::TestConfig;
use crate::utils::rand_bucket_name;
use minio_fixtures::s3::sse::{SseCustomerKey, SseKms};
use minio_fixtures::s3::store::{MemoryStore, ObjectStore};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub config: TestConfig,
}

impl TestContext {
    pub fn new_from_env() -> Self {
        Self::with_config(TestConfig::from_env())
    }

    /// Context backed by a fresh in-memory store; the store is secure when
    /// `config.secure` is set.
    pub fn with_config(config: TestConfig) -> Self {
        Self {
            store: Arc::new(MemoryStore::new(config.secure)),
            config,
        }
    }

    pub fn ssec(&self) -> SseCustomerKey {
        SseCustomerKey::new(&self.config.ssec_key)
    }

    pub fn sse_kms(&self) -> SseKms {
        SseKms::new(&self.config.kms_key_id, None)
    }

    /// Creates a temporary bucket with an automatic cleanup guard.
    ///
    /// # Returns
    /// A tuple containing:
    /// - `String` - The name of the created bucket.
    /// - `CleanupGuard` - A guard whose `cleanup()` purges the bucket.
    ///
    /// # Example
    /// ```ignore
    /// let (bucket_name, guard) = ctx.create_bucket_helper().await;
    /// println!("Created temporary bucket: {}", bucket_name);
    /// guard.cleanup().await;
    /// ```
    pub async fn create_bucket_helper(&self) -> (String, CleanupGuard) {
        let bucket_name = rand_bucket_name();
        let _resp = self
            .store
            .create_bucket(&bucket_name, false)
            .await
            .unwrap();
        let guard = CleanupGuard::new(self.store.clone(), &bucket_name);
        (bucket_name, guard)
    }
}
