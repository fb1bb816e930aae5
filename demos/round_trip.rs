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

use minio_fixtures::s3::store::{MemoryStore, ObjectStore};
use minio_fixtures::s3::types::PutObjectOptions;
use minio_fixtures::s3::verify::{verify_range, verify_round_trip};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init(); // Note: set environment variable RUST_LOG="DEBUG" to see each part
    let store = MemoryStore::new(false);

    let bucket_name: &str = "round-trip-rust-bucket";
    if !store.bucket_exists(bucket_name).await? {
        store.create_bucket(bucket_name, false).await?;
    }

    let object_name: &str = "twelve-mib.bin";
    let object_size: u64 = 12 * 1024 * 1024;

    let report = verify_round_trip(
        &store,
        bucket_name,
        object_name,
        object_size,
        PutObjectOptions::default(),
        None,
    )
    .await?;
    log::info!(
        "uploaded '{object_name}' ({} bytes, etag {}) to bucket '{bucket_name}'; sha256 {}",
        report.size,
        report.etag,
        report.actual
    );

    let offset = 5 * 1024 * 1024 - 100;
    let report = verify_range(&store, bucket_name, object_name, object_size, offset, 200, None).await?;
    log::info!(
        "range {offset}+{} across the first part boundary verified; sha256 {}",
        report.size,
        report.actual
    );

    store.delete_and_purge_bucket(bucket_name).await?;
    Ok(())
}
