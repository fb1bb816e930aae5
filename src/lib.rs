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

//! # MinIO test fixtures (`minio-fixtures`)
//!
//! Building blocks for verifying that object storage round-trips content
//! byte for byte, without ever holding the content in memory:
//!
//! - [`s3::content_source::ContentSource`] yields a fixed, cyclic byte sequence of any
//!   logical size. Two sources of the same size always produce identical bytes.
//! - [`s3::checksum`] computes a SHA-256 digest over exactly `n` bytes of any reader or
//!   downloaded stream, failing on short reads.
//! - [`s3::store::ObjectStore`] is the upload/download seam. [`s3::store::MemoryStore`]
//!   implements it in process, including the single-shot vs. multipart decision.
//! - [`s3::verify`] ties the pieces together into the put/get verification protocol.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use minio_fixtures::s3::store::{MemoryStore, ObjectStore};
//! use minio_fixtures::s3::types::PutObjectOptions;
//! use minio_fixtures::s3::verify::verify_round_trip;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new(true);
//!     store.create_bucket("my-bucket", false).await.unwrap();
//!
//!     let report = verify_round_trip(
//!         &store,
//!         "my-bucket",
//!         "my-object",
//!         1024 * 1024,
//!         PutObjectOptions::default(),
//!         None,
//!     )
//!     .await
//!     .expect("content did not survive the round trip");
//!
//!     println!("sha256: {}", report.actual);
//! }
//! ```

#![allow(clippy::result_large_err)]
#![allow(clippy::too_many_arguments)]
pub mod s3;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
