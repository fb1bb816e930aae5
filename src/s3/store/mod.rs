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

//! Object store abstraction used by the upload/download verification

mod memory;

pub use memory::MemoryStore;

use crate::s3::error::Error;
use crate::s3::object_content::{ContentStream, ObjectContent};
use crate::s3::response::{
    CreateBucketResponse, GetObjectResponse, PutObjectContentResponse, RemoveObjectResponse,
    StatObjectResponse,
};
use crate::s3::segmented_bytes::SegmentedBytes;
use crate::s3::types::{GetObjectOptions, Part, PutObjectOptions};
use crate::s3::utils::{check_bucket_name, check_object_name};
use async_trait::async_trait;

pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024; // 5 MiB
pub const MAX_PART_SIZE: u64 = 1024 * MIN_PART_SIZE; // 5 GiB
pub const MAX_OBJECT_SIZE: u64 = 1024 * MAX_PART_SIZE; // 5 TiB
pub const MAX_MULTIPART_COUNT: u16 = 10_000;

/// An S3 compatible object store.
///
/// Implementors provide single-shot and multipart primitives;
/// [`put_object_content`](Self::put_object_content) chooses between them
/// the same way for every store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether the store is reached over TLS. SSE-C and SSE-KMS need it.
    fn is_secure(&self) -> bool;

    /// Creates a bucket. Buckets created with object lock are versioned.
    async fn create_bucket(
        &self,
        bucket: &str,
        object_lock: bool,
    ) -> Result<CreateBucketResponse, Error>;

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error>;

    /// Stores `data` as the whole object.
    async fn put_object(
        &self,
        bucket: &str,
        object: &str,
        data: SegmentedBytes,
        options: &PutObjectOptions,
    ) -> Result<PutObjectContentResponse, Error>;

    /// Starts a multipart upload and returns its upload id.
    async fn create_multipart_upload(
        &self,
        bucket: &str,
        object: &str,
        options: &PutObjectOptions,
    ) -> Result<String, Error>;

    async fn upload_part(
        &self,
        bucket: &str,
        object: &str,
        upload_id: &str,
        part_number: u16,
        data: SegmentedBytes,
    ) -> Result<Part, Error>;

    async fn complete_multipart_upload(
        &self,
        bucket: &str,
        object: &str,
        upload_id: &str,
        parts: Vec<Part>,
    ) -> Result<PutObjectContentResponse, Error>;

    async fn abort_multipart_upload(
        &self,
        bucket: &str,
        object: &str,
        upload_id: &str,
    ) -> Result<(), Error>;

    async fn get_object(
        &self,
        bucket: &str,
        object: &str,
        options: GetObjectOptions,
    ) -> Result<GetObjectResponse, Error>;

    async fn stat_object(
        &self,
        bucket: &str,
        object: &str,
        options: GetObjectOptions,
    ) -> Result<StatObjectResponse, Error>;

    /// Removes an object, or one version of it when `version_id` is given.
    /// Without a version id, versioned buckets get a delete marker.
    async fn remove_object(
        &self,
        bucket: &str,
        object: &str,
        version_id: Option<&str>,
    ) -> Result<RemoveObjectResponse, Error>;

    /// Removes the bucket with all objects, versions and pending uploads,
    /// ignoring retention and legal holds.
    async fn delete_and_purge_bucket(&self, bucket: &str) -> Result<(), Error>;

    /// Uploads `content`, as a single object when it fits in one part and as
    /// a multipart upload otherwise.
    ///
    /// When the content declares its size, delivering fewer bytes fails with
    /// [`Error::InsufficientData`] and delivering more with
    /// [`Error::TooMuchData`]. A failed multipart upload is aborted.
    async fn put_object_content(
        &self,
        bucket: &str,
        object: &str,
        content: ObjectContent,
        options: PutObjectOptions,
    ) -> Result<PutObjectContentResponse, Error> {
        check_bucket_name(bucket, true)?;
        check_object_name(object)?;

        if let Some(v) = &options.sse {
            if v.tls_required() && !self.is_secure() {
                return Err(Error::SseTlsRequired(None));
            }
        }

        let mut stream = content.to_content_stream().await?;
        let object_size = stream.get_size().value();
        let (psize, expected_parts) = calc_part_info(object_size, options.part_size)?;

        // Read the first part.
        let seg_bytes = stream.read_upto(psize as usize).await?;

        // A short first part, or exactly one expected part, is stored in a
        // single shot.
        if (seg_bytes.len() as u64) < psize || expected_parts == Some(1) {
            check_declared_size(&mut stream, object_size, seg_bytes.len() as u64).await?;
            log::debug!(
                "put {bucket}/{object}: single part of {} bytes",
                seg_bytes.len()
            );
            return self.put_object(bucket, object, seg_bytes, &options).await;
        }

        let upload_id = self.create_multipart_upload(bucket, object, &options).await?;
        log::debug!(
            "put {bucket}/{object}: multipart upload {upload_id} with part size {psize}, expected parts {expected_parts:?}"
        );

        let res = upload_parts(
            self,
            &mut stream,
            bucket,
            object,
            &upload_id,
            psize,
            object_size,
            seg_bytes,
        )
        .await;
        if let Err(e) = &res {
            log::warn!("aborting multipart upload {upload_id} of {bucket}/{object}: {e}");
            if let Err(abort_err) = self.abort_multipart_upload(bucket, object, &upload_id).await {
                log::warn!("failed to abort multipart upload {upload_id}: {abort_err}");
            }
        }
        res
    }
}

#[allow(clippy::too_many_arguments)]
async fn upload_parts<S: ObjectStore + ?Sized>(
    store: &S,
    stream: &mut ContentStream,
    bucket: &str,
    object: &str,
    upload_id: &str,
    psize: u64,
    object_size: Option<u64>,
    first_part: SegmentedBytes,
) -> Result<PutObjectContentResponse, Error> {
    let mut parts: Vec<Part> = Vec::new();
    let mut uploaded: u64 = 0;
    let mut part_number: u16 = 0;
    let mut first_part = Some(first_part);

    loop {
        let part_content = match first_part.take() {
            Some(v) => v,
            None => stream.read_upto(psize as usize).await?,
        };
        let buffer_size = part_content.len() as u64;

        // At least one part went up and the stream has ended.
        if buffer_size == 0 && part_number > 0 {
            break;
        }

        if let Some(v) = object_size {
            if uploaded + buffer_size > v {
                return Err(Error::TooMuchData(v));
            }
        }
        if part_number == MAX_MULTIPART_COUNT {
            return Err(Error::InvalidPartCount(
                object_size.unwrap_or(uploaded + buffer_size),
                psize,
                MAX_MULTIPART_COUNT,
            ));
        }

        part_number += 1;
        let part = store
            .upload_part(bucket, object, upload_id, part_number, part_content)
            .await?;
        parts.push(part);
        uploaded += buffer_size;

        if buffer_size < psize {
            break;
        }
    }

    if let Some(v) = object_size {
        if uploaded < v {
            return Err(Error::InsufficientData(v, uploaded));
        }
    }

    store
        .complete_multipart_upload(bucket, object, upload_id, parts)
        .await
}

// Verifies a fully read single-shot body against the declared size.
async fn check_declared_size(
    stream: &mut ContentStream,
    object_size: Option<u64>,
    got: u64,
) -> Result<(), Error> {
    match object_size {
        Some(v) if got < v => Err(Error::InsufficientData(v, got)),
        Some(v) if got > v => Err(Error::TooMuchData(v)),
        Some(v) if !stream.read_upto(1).await?.is_empty() => Err(Error::TooMuchData(v)),
        _ => Ok(()),
    }
}

/// Returns the part size and, for known object sizes, the part count.
pub fn calc_part_info(
    object_size: Option<u64>,
    part_size: Option<u64>,
) -> Result<(u64, Option<u16>), Error> {
    if let Some(v) = part_size {
        if v < MIN_PART_SIZE {
            return Err(Error::InvalidMinPartSize(v));
        }

        if v > MAX_PART_SIZE {
            return Err(Error::InvalidMaxPartSize(v));
        }
    }

    if let Some(v) = object_size {
        if v > MAX_OBJECT_SIZE {
            return Err(Error::InvalidObjectSize(v));
        }
    }

    match (object_size, part_size) {
        (None, None) => Err(Error::MissingPartSize),
        (None, Some(part_size)) => Ok((part_size, None)),
        (Some(object_size), None) => {
            let mut psize = object_size.div_ceil(MAX_MULTIPART_COUNT as u64);
            psize = MIN_PART_SIZE * psize.div_ceil(MIN_PART_SIZE).max(1);
            if psize > object_size {
                psize = object_size;
            }

            let part_count = match psize {
                0 => 1,
                _ => object_size.div_ceil(psize) as u16,
            };

            Ok((psize, Some(part_count)))
        }
        (Some(object_size), Some(part_size)) => {
            let part_count = object_size.div_ceil(part_size).max(1);
            if part_count > MAX_MULTIPART_COUNT as u64 {
                return Err(Error::InvalidPartCount(
                    object_size,
                    part_size,
                    MAX_MULTIPART_COUNT,
                ));
            }

            Ok((part_size, Some(part_count as u16)))
        }
    }
}
