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

//! End-to-end verification of uploads and downloads
//!
//! The expected digest of an object of `size` bytes is computed from a fresh
//! [`ContentSource`] of that size. A second fresh source of the same size is
//! uploaded, the object is downloaded, and the digest of exactly `size`
//! downloaded bytes must match. Remote objects are left in place; removing
//! them is up to the caller.

use crate::s3::checksum::{digest_of, digest_of_content, skip_exactly};
use crate::s3::content_source::ContentSource;
use crate::s3::error::Error;
use crate::s3::sse::SseCustomerKey;
use crate::s3::store::ObjectStore;
use crate::s3::types::{GetObjectOptions, PutObjectOptions};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationReport {
    pub bucket: String,
    pub object: String,
    /// Number of bytes covered by both digests.
    pub size: u64,
    pub expected: String,
    pub actual: String,
    pub etag: String,
    pub version_id: Option<String>,
}

/// Digest of the first `size` bytes of the content every source of
/// `object_size` bytes yields, starting at `offset`.
pub fn expected_digest(object_size: u64, offset: u64, size: u64) -> Result<String, Error> {
    let mut source = ContentSource::new(object_size);
    if offset > 0 {
        skip_exactly(&mut source, offset)?;
    }
    let digest = digest_of(&mut source, size);
    source.close();
    digest
}

/// Uploads `size` bytes of content, downloads the object and compares digests.
pub async fn verify_round_trip<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    object: &str,
    size: u64,
    options: PutObjectOptions,
    ssec: Option<SseCustomerKey>,
) -> Result<VerificationReport, Error> {
    let expected = expected_digest(size, 0, size)?;

    let put = store
        .put_object_content(bucket, object, ContentSource::new(size).into(), options)
        .await?;
    if put.object_size != size {
        return Err(Error::DataLengthMismatch(size, put.object_size));
    }

    verify_download(store, bucket, object, size, &expected, put.version_id, ssec).await
}

/// Downloads `length` bytes at `offset` of an object uploaded from a
/// [`ContentSource`] of `object_size` bytes and compares digests.
///
/// `length` is clamped to the end of the object, the same way a ranged
/// download is.
pub async fn verify_range<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    object: &str,
    object_size: u64,
    offset: u64,
    length: u64,
    ssec: Option<SseCustomerKey>,
) -> Result<VerificationReport, Error> {
    let length = length.min(object_size.saturating_sub(offset));
    let expected = expected_digest(object_size, offset, length)?;

    let got = store
        .get_object(
            bucket,
            object,
            GetObjectOptions::builder()
                .offset(offset)
                .length(length)
                .ssec(ssec)
                .build(),
        )
        .await?;
    if got.content_length != length {
        return Err(Error::DataLengthMismatch(length, got.content_length));
    }
    let actual = digest_of_content(got.content, length).await?;

    compare(VerificationReport {
        bucket: bucket.to_string(),
        object: object.to_string(),
        size: length,
        expected,
        actual,
        etag: got.etag,
        version_id: got.version_id,
    })
}

/// Downloads an object and compares the digest of its `size` bytes against
/// `expected`.
pub async fn verify_download<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    object: &str,
    size: u64,
    expected: &str,
    version_id: Option<String>,
    ssec: Option<SseCustomerKey>,
) -> Result<VerificationReport, Error> {
    let got = store
        .get_object(
            bucket,
            object,
            GetObjectOptions::builder()
                .version_id(version_id)
                .ssec(ssec)
                .build(),
        )
        .await?;
    if got.content_length != size {
        return Err(Error::DataLengthMismatch(size, got.content_length));
    }
    let actual = digest_of_content(got.content, size).await?;

    compare(VerificationReport {
        bucket: bucket.to_string(),
        object: object.to_string(),
        size,
        expected: expected.to_string(),
        actual,
        etag: got.etag,
        version_id: got.version_id,
    })
}

fn compare(report: VerificationReport) -> Result<VerificationReport, Error> {
    if report.expected != report.actual {
        log::warn!(
            "digest mismatch for {}/{}: expected {}, got {}",
            report.bucket,
            report.object,
            report.expected,
            report.actual
        );
        return Err(Error::DigestMismatch(report.expected, report.actual));
    }
    log::debug!(
        "verified {}/{} ({} bytes, sha256 {})",
        report.bucket,
        report.object,
        report.size,
        report.actual
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::object_content::ObjectContent;
    use crate::s3::store::MemoryStore;
    use bytes::Bytes;

    const ONE_MIB_SHA256: &str = "e6fe1d9f1c2bd06002bc4b7fdcd2b199f90f94c282c8642614516744eb3bff30";
    const TAIL_SHA256: &str = "e0bf87efce4fc6cb5c5fd03b225e0865c96cae2c275b90e732e5e748b6c6fce0";

    async fn store() -> MemoryStore {
        let store = MemoryStore::new(true);
        store.create_bucket("verify-bucket", false).await.unwrap();
        store
    }

    #[tokio::test]
    async fn round_trip_of_one_mib() {
        let store = store().await;
        let report = verify_round_trip(
            &store,
            "verify-bucket",
            "one-mib",
            1024 * 1024,
            PutObjectOptions::default(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(report.expected, ONE_MIB_SHA256);
        assert_eq!(report.actual, ONE_MIB_SHA256);
        assert_eq!(report.size, 1024 * 1024);
    }

    #[tokio::test]
    async fn range_at_the_tail() {
        let store = store().await;
        verify_round_trip(
            &store,
            "verify-bucket",
            "tail",
            1024,
            PutObjectOptions::default(),
            None,
        )
        .await
        .unwrap();

        let report = verify_range(&store, "verify-bucket", "tail", 1024, 1000, 24, None)
            .await
            .unwrap();
        assert_eq!(report.actual, TAIL_SHA256);

        let clamped = verify_range(&store, "verify-bucket", "tail", 1024, 1000, 100, None)
            .await
            .unwrap();
        assert_eq!(clamped.size, 24);
        assert_eq!(clamped.actual, TAIL_SHA256);
    }

    #[tokio::test]
    async fn tampered_object_is_detected() {
        let store = store().await;
        let mut body = ObjectContent::from(ContentSource::new(64))
            .to_segmented_bytes()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        body[10] ^= 0x20;
        store
            .put_object_content(
                "verify-bucket",
                "tampered",
                ObjectContent::from(Bytes::from(body)),
                PutObjectOptions::default(),
            )
            .await
            .unwrap();

        let expected = expected_digest(64, 0, 64).unwrap();
        let err = verify_download(&store, "verify-bucket", "tampered", 64, &expected, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DigestMismatch(e, _) if e == expected));
    }

    #[tokio::test]
    async fn size_mismatch_is_reported_before_hashing() {
        let store = store().await;
        store
            .put_object_content(
                "verify-bucket",
                "short",
                ObjectContent::from(Bytes::from_static(b"abc")),
                PutObjectOptions::default(),
            )
            .await
            .unwrap();
        let expected = expected_digest(4, 0, 4).unwrap();
        let err = verify_download(&store, "verify-bucket", "short", 4, &expected, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DataLengthMismatch(4, 3)));
    }

    #[test]
    fn expected_digest_of_nothing_is_the_empty_digest() {
        assert_eq!(
            expected_digest(0, 0, 0).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(matches!(
            expected_digest(10, 11, 0),
            Err(Error::InsufficientData(11, 10))
        ));
    }
}
