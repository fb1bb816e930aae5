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

use super::{MIN_PART_SIZE, ObjectStore};
use crate::s3::error::{Error, ErrorResponse};
use crate::s3::header_constants::*;
use crate::s3::multimap::{Multimap, MultimapExt};
use crate::s3::object_content::ObjectContent;
use crate::s3::response::{
    CreateBucketResponse, GetObjectResponse, PutObjectContentResponse, RemoveObjectResponse,
    StatObjectResponse,
};
use crate::s3::segmented_bytes::SegmentedBytes;
use crate::s3::sse::SseCustomerKey;
use crate::s3::types::{GetObjectOptions, Part, PutObjectOptions};
use crate::s3::utils::{
    UtcTime, check_bucket_name, check_object_name, md5_digest_sb, md5_hex, md5_hex_sb, utc_now,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

/// In-process [`ObjectStore`] that keeps every object in memory.
///
/// Clones share the same buckets. Buckets created with object lock keep
/// every version of an object and honor retention and legal holds.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    shared: Arc<SharedStoreItems>,
}

#[derive(Debug)]
struct SharedStoreItems {
    secure: bool,
    buckets: DashMap<String, StoredBucket>,
    uploads: DashMap<String, PendingUpload>,
}

#[derive(Debug, Default)]
struct StoredBucket {
    object_lock: bool,
    // Versions of each object, oldest first.
    objects: HashMap<String, Vec<StoredVersion>>,
}

#[derive(Clone, Debug)]
struct StoredVersion {
    version_id: Option<String>,
    data: SegmentedBytes,
    etag: String,
    headers: Multimap,
    last_modified: UtcTime,
    ssec_key_md5: Option<String>,
    retain_until: Option<UtcTime>,
    legal_hold: bool,
    is_delete_marker: bool,
}

#[derive(Debug)]
struct PendingUpload {
    bucket: String,
    object: String,
    options: PutObjectOptions,
    parts: BTreeMap<u16, (SegmentedBytes, md5::Digest)>,
}

impl MemoryStore {
    /// Creates an empty store. `secure` tells whether it counts as being
    /// reached over TLS.
    pub fn new(secure: bool) -> Self {
        MemoryStore {
            shared: Arc::new(SharedStoreItems {
                secure,
                buckets: DashMap::new(),
                uploads: DashMap::new(),
            }),
        }
    }

    /// Number of multipart uploads neither completed nor aborted.
    pub fn pending_uploads(&self) -> usize {
        self.shared.uploads.len()
    }

    /// Number of stored versions of an object, delete markers included.
    pub fn version_count(&self, bucket: &str, object: &str) -> usize {
        self.shared
            .buckets
            .get(bucket)
            .and_then(|b| b.objects.get(object).map(Vec::len))
            .unwrap_or(0)
    }

    fn check_write(&self, bucket: &str, options: &PutObjectOptions) -> Result<(), Error> {
        if let Some(v) = &options.sse {
            if v.tls_required() && !self.shared.secure {
                return Err(Error::SseTlsRequired(None));
            }
        }
        let b = self
            .shared
            .buckets
            .get(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        if !b.object_lock && (options.retention.is_some() || options.legal_hold) {
            return Err(s3_error(
                "InvalidRequest",
                "Bucket is missing ObjectLockConfiguration",
                bucket,
                "",
            ));
        }
        Ok(())
    }

    fn store_version(
        &self,
        bucket: &str,
        object: &str,
        data: SegmentedBytes,
        etag: String,
        options: &PutObjectOptions,
    ) -> Result<PutObjectContentResponse, Error> {
        let headers = options.object_headers()?;
        let mut b = self
            .shared
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        let version_id = b.object_lock.then(|| Uuid::new_v4().to_string());
        let object_size = data.len() as u64;
        let version = StoredVersion {
            version_id: version_id.clone(),
            data,
            etag: etag.clone(),
            headers,
            last_modified: utc_now(),
            ssec_key_md5: options.customer_key().map(|k| k.key_md5().to_string()),
            retain_until: options.retention.as_ref().map(|r| r.retain_until_date),
            legal_hold: options.legal_hold,
            is_delete_marker: false,
        };
        let versioned = b.object_lock;
        let versions = b.objects.entry(object.to_string()).or_default();
        if !versioned {
            versions.clear();
        }
        versions.push(version);

        Ok(PutObjectContentResponse {
            bucket: bucket.to_string(),
            object: object.to_string(),
            etag,
            version_id,
            object_size,
            part_count: None,
        })
    }

    // Finds the requested version and checks the customer key against it.
    fn find_version(
        &self,
        bucket: &str,
        object: &str,
        options: &GetObjectOptions,
    ) -> Result<StoredVersion, Error> {
        check_bucket_name(bucket, true)?;
        check_object_name(object)?;
        if options.ssec.is_some() && !self.shared.secure {
            return Err(Error::SseTlsRequired(None));
        }

        let b = self
            .shared
            .buckets
            .get(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        let versions = b
            .objects
            .get(object)
            .ok_or_else(|| no_such_key(bucket, object))?;
        let version = match &options.version_id {
            Some(id) => versions
                .iter()
                .find(|v| v.version_id.as_deref() == Some(id.as_str()))
                .ok_or_else(|| {
                    s3_error(
                        "NoSuchVersion",
                        "The specified version does not exist.",
                        bucket,
                        object,
                    )
                })?,
            None => versions.last().ok_or_else(|| no_such_key(bucket, object))?,
        };
        if version.is_delete_marker {
            return Err(no_such_key(bucket, object));
        }

        check_customer_key(version, options.ssec.as_ref(), bucket, object)?;
        Ok(version.clone())
    }
}

fn check_customer_key(
    version: &StoredVersion,
    ssec: Option<&SseCustomerKey>,
    bucket: &str,
    object: &str,
) -> Result<(), Error> {
    match (&version.ssec_key_md5, ssec) {
        (None, None) => Ok(()),
        (Some(stored), Some(key)) if stored.as_str() == key.key_md5() => Ok(()),
        (Some(_), Some(_)) => Err(s3_error(
            "AccessDenied",
            "The provided encryption key does not match the key the object was written with.",
            bucket,
            object,
        )),
        (Some(_), None) => Err(s3_error(
            "InvalidRequest",
            "The object was stored using a form of Server Side Encryption. The correct parameters must be provided to retrieve the object.",
            bucket,
            object,
        )),
        (None, Some(_)) => Err(s3_error(
            "InvalidRequest",
            "The encryption parameters are not applicable to this object.",
            bucket,
            object,
        )),
    }
}

fn is_locked(version: &StoredVersion) -> bool {
    version.legal_hold || version.retain_until.is_some_and(|t| t > utc_now())
}

fn s3_error(code: &str, message: &str, bucket: &str, object: &str) -> Error {
    Error::S3Error(ErrorResponse::new(code, message, bucket, object))
}

fn no_such_bucket(bucket: &str) -> Error {
    s3_error(
        "NoSuchBucket",
        "The specified bucket does not exist",
        bucket,
        "",
    )
}

fn no_such_key(bucket: &str, object: &str) -> Error {
    s3_error(
        "NoSuchKey",
        "The specified key does not exist.",
        bucket,
        object,
    )
}

fn no_such_upload(bucket: &str, object: &str) -> Error {
    s3_error(
        "NoSuchUpload",
        "The specified multipart upload does not exist.",
        bucket,
        object,
    )
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn is_secure(&self) -> bool {
        self.shared.secure
    }

    async fn create_bucket(
        &self,
        bucket: &str,
        object_lock: bool,
    ) -> Result<CreateBucketResponse, Error> {
        check_bucket_name(bucket, true)?;
        match self.shared.buckets.entry(bucket.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(s3_error(
                "BucketAlreadyOwnedByYou",
                "Your previous request to create the named bucket succeeded and you already own it.",
                bucket,
                "",
            )),
            dashmap::mapref::entry::Entry::Vacant(e) => {
                e.insert(StoredBucket {
                    object_lock,
                    ..Default::default()
                });
                log::info!("created bucket {bucket} (object lock: {object_lock})");
                Ok(CreateBucketResponse {
                    bucket: bucket.to_string(),
                    object_lock,
                })
            }
        }
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error> {
        check_bucket_name(bucket, true)?;
        Ok(self.shared.buckets.contains_key(bucket))
    }

    async fn put_object(
        &self,
        bucket: &str,
        object: &str,
        data: SegmentedBytes,
        options: &PutObjectOptions,
    ) -> Result<PutObjectContentResponse, Error> {
        check_bucket_name(bucket, true)?;
        check_object_name(object)?;
        self.check_write(bucket, options)?;

        let etag = md5_hex_sb(&data);
        let resp = self.store_version(bucket, object, data, etag, options)?;
        log::debug!(
            "stored {bucket}/{object} ({} bytes, version {:?})",
            resp.object_size,
            resp.version_id
        );
        Ok(resp)
    }

    async fn create_multipart_upload(
        &self,
        bucket: &str,
        object: &str,
        options: &PutObjectOptions,
    ) -> Result<String, Error> {
        check_bucket_name(bucket, true)?;
        check_object_name(object)?;
        self.check_write(bucket, options)?;
        // Reject invalid metadata before any part is staged.
        options.object_headers()?;

        let upload_id = Uuid::new_v4().simple().to_string();
        self.shared.uploads.insert(
            upload_id.clone(),
            PendingUpload {
                bucket: bucket.to_string(),
                object: object.to_string(),
                options: options.clone(),
                parts: BTreeMap::new(),
            },
        );
        Ok(upload_id)
    }

    async fn upload_part(
        &self,
        bucket: &str,
        object: &str,
        upload_id: &str,
        part_number: u16,
        data: SegmentedBytes,
    ) -> Result<Part, Error> {
        if !(1..=super::MAX_MULTIPART_COUNT).contains(&part_number) {
            return Err(s3_error(
                "InvalidArgument",
                "Part number must be an integer between 1 and 10000, inclusive",
                bucket,
                object,
            ));
        }
        let mut upload = self
            .shared
            .uploads
            .get_mut(upload_id)
            .filter(|u| u.bucket == bucket && u.object == object)
            .ok_or_else(|| no_such_upload(bucket, object))?;

        let digest = md5_digest_sb(&data);
        let etag = format!("{digest:x}");
        upload.parts.insert(part_number, (data, digest));
        Ok(Part {
            number: part_number,
            etag,
        })
    }

    async fn complete_multipart_upload(
        &self,
        bucket: &str,
        object: &str,
        upload_id: &str,
        parts: Vec<Part>,
    ) -> Result<PutObjectContentResponse, Error> {
        // The upload stays staged until the object is stored.
        let (data, part_digests, options) = {
            let upload = self
                .shared
                .uploads
                .get(upload_id)
                .filter(|u| u.bucket == bucket && u.object == object)
                .ok_or_else(|| no_such_upload(bucket, object))?;

            let invalid_part = || {
                s3_error(
                    "InvalidPart",
                    "One or more of the specified parts could not be found.",
                    bucket,
                    object,
                )
            };
            if parts.is_empty() {
                return Err(invalid_part());
            }

            let mut data = SegmentedBytes::new();
            let mut part_digests = Vec::with_capacity(parts.len() * 16);
            let mut last_number = 0;
            for (i, part) in parts.iter().enumerate() {
                if part.number <= last_number {
                    return Err(s3_error(
                        "InvalidPartOrder",
                        "The list of parts was not in ascending order.",
                        bucket,
                        object,
                    ));
                }
                last_number = part.number;

                let (content, digest) = upload.parts.get(&part.number).ok_or_else(invalid_part)?;
                if format!("{digest:x}") != part.etag {
                    return Err(invalid_part());
                }
                if i + 1 < parts.len() && (content.len() as u64) < MIN_PART_SIZE {
                    return Err(s3_error(
                        "EntityTooSmall",
                        "Your proposed upload is smaller than the minimum allowed object size.",
                        bucket,
                        object,
                    ));
                }
                data.extend(content.clone());
                part_digests.extend_from_slice(&digest.0);
            }
            (data, part_digests, upload.options.clone())
        };

        let etag = format!("{}-{}", md5_hex(&part_digests), parts.len());
        let mut resp = self.store_version(bucket, object, data, etag, &options)?;
        self.shared.uploads.remove(upload_id);
        resp.part_count = Some(parts.len() as u16);
        log::debug!(
            "completed multipart upload {upload_id} of {bucket}/{object} ({} bytes in {} parts)",
            resp.object_size,
            parts.len()
        );
        Ok(resp)
    }

    async fn abort_multipart_upload(
        &self,
        bucket: &str,
        object: &str,
        upload_id: &str,
    ) -> Result<(), Error> {
        self.shared
            .uploads
            .remove_if(upload_id, |_, u| u.bucket == bucket && u.object == object)
            .map(|_| ())
            .ok_or_else(|| no_such_upload(bucket, object))
    }

    async fn get_object(
        &self,
        bucket: &str,
        object: &str,
        options: GetObjectOptions,
    ) -> Result<GetObjectResponse, Error> {
        let version = self.find_version(bucket, object, &options)?;
        let object_size = version.data.len() as u64;

        let offset = options.offset.unwrap_or(0);
        if object_size > 0 && offset >= object_size {
            return Err(s3_error(
                "InvalidRange",
                "The requested range is not satisfiable",
                bucket,
                object,
            ));
        }
        let start = offset.min(object_size);
        let end = match options.length {
            Some(length) => start.saturating_add(length).min(object_size),
            None => object_size,
        };
        let data = version.data.slice(start as usize, (end - start) as usize);
        log::debug!("get {bucket}/{object} bytes {start}..{end} of {object_size}");

        Ok(GetObjectResponse {
            bucket: bucket.to_string(),
            object: object.to_string(),
            version_id: version.version_id,
            etag: version.etag,
            object_size,
            content_length: end - start,
            content: ObjectContent::from(data),
        })
    }

    async fn stat_object(
        &self,
        bucket: &str,
        object: &str,
        options: GetObjectOptions,
    ) -> Result<StatObjectResponse, Error> {
        let version = self.find_version(bucket, object, &options)?;
        let mut headers = version.headers;
        headers.add(CONTENT_LENGTH, version.data.len().to_string());
        headers.add(ETAG, format!("\"{}\"", version.etag));
        if let Some(v) = &version.version_id {
            headers.add(X_AMZ_VERSION_ID, v.clone());
        }

        Ok(StatObjectResponse {
            bucket: bucket.to_string(),
            object: object.to_string(),
            version_id: version.version_id,
            etag: version.etag,
            size: version.data.len() as u64,
            last_modified: version.last_modified,
            headers,
        })
    }

    async fn remove_object(
        &self,
        bucket: &str,
        object: &str,
        version_id: Option<&str>,
    ) -> Result<RemoveObjectResponse, Error> {
        check_bucket_name(bucket, true)?;
        check_object_name(object)?;

        let mut b = self
            .shared
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        let versioned = b.object_lock;

        let resp = |version_id: Option<String>, is_delete_marker: bool| RemoveObjectResponse {
            bucket: bucket.to_string(),
            object: object.to_string(),
            version_id,
            is_delete_marker,
        };

        if !versioned {
            b.objects.remove(object);
            log::debug!("removed {bucket}/{object}");
            return Ok(resp(None, false));
        }

        let Some(version_id) = version_id else {
            let marker_id = Uuid::new_v4().to_string();
            b.objects
                .entry(object.to_string())
                .or_default()
                .push(StoredVersion {
                    version_id: Some(marker_id.clone()),
                    data: SegmentedBytes::new(),
                    etag: String::new(),
                    headers: Multimap::new(),
                    last_modified: utc_now(),
                    ssec_key_md5: None,
                    retain_until: None,
                    legal_hold: false,
                    is_delete_marker: true,
                });
            log::debug!("wrote delete marker {marker_id} for {bucket}/{object}");
            return Ok(resp(Some(marker_id), true));
        };

        let Some(versions) = b.objects.get_mut(object) else {
            return Ok(resp(Some(version_id.to_string()), false));
        };
        let Some(pos) = versions
            .iter()
            .position(|v| v.version_id.as_deref() == Some(version_id))
        else {
            return Ok(resp(Some(version_id.to_string()), false));
        };
        if is_locked(&versions[pos]) {
            return Err(s3_error(
                "AccessDenied",
                "Object is WORM protected and cannot be overwritten",
                bucket,
                object,
            ));
        }
        let removed = versions.remove(pos);
        if versions.is_empty() {
            b.objects.remove(object);
        }
        log::debug!("removed version {version_id} of {bucket}/{object}");
        Ok(resp(Some(version_id.to_string()), removed.is_delete_marker))
    }

    async fn delete_and_purge_bucket(&self, bucket: &str) -> Result<(), Error> {
        check_bucket_name(bucket, true)?;
        let (_, removed) = self
            .shared
            .buckets
            .remove(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        self.shared.uploads.retain(|_, u| u.bucket != bucket);
        log::info!(
            "purged bucket {bucket} ({} objects)",
            removed.objects.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::content_source::ContentSource;
    use crate::s3::sse::{Sse, SseKms, SseS3};
    use crate::s3::types::{Retention, RetentionMode};
    use bytes::Bytes;
    use chrono::Duration;

    const MIB: u64 = 1024 * 1024;

    async fn store_with_bucket(object_lock: bool) -> MemoryStore {
        let store = MemoryStore::new(true);
        store.create_bucket("test-bucket", object_lock).await.unwrap();
        store
    }

    async fn read_all(resp: GetObjectResponse) -> Bytes {
        resp.content.to_segmented_bytes().await.unwrap().to_bytes()
    }

    fn code(err: Error) -> String {
        match err {
            Error::S3Error(er) => er.code,
            e => panic!("Unexpected error {:?}", e),
        }
    }

    #[tokio::test]
    async fn bucket_lifecycle() {
        let store = MemoryStore::new(false);
        assert!(!store.bucket_exists("test-bucket").await.unwrap());
        store.create_bucket("test-bucket", false).await.unwrap();
        assert!(store.bucket_exists("test-bucket").await.unwrap());
        let err = store.create_bucket("test-bucket", false).await.unwrap_err();
        assert_eq!(code(err), "BucketAlreadyOwnedByYou");
        store.delete_and_purge_bucket("test-bucket").await.unwrap();
        assert!(!store.bucket_exists("test-bucket").await.unwrap());
        let err = store.delete_and_purge_bucket("test-bucket").await.unwrap_err();
        assert_eq!(code(err), "NoSuchBucket");
        assert!(matches!(
            store.create_bucket("x", false).await,
            Err(Error::InvalidBucketName(_))
        ));
    }

    #[tokio::test]
    async fn single_part_put_and_get() {
        let store = store_with_bucket(false).await;
        let resp = store
            .put_object_content(
                "test-bucket",
                "hello.txt",
                ObjectContent::from(Bytes::from_static(b"hello world")),
                PutObjectOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(resp.etag, "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(resp.object_size, 11);
        assert_eq!(resp.part_count, None);
        assert_eq!(resp.version_id, None);

        let got = store
            .get_object("test-bucket", "hello.txt", GetObjectOptions::default())
            .await
            .unwrap();
        assert_eq!(got.content_length, 11);
        assert_eq!(read_all(got).await, &b"hello world"[..]);
    }

    #[tokio::test]
    async fn multipart_put_concatenates_parts() {
        let store = store_with_bucket(false).await;
        let size = 11 * MIB;
        let resp = store
            .put_object_content(
                "test-bucket",
                "big.bin",
                ContentSource::new(size).into(),
                PutObjectOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(resp.part_count, Some(3));
        assert!(resp.etag.ends_with("-3"));
        assert_eq!(resp.object_size, size);
        assert_eq!(store.pending_uploads(), 0);

        let expected = ObjectContent::from(ContentSource::new(size))
            .to_segmented_bytes()
            .await
            .unwrap()
            .to_bytes();
        let got = store
            .get_object("test-bucket", "big.bin", GetObjectOptions::default())
            .await
            .unwrap();
        assert_eq!(read_all(got).await, expected);
    }

    #[tokio::test]
    async fn unknown_size_needs_part_size() {
        let store = store_with_bucket(false).await;
        let content =
            || ObjectContent::new_from_stream(ContentSource::new(6 * MIB).into_stream(), None);

        let err = store
            .put_object_content("test-bucket", "o", content(), PutObjectOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingPartSize));

        let opts = PutObjectOptions::builder().part_size(MIN_PART_SIZE).build();
        let resp = store
            .put_object_content("test-bucket", "o", content(), opts)
            .await
            .unwrap();
        assert_eq!(resp.part_count, Some(2));
        assert_eq!(resp.object_size, 6 * MIB);
    }

    #[tokio::test]
    async fn declared_size_must_match_content() {
        let store = store_with_bucket(false).await;

        let (stream, _) = ObjectContent::from(ContentSource::new(10))
            .to_stream()
            .await
            .unwrap();
        let err = store
            .put_object_content(
                "test-bucket",
                "short",
                ObjectContent::new_from_stream(stream, Some(20)),
                PutObjectOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientData(20, 10)));

        let (stream, _) = ObjectContent::from(ContentSource::new(30))
            .to_stream()
            .await
            .unwrap();
        let err = store
            .put_object_content(
                "test-bucket",
                "long",
                ObjectContent::new_from_stream(stream, Some(20)),
                PutObjectOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TooMuchData(20)));
    }

    #[tokio::test]
    async fn failed_multipart_upload_is_aborted() {
        let store = store_with_bucket(false).await;
        let (stream, _) = ObjectContent::from(ContentSource::new(12 * MIB))
            .to_stream()
            .await
            .unwrap();
        let opts = PutObjectOptions::builder().part_size(MIN_PART_SIZE).build();
        let err = store
            .put_object_content(
                "test-bucket",
                "long",
                ObjectContent::new_from_stream(stream, Some(11 * MIB)),
                opts,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TooMuchData(_)));
        assert_eq!(store.pending_uploads(), 0);
        let err = store
            .stat_object("test-bucket", "long", GetObjectOptions::default())
            .await
            .unwrap_err();
        assert_eq!(code(err), "NoSuchKey");
    }

    #[tokio::test]
    async fn ranged_get_clamps_length() {
        let store = store_with_bucket(false).await;
        store
            .put_object_content(
                "test-bucket",
                "r",
                ObjectContent::from(Bytes::from_static(b"0123456789")),
                PutObjectOptions::default(),
            )
            .await
            .unwrap();

        let get = |offset: u64, length: Option<u64>| {
            store.get_object(
                "test-bucket",
                "r",
                GetObjectOptions::builder()
                    .offset(offset)
                    .length(length)
                    .build(),
            )
        };
        assert_eq!(read_all(get(2, Some(3)).await.unwrap()).await, &b"234"[..]);
        assert_eq!(read_all(get(7, Some(100)).await.unwrap()).await, &b"789"[..]);
        assert_eq!(read_all(get(4, None).await.unwrap()).await, &b"456789"[..]);
        assert_eq!(code(get(10, None).await.unwrap_err()), "InvalidRange");
    }

    #[tokio::test]
    async fn metadata_is_returned_by_stat() {
        let store = store_with_bucket(false).await;
        let mut meta = Multimap::new();
        meta.add("Project", "fixtures");
        let sse: Arc<dyn Sse> = Arc::new(SseS3::new());
        let opts = PutObjectOptions::builder()
            .user_metadata(meta)
            .sse(sse)
            .content_type(String::from("text/plain"))
            .build();
        store
            .put_object_content("test-bucket", "m", Bytes::from_static(b"abc").into(), opts)
            .await
            .unwrap();

        let stat = store
            .stat_object("test-bucket", "m", GetObjectOptions::default())
            .await
            .unwrap();
        assert_eq!(stat.size, 3);
        assert_eq!(stat.content_type(), Some("text/plain"));
        assert_eq!(
            stat.user_metadata().get("Project").map(String::as_str),
            Some("fixtures")
        );
        assert_eq!(
            stat.headers.get_ignore_case(X_AMZ_SERVER_SIDE_ENCRYPTION),
            Some("AES256")
        );
    }

    #[tokio::test]
    async fn customer_key_is_required_on_read() {
        let store = store_with_bucket(false).await;
        let key = SseCustomerKey::new("32byteslongsecretkeymustprovided");
        let sse: Arc<dyn Sse> = Arc::new(key.clone());
        store
            .put_object_content(
                "test-bucket",
                "secret",
                Bytes::from_static(b"abc").into(),
                PutObjectOptions::builder().sse(sse).build(),
            )
            .await
            .unwrap();

        let err = store
            .get_object("test-bucket", "secret", GetObjectOptions::default())
            .await
            .unwrap_err();
        assert_eq!(code(err), "InvalidRequest");

        let wrong = SseCustomerKey::new("32byteslongsecretkeymustprovideD");
        let err = store
            .get_object(
                "test-bucket",
                "secret",
                GetObjectOptions::builder().ssec(wrong).build(),
            )
            .await
            .unwrap_err();
        assert_eq!(code(err), "AccessDenied");

        let got = store
            .get_object(
                "test-bucket",
                "secret",
                GetObjectOptions::builder().ssec(key).build(),
            )
            .await
            .unwrap();
        assert_eq!(read_all(got).await, &b"abc"[..]);
    }

    #[tokio::test]
    async fn managed_keys_need_tls() {
        let store = MemoryStore::new(false);
        store.create_bucket("test-bucket", false).await.unwrap();
        let sse: Arc<dyn Sse> = Arc::new(SseKms::new("my-key", None));
        let err = store
            .put_object_content(
                "test-bucket",
                "o",
                Bytes::from_static(b"abc").into(),
                PutObjectOptions::builder().sse(sse).build(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SseTlsRequired(None)));
    }

    #[tokio::test]
    async fn lock_options_need_object_lock_bucket() {
        let store = store_with_bucket(false).await;
        let err = store
            .put_object_content(
                "test-bucket",
                "o",
                Bytes::from_static(b"abc").into(),
                PutObjectOptions::builder().legal_hold(true).build(),
            )
            .await
            .unwrap_err();
        assert_eq!(code(err), "InvalidRequest");
    }

    #[tokio::test]
    async fn versioned_removal() {
        let store = store_with_bucket(true).await;
        let put = store
            .put_object_content(
                "test-bucket",
                "v",
                Bytes::from_static(b"abc").into(),
                PutObjectOptions::default(),
            )
            .await
            .unwrap();
        let version_id = put.version_id.unwrap();

        let marker = store.remove_object("test-bucket", "v", None).await.unwrap();
        assert!(marker.is_delete_marker);
        assert_eq!(store.version_count("test-bucket", "v"), 2);
        let err = store
            .get_object("test-bucket", "v", GetObjectOptions::default())
            .await
            .unwrap_err();
        assert_eq!(code(err), "NoSuchKey");

        let old = store
            .get_object(
                "test-bucket",
                "v",
                GetObjectOptions::builder()
                    .version_id(version_id.clone())
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(read_all(old).await, &b"abc"[..]);

        store
            .remove_object("test-bucket", "v", Some(&version_id))
            .await
            .unwrap();
        store
            .remove_object("test-bucket", "v", marker.version_id.as_deref())
            .await
            .unwrap();
        assert_eq!(store.version_count("test-bucket", "v"), 0);
    }

    #[tokio::test]
    async fn locked_versions_survive_removal_until_purge() {
        let store = store_with_bucket(true).await;
        let opts = PutObjectOptions::builder()
            .retention(Retention {
                mode: RetentionMode::GOVERNANCE,
                retain_until_date: utc_now() + Duration::days(1),
            })
            .build();
        let put = store
            .put_object_content("test-bucket", "locked", Bytes::from_static(b"abc").into(), opts)
            .await
            .unwrap();

        let err = store
            .remove_object("test-bucket", "locked", put.version_id.as_deref())
            .await
            .unwrap_err();
        assert_eq!(code(err), "AccessDenied");

        store.delete_and_purge_bucket("test-bucket").await.unwrap();
        assert!(!store.bucket_exists("test-bucket").await.unwrap());
    }

    #[tokio::test]
    async fn unversioned_overwrite_keeps_one_version() {
        let store = store_with_bucket(false).await;
        for body in [&b"one"[..], &b"two"[..]] {
            store
                .put_object_content(
                    "test-bucket",
                    "o",
                    ObjectContent::from(Bytes::copy_from_slice(body)),
                    PutObjectOptions::default(),
                )
                .await
                .unwrap();
        }
        assert_eq!(store.version_count("test-bucket", "o"), 1);
        let removed = store.remove_object("test-bucket", "o", None).await.unwrap();
        assert!(!removed.is_delete_marker);
        assert_eq!(store.version_count("test-bucket", "o"), 0);
    }

    #[tokio::test]
    async fn upload_part_rejects_unknown_uploads() {
        let store = store_with_bucket(false).await;
        let err = store
            .upload_part("test-bucket", "o", "nope", 1, SegmentedBytes::new())
            .await
            .unwrap_err();
        assert_eq!(code(err), "NoSuchUpload");

        let upload_id = store
            .create_multipart_upload("test-bucket", "o", &PutObjectOptions::default())
            .await
            .unwrap();
        let err = store
            .upload_part("test-bucket", "o", &upload_id, 0, SegmentedBytes::new())
            .await
            .unwrap_err();
        assert_eq!(code(err), "InvalidArgument");
        store
            .abort_multipart_upload("test-bucket", "o", &upload_id)
            .await
            .unwrap();
        assert_eq!(store.pending_uploads(), 0);
    }

    #[tokio::test]
    async fn rejected_complete_keeps_upload_staged() {
        let store = store_with_bucket(false).await;
        let upload_id = store
            .create_multipart_upload("test-bucket", "o", &PutObjectOptions::default())
            .await
            .unwrap();
        let first = store
            .upload_part(
                "test-bucket",
                "o",
                &upload_id,
                1,
                SegmentedBytes::from(Bytes::from(vec![b'a'; MIN_PART_SIZE as usize])),
            )
            .await
            .unwrap();
        let second = store
            .upload_part("test-bucket", "o", &upload_id, 2, Bytes::from_static(b"tail").into())
            .await
            .unwrap();

        let bad = Part {
            number: 1,
            etag: "bad".to_string(),
        };
        let err = store
            .complete_multipart_upload("test-bucket", "o", &upload_id, vec![bad])
            .await
            .unwrap_err();
        assert_eq!(code(err), "InvalidPart");
        assert_eq!(store.pending_uploads(), 1);

        let err = store
            .complete_multipart_upload(
                "test-bucket",
                "o",
                &upload_id,
                vec![second.clone(), first.clone()],
            )
            .await
            .unwrap_err();
        assert_eq!(code(err), "InvalidPartOrder");
        assert_eq!(store.pending_uploads(), 1);

        let resp = store
            .complete_multipart_upload("test-bucket", "o", &upload_id, vec![first, second])
            .await
            .unwrap();
        assert_eq!(resp.object_size, MIN_PART_SIZE + 4);
        assert_eq!(resp.part_count, Some(2));
        assert_eq!(store.pending_uploads(), 0);

        // A range spanning both parts.
        let got = store
            .get_object(
                "test-bucket",
                "o",
                GetObjectOptions::builder()
                    .offset(MIN_PART_SIZE - 2)
                    .length(4)
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(read_all(got).await, &b"aata"[..]);
    }

    #[tokio::test]
    async fn rejected_complete_can_still_be_aborted() {
        let store = store_with_bucket(false).await;
        let upload_id = store
            .create_multipart_upload("test-bucket", "o", &PutObjectOptions::default())
            .await
            .unwrap();
        store
            .upload_part("test-bucket", "o", &upload_id, 1, Bytes::from_static(b"x").into())
            .await
            .unwrap();
        let err = store
            .complete_multipart_upload("test-bucket", "o", &upload_id, Vec::new())
            .await
            .unwrap_err();
        assert_eq!(code(err), "InvalidPart");
        store
            .abort_multipart_upload("test-bucket", "o", &upload_id)
            .await
            .unwrap();
        assert_eq!(store.pending_uploads(), 0);
    }
}
