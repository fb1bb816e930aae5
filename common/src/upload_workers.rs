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

//! Share-nothing parallel uploads
//!
//! Every worker owns its [`ContentSource`], its temporary file and its
//! object; workers only meet when they are joined.

use crate::test_config::TestConfig;
use minio_fixtures::s3::content_source::ContentSource;
use minio_fixtures::s3::error::Error;
use minio_fixtures::s3::object_content::ObjectContent;
use minio_fixtures::s3::store::ObjectStore;
use minio_fixtures::s3::types::PutObjectOptions;
use minio_fixtures::s3::verify::{expected_digest, verify_download};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Clone, Debug)]
pub struct WorkerReport {
    pub worker: usize,
    pub object: String,
    pub etag: String,
    pub digest: String,
    pub part_count: Option<u16>,
}

/// Runs `config.workers` uploads of `object_size` bytes into `bucket`
/// concurrently and returns one report per worker, ordered by worker index.
///
/// Each worker writes its own source to a temporary file, uploads the file,
/// verifies the downloaded digest against a fresh source, then deletes the
/// file and the object. The first failing worker's error is returned.
pub async fn upload_in_parallel<S: ObjectStore + 'static>(
    store: Arc<S>,
    config: &TestConfig,
    bucket: &str,
    object_size: u64,
) -> Result<Vec<WorkerReport>, Error> {
    let mut tasks = JoinSet::new();
    let run_id = uuid::Uuid::new_v4().simple().to_string();

    for worker in 0..config.workers {
        let store = store.clone();
        let bucket = bucket.to_string();
        let object = format!("parallel-{run_id}-{worker}");
        let temp_file = config.temp_dir.join(format!("{object}.bin"));
        let part_size = config.part_size;
        tasks.spawn(async move {
            let res = upload_one(
                store.as_ref(),
                &bucket,
                &object,
                &temp_file,
                object_size,
                part_size,
            )
            .await;
            if let Err(e) = tokio::fs::remove_file(&temp_file).await {
                log::debug!("worker {worker}: temp file {}: {e}", temp_file.display());
            }
            res.map(|mut report| {
                report.worker = worker;
                report
            })
        });
    }

    collect_reports(tasks).await
}

// Joins every worker, even after a failure, so that each one gets to remove
// its temporary file.
async fn collect_reports(
    mut tasks: JoinSet<Result<WorkerReport, Error>>,
) -> Result<Vec<WorkerReport>, Error> {
    let mut reports = Vec::with_capacity(tasks.len());
    let mut first_error: Option<Error> = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .map_err(|e| Error::IOError(std::io::Error::other(e)))
            .and_then(|res| res);
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => {
                log::warn!("parallel upload worker failed: {e}");
                first_error.get_or_insert(e);
            }
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }

    reports.sort_by_key(|r| r.worker);
    Ok(reports)
}

async fn upload_one<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    object: &str,
    temp_file: &Path,
    object_size: u64,
    part_size: u64,
) -> Result<WorkerReport, Error> {
    let written = ObjectContent::from(ContentSource::new(object_size))
        .to_file(temp_file)
        .await?;
    if written != object_size {
        return Err(Error::DataLengthMismatch(object_size, written));
    }

    let options = PutObjectOptions::builder().part_size(part_size).build();
    let put = store
        .put_object_content(bucket, object, ObjectContent::from(temp_file), options)
        .await?;

    let expected = expected_digest(object_size, 0, object_size)?;
    let verified = verify_download(store, bucket, object, object_size, &expected, None, None).await;
    store.remove_object(bucket, object, None).await?;
    let verified = verified?;

    Ok(WorkerReport {
        worker: 0,
        object: object.to_string(),
        etag: put.etag,
        digest: verified.actual,
        part_count: put.part_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use minio_fixtures::s3::store::MemoryStore;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn every_worker_reports_the_same_digest() {
        let store = Arc::new(MemoryStore::new(true));
        store.create_bucket("parallel-bucket", false).await.unwrap();
        let config = TestConfig {
            workers: 3,
            ..TestConfig::default()
        };

        let reports = upload_in_parallel(store.clone(), &config, "parallel-bucket", 100_000)
            .await
            .unwrap();
        assert_eq!(reports.len(), 3);
        let expected = expected_digest(100_000, 0, 100_000).unwrap();
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.worker, i);
            assert_eq!(report.digest, expected);
            assert_eq!(report.part_count, None);
            assert_eq!(store.version_count("parallel-bucket", &report.object), 0);
        }
    }

    #[tokio::test]
    async fn missing_bucket_fails_the_run() {
        let store = Arc::new(MemoryStore::new(true));
        let config = TestConfig {
            workers: 2,
            ..TestConfig::default()
        };
        let err = upload_in_parallel(store, &config, "no-such-bucket", 10)
            .await
            .unwrap_err();
        assert_eq!(err.s3_code(), Some("NoSuchBucket"));
    }

    #[tokio::test]
    async fn crashed_worker_does_not_cut_the_others_short() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::time::Duration;

        fn crash() -> Result<WorkerReport, Error> {
            panic!("worker crashed")
        }

        let finished = Arc::new(AtomicBool::new(false));
        let mut tasks: JoinSet<Result<WorkerReport, Error>> = JoinSet::new();
        tasks.spawn(async { crash() });
        let flag = finished.clone();
        tasks.spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(WorkerReport {
                worker: 1,
                object: "slow".to_string(),
                etag: String::new(),
                digest: String::new(),
                part_count: None,
            })
        });

        let err = collect_reports(tasks).await.unwrap_err();
        assert!(matches!(err, Error::IOError(_)));
        assert!(finished.load(Ordering::SeqCst));
    }
}
