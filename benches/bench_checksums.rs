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

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use minio_fixtures::s3::checksum::{digest_of, digest_of_with_chunk_size, sha256_hash, skip_exactly};
use minio_fixtures::s3::content_source::ContentSource;
use minio_fixtures::s3::utils::{check_bucket_name, md5sum_hash};

fn bench_checksums(c: &mut Criterion) {
    let sizes = vec![
        ("1KB", 1024),
        ("100KB", 100 * 1024),
        ("1MB", 1024 * 1024),
        ("10MB", 10 * 1024 * 1024),
    ];

    for (name, size) in sizes {
        let data = vec![0u8; size];

        let mut group = c.benchmark_group(format!("checksum_{}", name));
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_function("MD5", |b| b.iter(|| md5sum_hash(&data)));

        group.bench_function("SHA256", |b| b.iter(|| sha256_hash(&data)));

        group.bench_function("digest_of", |b| {
            b.iter(|| digest_of(&mut ContentSource::new(size as u64), size as u64))
        });

        group.bench_function("skip_exactly", |b| {
            b.iter(|| skip_exactly(&mut ContentSource::new(size as u64), size as u64))
        });

        group.finish();
    }
}

fn bench_chunk_sizes(c: &mut Criterion) {
    let size: u64 = 4 * 1024 * 1024;
    let mut group = c.benchmark_group("digest_of_chunk_size");
    group.throughput(Throughput::Bytes(size));

    for chunk_size in [512usize, 4 * 1024, 16 * 1024, 128 * 1024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    digest_of_with_chunk_size(&mut ContentSource::new(size), size, chunk_size)
                })
            },
        );
    }
    group.finish();
}

fn bench_check_bucket_name(c: &mut Criterion) {
    c.bench_function("check_bucket_name true", |b| {
        b.iter(|| check_bucket_name("my-example-bucket-name", true))
    });

    c.bench_function("check_bucket_name false", |b| {
        b.iter(|| check_bucket_name("my-example-bucket-name", false))
    });
}

criterion_group!(
    benches,
    bench_checksums,
    bench_chunk_sizes,
    bench_check_bucket_name
);
criterion_main!(benches);
