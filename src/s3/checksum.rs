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

//! SHA-256 digests over exactly `n` bytes of a reader or downloaded stream
//!
//! The expected digest of an upload is computed from one
//! [`ContentSource`](crate::s3::content_source::ContentSource), the actual
//! digest from whatever comes back from the store. Neither side is ever
//! buffered in full. Any source that ends before `n` bytes fails with
//! [`Error::DataLengthMismatch`]; nothing is truncated or padded.

use crate::s3::error::Error;
use crate::s3::object_content::{ContentStream, ObjectContent};
#[cfg(feature = "ring")]
use ring::digest::{Context, SHA256};
#[cfg(not(feature = "ring"))]
use sha2::{Digest, Sha256};
use std::io::{ErrorKind, Read};

/// Read size used by [`digest_of`] and [`skip_exactly`].
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Length of a hex encoded SHA-256 digest.
pub const HEX_DIGEST_LEN: usize = 64;

/// Incremental SHA-256 state with a running byte count.
///
/// Finalizing consumes the state, so it cannot be fed again afterwards.
pub struct ChecksumState {
    #[cfg(feature = "ring")]
    ctx: Context,
    #[cfg(not(feature = "ring"))]
    hasher: Sha256,
    total_bytes: u64,
}

impl Default for ChecksumState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecksumState {
    pub fn new() -> Self {
        ChecksumState {
            #[cfg(feature = "ring")]
            ctx: Context::new(&SHA256),
            #[cfg(not(feature = "ring"))]
            hasher: Sha256::new(),
            total_bytes: 0,
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        #[cfg(feature = "ring")]
        self.ctx.update(data);
        #[cfg(not(feature = "ring"))]
        self.hasher.update(data);
        self.total_bytes += data.len() as u64;
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Returns the lowercase hex digest of everything fed so far.
    pub fn finalize(self) -> String {
        #[cfg(feature = "ring")]
        {
            self.ctx
                .finish()
                .as_ref()
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect()
        }
        #[cfg(not(feature = "ring"))]
        {
            format!("{:x}", self.hasher.finalize())
        }
    }
}

/// Gets hex encoded SHA256 hash of given data
pub fn sha256_hash(data: &[u8]) -> String {
    let mut state = ChecksumState::new();
    state.update(data);
    state.finalize()
}

/// Digest of exactly `length` bytes read from `source` in 16 KiB chunks.
pub fn digest_of<R: Read + ?Sized>(source: &mut R, length: u64) -> Result<String, Error> {
    digest_of_with_chunk_size(source, length, DEFAULT_CHUNK_SIZE)
}

/// Same as [`digest_of`] with an explicit read size.
///
/// The digest does not depend on `chunk_size`; only the number of read
/// calls does.
pub fn digest_of_with_chunk_size<R: Read + ?Sized>(
    source: &mut R,
    length: u64,
    chunk_size: usize,
) -> Result<String, Error> {
    let mut state = ChecksumState::new();
    consume_exactly(source, length, chunk_size, |chunk| state.update(chunk)).map_err(|e| match e {
        ReadFailure::EndedAt(got) => Error::DataLengthMismatch(length, got),
        ReadFailure::Io(e) => Error::from(e),
    })?;
    Ok(state.finalize())
}

/// Reads and discards exactly `length` bytes from `source`.
///
/// Fails with [`Error::InsufficientData`] if the source ends first.
pub fn skip_exactly<R: Read + ?Sized>(source: &mut R, length: u64) -> Result<(), Error> {
    consume_exactly(source, length, DEFAULT_CHUNK_SIZE, |_| {}).map_err(|e| match e {
        ReadFailure::EndedAt(got) => Error::InsufficientData(length, got),
        ReadFailure::Io(e) => Error::from(e),
    })
}

enum ReadFailure {
    // The source signalled end of data after this many bytes.
    EndedAt(u64),
    Io(std::io::Error),
}

fn consume_exactly<R: Read + ?Sized>(
    source: &mut R,
    length: u64,
    chunk_size: usize,
    mut sink: impl FnMut(&[u8]),
) -> Result<(), ReadFailure> {
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total: u64 = 0;
    while total < length {
        let want = (length - total).min(buf.len() as u64) as usize;
        let n = match source.read(&mut buf[..want]) {
            Ok(0) => return Err(ReadFailure::EndedAt(total)),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReadFailure::Io(e)),
        };
        sink(&buf[..n]);
        total += n as u64;
    }
    Ok(())
}

/// Digest of exactly `length` bytes of downloaded content.
pub async fn digest_of_content(content: ObjectContent, length: u64) -> Result<String, Error> {
    let mut stream = content.to_content_stream().await?;
    digest_of_stream(&mut stream, length).await
}

/// Digest of exactly `length` bytes taken from `stream`.
///
/// Bytes past `length` are left in the stream.
pub async fn digest_of_stream(stream: &mut ContentStream, length: u64) -> Result<String, Error> {
    let mut state = ChecksumState::new();
    while state.total_bytes() < length {
        let want = (length - state.total_bytes()).min(DEFAULT_CHUNK_SIZE as u64) as usize;
        let chunk = stream.read_upto(want).await?;
        if chunk.is_empty() {
            return Err(Error::DataLengthMismatch(length, state.total_bytes()));
        }
        for bytes in chunk.iter() {
            state.update(bytes);
        }
    }
    Ok(state.finalize())
}
