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

//! Deterministic, size-bounded content for upload/download tests

use crate::s3::error::Error;
use crate::s3::object_content::ObjectContent;
use bytes::Bytes;
use futures_io::AsyncRead;
use futures_util::Stream;
use once_cell::sync::Lazy;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Length of the repeating content cycle.
pub const CYCLE_LEN: usize = 10_007;

const CYCLE_SEED: u64 = 0x4d49_4e49_4f;
const LCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const LCG_INCREMENT: u64 = 1_442_695_040_888_963_407;
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 \n";

// Upper bound of a single stream chunk.
const STREAM_CHUNK_SIZE: u64 = 8 * 1024;

static CONTENT_CYCLE: Lazy<Vec<u8>> = Lazy::new(|| {
    let mut state = CYCLE_SEED;
    (0..CYCLE_LEN)
        .map(|_| {
            state = state
                .wrapping_mul(LCG_MULTIPLIER)
                .wrapping_add(LCG_INCREMENT);
            ALPHABET[(state >> 58) as usize]
        })
        .collect()
});

/// Returns the fixed content cycle every [`ContentSource`] repeats.
pub fn content_cycle() -> &'static [u8] {
    &CONTENT_CYCLE
}

/// A reproducible byte source of a given logical size.
///
/// The source yields `size` bytes taken from a fixed cycle of printable
/// characters, wrapping around as often as needed, without allocating the
/// content. Two sources created with the same size always yield identical
/// bytes, which makes it possible to compute the expected digest of an
/// upload from one instance and feed another instance to the upload itself.
///
/// A source is owned by exactly one reader. Once [`close`](Self::close)d,
/// every operation fails with [`Error::ClosedResource`].
///
/// ```
/// use minio_fixtures::s3::content_source::ContentSource;
///
/// let mut src = ContentSource::new(3);
/// assert_eq!(src.remaining().unwrap(), 3);
/// assert_eq!(src.skip(2).unwrap(), 2);
/// assert!(src.read_one().unwrap().is_some());
/// assert!(src.read_one().unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct ContentSource {
    size: u64,
    remaining: u64,
    cursor: usize,
    closed: bool,
}

impl ContentSource {
    pub fn new(size: u64) -> ContentSource {
        ContentSource {
            size,
            remaining: size,
            cursor: 0,
            closed: false,
        }
    }

    /// Total number of bytes this source yields before end of data.
    pub fn logical_size(&self) -> u64 {
        self.size
    }

    /// Number of bytes left before end of data.
    pub fn remaining(&self) -> Result<u64, Error> {
        self.ensure_open()?;
        Ok(self.remaining)
    }

    /// Reads a single byte; `Ok(None)` signals end of data.
    pub fn read_one(&mut self) -> Result<Option<u8>, Error> {
        self.ensure_open()?;
        if self.remaining == 0 {
            return Ok(None);
        }
        let b = CONTENT_CYCLE[self.cursor];
        self.advance(1);
        Ok(Some(b))
    }

    /// Skips up to `n` bytes and returns how many were skipped.
    ///
    /// Requests beyond the end are clamped to the remaining count. Unlike
    /// [`std::io::Seek`] style APIs, skipping on an exhausted source is an
    /// error ([`Error::InsufficientData`]), even for `n == 0`; check
    /// [`remaining`](Self::remaining) first when that is expected.
    pub fn skip(&mut self, n: u64) -> Result<u64, Error> {
        self.ensure_open()?;
        if self.remaining == 0 {
            return Err(Error::InsufficientData(n, 0));
        }
        let skipped = n.min(self.remaining);
        self.advance(skipped);
        Ok(skipped)
    }

    /// Closes the source. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<(), Error> {
        match self.closed {
            true => Err(Error::ClosedResource),
            false => Ok(()),
        }
    }

    fn advance(&mut self, n: u64) {
        self.cursor = ((self.cursor as u64 + n) % CYCLE_LEN as u64) as usize;
        self.remaining -= n;
    }

    // Copies up to `buf.len()` bytes; caller has checked the source is open.
    fn fill(&mut self, buf: &mut [u8]) -> usize {
        let n = (buf.len() as u64).min(self.remaining) as usize;
        let mut written = 0;
        while written < n {
            let take = (n - written).min(CYCLE_LEN - self.cursor);
            buf[written..written + take]
                .copy_from_slice(&CONTENT_CYCLE[self.cursor..self.cursor + take]);
            written += take;
            self.cursor = (self.cursor + take) % CYCLE_LEN;
        }
        self.remaining -= n as u64;
        n
    }
}

impl io::Read for ContentSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open().map_err(Error::into_io_error)?;
        Ok(self.fill(buf))
    }
}

/// A [`ContentSource`] consumed as a stream of bounded `Bytes` chunks.
///
/// Returned by [`ContentSource::into_stream`]. The source itself is not a
/// `Stream`, so `src.skip(n)` always resolves to [`ContentSource::skip`].
#[derive(Debug)]
pub struct ContentSourceStream {
    src: ContentSource,
}

impl ContentSource {
    /// Turns the source into a stream of chunks of at most 8 KiB.
    pub fn into_stream(self) -> ContentSourceStream {
        ContentSourceStream { src: self }
    }
}

impl Stream for ContentSourceStream {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut self.get_mut().src;
        if this.closed {
            return Poll::Ready(Some(Err(Error::ClosedResource.into_io_error())));
        }
        if this.remaining == 0 {
            return Poll::Ready(None);
        }

        let mut buf = vec![0; this.remaining.min(STREAM_CHUNK_SIZE) as usize];
        let n = this.fill(&mut buf);
        buf.truncate(n);
        Poll::Ready(Some(Ok(Bytes::from(buf))))
    }
}

impl AsyncRead for ContentSource {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.as_mut().get_mut();
        if this.closed {
            return Poll::Ready(Err(Error::ClosedResource.into_io_error()));
        }
        Poll::Ready(Ok(this.fill(buf)))
    }
}

impl From<ContentSource> for ObjectContent {
    fn from(src: ContentSource) -> Self {
        let size = src.remaining;
        ObjectContent::new_from_stream(src.into_stream(), Some(size))
    }
}
