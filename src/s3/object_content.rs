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

//! Object content handed to uploads and returned by downloads

use crate::s3::segmented_bytes::SegmentedBytes;
use async_std::io::{ReadExt, WriteExt};
use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use uuid::Uuid;

type IoResult<T> = core::result::Result<T, std::io::Error>;

pub type BoxedByteStream = Pin<Box<dyn Stream<Item = IoResult<Bytes>> + Send>>;

// Read size for file backed content.
const FILE_READ_SIZE: usize = 64 * 1024;

/// Declared size of an upload. An unknown size needs a part size hint.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub enum Size {
    Known(u64),
    #[default]
    Unknown,
}

impl Size {
    pub fn value(&self) -> Option<u64> {
        match self {
            Size::Known(v) => Some(*v),
            Size::Unknown => None,
        }
    }
}

impl From<Option<u64>> for Size {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Size::Unknown, Size::Known)
    }
}

/// Object content that can be uploaded or downloaded.
///
/// Backed by a byte stream of declared [`Size`], a local file or bytes
/// already in memory. A [`ContentSource`](crate::s3::content_source::ContentSource)
/// converts into stream content.
pub struct ObjectContent(Backing);

enum Backing {
    Stream(BoxedByteStream, Size),
    File(PathBuf),
    Memory(SegmentedBytes),
}

impl From<Bytes> for ObjectContent {
    fn from(value: Bytes) -> Self {
        ObjectContent(Backing::Memory(value.into()))
    }
}

impl From<SegmentedBytes> for ObjectContent {
    fn from(value: SegmentedBytes) -> Self {
        ObjectContent(Backing::Memory(value))
    }
}

impl From<&Path> for ObjectContent {
    fn from(value: &Path) -> Self {
        ObjectContent(Backing::File(value.to_path_buf()))
    }
}

impl ObjectContent {
    pub fn new_from_stream(
        r: impl Stream<Item = IoResult<Bytes>> + Send + 'static,
        size: impl Into<Size>,
    ) -> Self {
        ObjectContent(Backing::Stream(Box::pin(r), size.into()))
    }

    /// Opens the content as a byte stream. Files and in-memory bytes report
    /// their exact size.
    pub async fn to_stream(self) -> IoResult<(BoxedByteStream, Size)> {
        match self.0 {
            Backing::Stream(r, size) => Ok((r, size)),
            Backing::File(path) => {
                let mut file = async_std::fs::File::open(&path).await?;
                let size = file.metadata().await?.len();
                let r = async_stream::try_stream! {
                    let mut buf = vec![0u8; FILE_READ_SIZE];
                    loop {
                        let n = file.read(&mut buf).await?;
                        if n == 0 {
                            break;
                        }
                        yield Bytes::copy_from_slice(&buf[..n]);
                    }
                };
                Ok((Box::pin(r), Size::Known(size)))
            }
            Backing::Memory(sb) => {
                let size = Size::Known(sb.len() as u64);
                Ok((Box::pin(stream::iter(sb.into_iter().map(Ok))), size))
            }
        }
    }

    #[allow(clippy::wrong_self_convention)]
    pub async fn to_content_stream(self) -> IoResult<ContentStream> {
        let (r, size) = self.to_stream().await?;
        Ok(ContentStream::new(r, size))
    }

    /// Loads the whole content into memory.
    pub async fn to_segmented_bytes(self) -> IoResult<SegmentedBytes> {
        let (mut r, _) = self.to_stream().await?;
        let mut sb = SegmentedBytes::new();
        while let Some(chunk) = r.next().await {
            let chunk = chunk?;
            if chunk.is_empty() {
                break;
            }
            sb.append(chunk);
        }
        Ok(sb)
    }

    /// Writes the content to `file_path` and returns the number of bytes
    /// written.
    ///
    /// Bytes go to a uniquely named sibling first, which is renamed over
    /// `file_path` once complete. Missing parent directories are created.
    pub async fn to_file(self, file_path: &Path) -> IoResult<u64> {
        if file_path.is_dir() {
            return Err(std::io::Error::other("path is a directory"));
        }
        let file_name = file_path
            .file_name()
            .ok_or_else(|| std::io::Error::other(format!("{file_path:?} has no file name")))?;
        let parent_dir = file_path.parent().unwrap_or(Path::new(""));
        if !parent_dir.as_os_str().is_empty() {
            async_std::fs::create_dir_all(parent_dir).await?;
        }
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(format!(".{}.part", Uuid::new_v4().simple()));
        let tmp_path = parent_dir.join(tmp_name);

        let mut fp = async_std::fs::File::create(&tmp_path).await?;
        let (mut r, _) = self.to_stream().await?;
        let mut written = 0u64;
        while let Some(chunk) = r.next().await {
            let chunk = chunk?;
            if chunk.is_empty() {
                break;
            }
            fp.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        fp.flush().await?;
        drop(fp);
        async_std::fs::rename(&tmp_path, file_path).await?;
        Ok(written)
    }
}

/// A byte stream that hands out bounded pieces, keeping any excess of the
/// last chunk for the next read.
pub struct ContentStream {
    r: BoxedByteStream,
    extra: Option<Bytes>,
    size: Size,
}

impl ContentStream {
    pub fn new(
        r: impl Stream<Item = IoResult<Bytes>> + Send + 'static,
        size: impl Into<Size>,
    ) -> Self {
        Self {
            r: Box::pin(r),
            extra: None,
            size: size.into(),
        }
    }

    pub fn get_size(&self) -> Size {
        self.size
    }

    /// Reads up to `n` bytes. A result shorter than `n` means the stream
    /// has ended.
    pub async fn read_upto(&mut self, n: usize) -> IoResult<SegmentedBytes> {
        let mut sb = SegmentedBytes::new();
        let mut remaining = n;
        while remaining > 0 {
            let chunk = match self.extra.take() {
                Some(extra) => extra,
                None => match self.r.next().await {
                    Some(chunk) => chunk?,
                    None => break,
                },
            };
            if chunk.is_empty() {
                break;
            }
            if chunk.len() > remaining {
                self.extra = Some(chunk.slice(remaining..));
                sb.append(chunk.slice(..remaining));
                break;
            }
            remaining -= chunk.len();
            sb.append(chunk);
        }
        Ok(sb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::content_source::ContentSource;

    fn chunked(chunks: &[&'static [u8]]) -> ContentStream {
        let items: Vec<IoResult<Bytes>> = chunks.iter().map(|c| Ok(Bytes::from(*c))).collect();
        ContentStream::new(stream::iter(items), Size::Unknown)
    }

    #[tokio::test]
    async fn read_upto_carries_over_excess() {
        let mut cs = chunked(&[b"abcdef", b"gh", b"ijklmnop"]);
        assert_eq!(cs.read_upto(4).await.unwrap().to_bytes(), &b"abcd"[..]);
        assert_eq!(cs.read_upto(5).await.unwrap().to_bytes(), &b"efghi"[..]);
        assert_eq!(cs.read_upto(100).await.unwrap().to_bytes(), &b"jklmnop"[..]);
        assert!(cs.read_upto(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_upto_stops_at_empty_chunk() {
        let mut cs = chunked(&[b"ab", b"", b"cd"]);
        assert_eq!(cs.read_upto(10).await.unwrap().to_bytes(), &b"ab"[..]);
    }

    #[tokio::test]
    async fn bytes_content_declares_its_length() {
        let content = ObjectContent::from(Bytes::from_static(b"hello"));
        let cs = content.to_content_stream().await.unwrap();
        assert_eq!(cs.get_size(), Size::Known(5));
    }

    #[tokio::test]
    async fn content_source_survives_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("object-content-{}", Uuid::new_v4()));
        let path = dir.join("content.bin");

        let written = ObjectContent::from(ContentSource::new(20_000))
            .to_file(&path)
            .await
            .unwrap();
        assert_eq!(written, 20_000);

        let from_file = ObjectContent::from(path.as_path())
            .to_segmented_bytes()
            .await
            .unwrap();
        let from_source = ObjectContent::from(ContentSource::new(20_000))
            .to_segmented_bytes()
            .await
            .unwrap();
        assert_eq!(from_file.to_bytes(), from_source.to_bytes());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn to_file_rejects_directories() {
        let err = ObjectContent::from(Bytes::new())
            .to_file(&std::env::temp_dir())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::Other);
    }
}
