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

use bytes::{Bytes, BytesMut};

/// An aggregated collection of `Bytes` objects.
///
/// Parts read from an upload stream are kept as the chunks they arrived in;
/// nothing is copied until [`to_bytes`](Self::to_bytes) is called.
#[derive(Debug, Clone, Default)]
pub struct SegmentedBytes {
    segments: Vec<Bytes>,
    total_size: usize,
}

impl SegmentedBytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.total_size
    }

    pub fn is_empty(&self) -> bool {
        self.total_size == 0
    }

    pub fn append(&mut self, bytes: Bytes) {
        self.total_size += bytes.len();
        self.segments.push(bytes);
    }

    /// Appends all segments of `other`.
    pub fn extend(&mut self, other: SegmentedBytes) {
        self.total_size += other.total_size;
        self.segments.extend(other.segments);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bytes> {
        self.segments.iter()
    }

    /// Returns `length` bytes starting at `offset`, sharing the underlying
    /// buffers. The range is clamped to the end of the data.
    pub fn slice(&self, offset: usize, length: usize) -> SegmentedBytes {
        let mut out = SegmentedBytes::new();
        let mut skip = offset;
        let mut want = length;
        for seg in &self.segments {
            if want == 0 {
                break;
            }
            if skip >= seg.len() {
                skip -= seg.len();
                continue;
            }
            let end = seg.len().min(skip + want);
            out.append(seg.slice(skip..end));
            want -= end - skip;
            skip = 0;
        }
        out
    }

    /// Copy all the content into a single [Bytes] object.
    ///
    /// ⚠️ This function is slow and intended for testing/debugging only.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.total_size);
        for bytes in &self.segments {
            buf.extend_from_slice(bytes);
        }
        buf.freeze()
    }
}

impl IntoIterator for SegmentedBytes {
    type Item = Bytes;
    type IntoIter = std::vec::IntoIter<Bytes>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl From<Bytes> for SegmentedBytes {
    fn from(bytes: Bytes) -> Self {
        let total_size = bytes.len();
        Self {
            segments: vec![bytes],
            total_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SegmentedBytes {
        let mut sb = SegmentedBytes::new();
        sb.append(Bytes::from_static(b"abc"));
        sb.append(Bytes::from_static(b"defgh"));
        sb.append(Bytes::from_static(b"ij"));
        sb
    }

    #[test]
    fn slice_spans_segments() {
        let sb = sample();
        assert_eq!(sb.slice(2, 5).to_bytes(), &b"cdefg"[..]);
        assert_eq!(sb.slice(8, 10).to_bytes(), &b"ij"[..]);
        assert!(sb.slice(10, 1).is_empty());
        assert_eq!(sb.slice(0, 10).len(), 10);
    }

    #[test]
    fn extend_keeps_order_and_length() {
        let mut sb = sample();
        sb.extend(SegmentedBytes::from(Bytes::from_static(b"kl")));
        assert_eq!(sb.len(), 12);
        assert_eq!(sb.to_bytes(), &b"abcdefghijkl"[..]);
        assert_eq!(sb.iter().count(), 4);
    }
}
