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

//! Error definitions for content sources, verification and object stores

use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, Default, PartialEq)]
/// Error response for S3 operations
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub resource: String,
    pub request_id: String,
    pub bucket_name: String,
    pub object_name: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str, bucket_name: &str, object_name: &str) -> Self {
        let resource = match object_name.is_empty() {
            true => format!("/{bucket_name}"),
            false => format!("/{bucket_name}/{object_name}"),
        };
        ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            resource,
            request_id: uuid::Uuid::new_v4().simple().to_string().to_uppercase(),
            bucket_name: bucket_name.to_string(),
            object_name: object_name.to_string(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code: {}, message: {}, resource: {}, request_id: {}, bucket_name: {}, object_name: {}",
            self.code,
            self.message,
            self.resource,
            self.request_id,
            self.bucket_name,
            self.object_name,
        )
    }
}

/// Error definitions
#[derive(Debug, Error)]
pub enum Error {
    #[error("content source is closed")]
    ClosedResource,

    #[error("not enough data in the stream; expected: {0}, got: {1} bytes")]
    InsufficientData(u64, u64),

    #[error("data length mismatch; expected: {0}, got: {1} bytes")]
    DataLengthMismatch(u64, u64),

    #[error("too much data in the stream - exceeds {0} bytes")]
    TooMuchData(u64),

    #[error("digest mismatch; expected: {0}, got: {1}")]
    DigestMismatch(String, String),

    #[error("{0}")]
    IOError(std::io::Error),

    #[error("{0}")]
    InvalidBucketName(String),

    #[error("{0}")]
    InvalidObjectName(String),

    #[error("{0}")]
    InvalidUserMetadata(String),

    #[error("invalid retention mode {0}")]
    InvalidRetentionMode(String),

    #[error("invalid legal hold {0}")]
    InvalidLegalHold(String),

    #[error("{0}")]
    TimeParseError(#[from] chrono::ParseError),

    #[error("part size {0} is not supported; minimum allowed 5MiB")]
    InvalidMinPartSize(u64),

    #[error("part size {0} is not supported; maximum allowed 5GiB")]
    InvalidMaxPartSize(u64),

    #[error("object size {0} is not supported; maximum allowed 5TiB")]
    InvalidObjectSize(u64),

    #[error("valid part size must be provided when object size is unknown")]
    MissingPartSize,

    #[error("object size {0} and part size {1} make more than {2} parts for upload")]
    InvalidPartCount(u64, u64, u16),

    #[error("{}SSE operation must be performed over a secure connection", .0.as_deref().unwrap_or_default())]
    SseTlsRequired(Option<String>),

    #[error("s3 operation failed; {0}")]
    S3Error(ErrorResponse),
}

impl Error {
    /// Returns the S3 error code if this is an [`Error::S3Error`].
    pub fn s3_code(&self) -> Option<&str> {
        match self {
            Error::S3Error(er) => Some(er.code.as_str()),
            _ => None,
        }
    }

    /// Converts this error into an [`std::io::Error`] that [`From<std::io::Error>`]
    /// turns back into the original error.
    pub fn into_io_error(self) -> std::io::Error {
        match self {
            Error::IOError(e) => e,
            e => std::io::Error::other(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if !err.get_ref().is_some_and(|inner| inner.is::<Error>()) {
            return Error::IOError(err);
        }
        match err.into_inner().map(|inner| inner.downcast::<Error>()) {
            Some(Ok(e)) => *e,
            Some(Err(other)) => Error::IOError(std::io::Error::other(other)),
            None => Error::IOError(std::io::Error::other("unknown I/O error")),
        }
    }
}
