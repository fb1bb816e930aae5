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

//! Various utility and helper functions

use crate::s3::error::Error;
use crate::s3::segmented_bytes::SegmentedBytes;
use base64::engine::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDateTime, ParseError, Utc};
use lazy_static::lazy_static;
use md5::compute as md5compute;
use regex::Regex;

/// Date and time with UTC timezone
pub type UtcTime = DateTime<Utc>;

/// Encodes data using base64 algorithm
pub fn b64encode<T: AsRef<[u8]>>(input: T) -> String {
    BASE64.encode(input)
}

/// Gets base64 encoded MD5 hash of given data
pub fn md5sum_hash(data: &[u8]) -> String {
    b64encode(md5compute(data).as_slice())
}

/// Gets hex encoded MD5 hash of given data
pub fn md5_hex(data: &[u8]) -> String {
    format!("{:x}", md5compute(data))
}

/// Gets MD5 digest of segmented data without joining the segments
pub fn md5_digest_sb(sb: &SegmentedBytes) -> md5::Digest {
    let mut hasher = md5::Context::new();
    for data in sb.iter() {
        hasher.consume(data);
    }
    hasher.compute()
}

/// Gets hex encoded MD5 hash of segmented data
pub fn md5_hex_sb(sb: &SegmentedBytes) -> String {
    format!("{:x}", md5_digest_sb(sb))
}

/// Gets current UTC time
pub fn utc_now() -> UtcTime {
    chrono::offset::Utc::now()
}

/// Gets ISO8601 UTC formatted value of given date time
pub fn to_iso8601utc(time: UtcTime) -> String {
    time.format("%Y-%m-%dT%H:%M:%S.%3fZ").to_string()
}

/// Parses ISO8601 UTC formatted value to time
pub fn from_iso8601utc(s: &str) -> Result<UtcTime, ParseError> {
    let dt = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S.%3fZ")?;
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
}

/// Validates given bucket name
pub fn check_bucket_name(bucket_name: &str, strict: bool) -> Result<(), Error> {
    if bucket_name.trim().is_empty() {
        return Err(Error::InvalidBucketName(String::from(
            "bucket name cannot be empty",
        )));
    }

    if bucket_name.len() < 3 {
        return Err(Error::InvalidBucketName(String::from(
            "bucket name cannot be less than 3 characters",
        )));
    }

    if bucket_name.len() > 63 {
        return Err(Error::InvalidBucketName(String::from(
            "bucket name cannot be greater than 63 characters",
        )));
    }

    lazy_static! {
        static ref IPV4_REGEX: Regex = Regex::new(r"^((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])\.){3}(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])$").unwrap();
        static ref VALID_BUCKET_NAME_REGEX: Regex =
            Regex::new("^[A-Za-z0-9][A-Za-z0-9\\.\\-_:]{1,61}[A-Za-z0-9]$").unwrap();
        static ref VALID_BUCKET_NAME_STRICT_REGEX: Regex =
            Regex::new("^[a-z0-9][a-z0-9\\.\\-]{1,61}[a-z0-9]$").unwrap();
    }

    if IPV4_REGEX.is_match(bucket_name) {
        return Err(Error::InvalidBucketName(String::from(
            "bucket name cannot be an IP address",
        )));
    }

    if bucket_name.contains("..") || bucket_name.contains(".-") || bucket_name.contains("-.") {
        return Err(Error::InvalidBucketName(String::from(
            "bucket name contains invalid successive characters '..', '.-' or '-.'",
        )));
    }

    let valid = match strict {
        true => VALID_BUCKET_NAME_STRICT_REGEX.is_match(bucket_name),
        false => VALID_BUCKET_NAME_REGEX.is_match(bucket_name),
    };
    if !valid {
        return Err(Error::InvalidBucketName(format!(
            "bucket name '{bucket_name}' does not follow S3 standards{}",
            if strict { " strictly" } else { "" }
        )));
    }

    Ok(())
}

/// Validates given object name; S3 keys are 1 to 1024 bytes of UTF-8.
pub fn check_object_name(object_name: &str) -> Result<(), Error> {
    if object_name.is_empty() {
        return Err(Error::InvalidObjectName(String::from(
            "object name cannot be empty",
        )));
    }
    if object_name.len() > 1024 {
        return Err(Error::InvalidObjectName(format!(
            "object name cannot be greater than 1024 bytes; got {}",
            object_name.len()
        )));
    }
    if object_name.contains('\0') {
        return Err(Error::InvalidObjectName(String::from(
            "object name cannot contain NUL characters",
        )));
    }
    Ok(())
}
