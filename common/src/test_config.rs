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

use std::path::PathBuf;

const DEFAULT_ENABLE_HTTPS: bool = true;
const DEFAULT_PART_SIZE: u64 = 5 * 1024 * 1024;
const DEFAULT_WORKERS: usize = 4;
const DEFAULT_KMS_KEY_ID: &str = "my-minio-key";
const DEFAULT_SSEC_KEY: &str = "32byteslongsecretkeymustprovided";

/// Configuration of one test driver.
///
/// Read once from the environment by [`TestConfig::from_env`] and owned by
/// the test that uses it:
///
/// | variable | default |
/// |---|---|
/// | `ENABLE_HTTPS` | `true` |
/// | `MINIO_TEST_PART_SIZE` | 5 MiB |
/// | `MINIO_TEST_WORKERS` | 4 |
/// | `MINIO_TEST_KMS_KEY_ID` | `my-minio-key` |
/// | `MINIO_TEST_SSEC_KEY` | a fixed 32 byte key |
/// | `MINIO_TEST_TEMP_DIR` | the OS temp dir |
#[derive(Clone, Debug)]
pub struct TestConfig {
    pub secure: bool,
    pub part_size: u64,
    pub workers: usize,
    pub kms_key_id: String,
    pub ssec_key: String,
    pub temp_dir: PathBuf,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            secure: DEFAULT_ENABLE_HTTPS,
            part_size: DEFAULT_PART_SIZE,
            workers: DEFAULT_WORKERS,
            kms_key_id: DEFAULT_KMS_KEY_ID.to_string(),
            ssec_key: DEFAULT_SSEC_KEY.to_string(),
            temp_dir: std::env::temp_dir(),
        }
    }
}

impl TestConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup` instead of the process
    /// environment. Unparsable values fall back to their defaults.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = TestConfig::default();

        let secure: bool = lookup("ENABLE_HTTPS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.secure);
        log::debug!("ENABLE_HTTPS={secure}");

        let part_size: u64 = lookup("MINIO_TEST_PART_SIZE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.part_size);
        log::debug!("MINIO_TEST_PART_SIZE={part_size}");

        let workers: usize = lookup("MINIO_TEST_WORKERS")
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.workers);
        log::debug!("MINIO_TEST_WORKERS={workers}");

        let kms_key_id: String = lookup("MINIO_TEST_KMS_KEY_ID").unwrap_or(defaults.kms_key_id);
        log::debug!("MINIO_TEST_KMS_KEY_ID={kms_key_id}");

        let ssec_key: String = match lookup("MINIO_TEST_SSEC_KEY") {
            Some(v) if v.len() == 32 => v,
            Some(v) => {
                log::warn!(
                    "MINIO_TEST_SSEC_KEY must be 32 bytes long, got {}; using the default key",
                    v.len()
                );
                defaults.ssec_key
            }
            None => defaults.ssec_key,
        };
        log::debug!("MINIO_TEST_SSEC_KEY=*****");

        let temp_dir: PathBuf = lookup("MINIO_TEST_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.temp_dir);
        log::debug!("MINIO_TEST_TEMP_DIR={}", temp_dir.display());

        Self {
            secure,
            part_size,
            workers,
            kms_key_id,
            ssec_key,
            temp_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_of(vars: &[(&str, &str)]) -> TestConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TestConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_of(&[]);
        assert!(config.secure);
        assert_eq!(config.part_size, DEFAULT_PART_SIZE);
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.ssec_key.len(), 32);
        assert_eq!(config.temp_dir, std::env::temp_dir());
    }

    #[test]
    fn values_are_read_from_the_lookup() {
        let config = config_of(&[
            ("ENABLE_HTTPS", "false"),
            ("MINIO_TEST_PART_SIZE", "6291456"),
            ("MINIO_TEST_WORKERS", "8"),
            ("MINIO_TEST_KMS_KEY_ID", "other-key"),
            ("MINIO_TEST_TEMP_DIR", "/var/tmp"),
        ]);
        assert!(!config.secure);
        assert_eq!(config.part_size, 6 * 1024 * 1024);
        assert_eq!(config.workers, 8);
        assert_eq!(config.kms_key_id, "other-key");
        assert_eq!(config.temp_dir, PathBuf::from("/var/tmp"));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_of(&[
            ("ENABLE_HTTPS", "yes please"),
            ("MINIO_TEST_WORKERS", "0"),
            ("MINIO_TEST_SSEC_KEY", "too-short"),
        ]);
        assert!(config.secure);
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.ssec_key, DEFAULT_SSEC_KEY);
    }
}
