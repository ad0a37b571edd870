/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::PathBuf;

use crate::config::Builder;
use crate::store::S3Store;
use crate::Config;

/// Load runner [`Config`] from the environment.
///
/// The Amazon S3 client is configured from the process environment (region, credentials,
/// endpoint overrides) the way every AWS SDK client is.
#[derive(Debug)]
pub struct ConfigLoader {
    builder: Builder,
    object_store: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            builder: Builder::default(),
            object_store: true,
        }
    }
}

impl ConfigLoader {
    /// Seed for the payload PRNG. See [`Builder::seed`].
    pub fn seed(mut self, seed: u64) -> Self {
        self.builder = self.builder.seed(seed);
        self
    }

    /// Size of the replicated payload block. See [`Builder::block_size`].
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.builder = self.builder.block_size(block_size);
        self
    }

    /// Total size of generated payloads. See [`Builder::payload_size`].
    pub fn payload_size(mut self, size: u64) -> Self {
        self.builder = self.builder.payload_size(size);
        self
    }

    /// Number of bytes between progress log lines. See [`Builder::report_threshold`].
    pub fn report_threshold(mut self, threshold: u64) -> Self {
        self.builder = self.builder.report_threshold(threshold);
        self
    }

    /// Size of the buffer used for each filesystem read. See [`Builder::read_buffer_size`].
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.builder = self.builder.read_buffer_size(size);
        self
    }

    /// Mount point of the shared filesystem. See [`Builder::fsx_directory`].
    pub fn fsx_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.builder = self.builder.fsx_directory(dir);
        self
    }

    /// Whether to construct the Amazon S3 backed store. Default is `true`.
    ///
    /// Filesystem only jobs can skip it to avoid resolving credentials.
    pub fn object_store(mut self, enabled: bool) -> Self {
        self.object_store = enabled;
        self
    }

    /// Load the configuration
    ///
    /// If fields have been overridden during builder construction, the override values will be
    /// used. Otherwise, the default values for each field will be provided.
    pub async fn load(self) -> Config {
        if !self.object_store {
            return self.builder.set_store(None).build();
        }

        let shared_config = aws_config::from_env().load().await;
        tracing::debug!(region = ?shared_config.region(), "loaded shared AWS config");
        let s3_client = aws_sdk_s3::Client::new(&shared_config);
        self.builder.store(S3Store::new(s3_client)).build()
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigLoader;

    #[tokio::test]
    async fn test_load_without_object_store() {
        let config = ConfigLoader::default()
            .seed(42)
            .payload_size(1024)
            .fsx_directory("/scratch")
            .object_store(false)
            .load()
            .await;

        assert_eq!(42, config.payload().seed());
        assert_eq!(1024, config.payload().size());
        assert_eq!(std::path::Path::new("/scratch"), config.fsx_directory());
        assert!(config.store().is_none());
    }
}
