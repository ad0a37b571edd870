/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error;
use crate::io::Payload;
use crate::store::ObjectStore;
use crate::{
    DEFAULT_BLOCK_SIZE, DEFAULT_FSX_DIRECTORY, DEFAULT_PAYLOAD_SIZE, DEFAULT_READ_BUFFER_SIZE,
    DEFAULT_REPORT_THRESHOLD, DEFAULT_SEED,
};

/// Load configuration and the object store from the environment
pub mod loader;

/// Parameters of the synthetic payload written by upload and fsx-write jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadSettings {
    seed: u64,
    block_size: usize,
    size: u64,
}

impl PayloadSettings {
    /// PRNG seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Size of the replicated block
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Total payload size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Generate the payload described by these settings
    pub fn generate(&self) -> Result<Payload, error::Error> {
        Payload::generate(self.seed, self.block_size, self.size)
    }
}

impl Default for PayloadSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            block_size: DEFAULT_BLOCK_SIZE,
            size: DEFAULT_PAYLOAD_SIZE,
        }
    }
}

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    payload: PayloadSettings,
    report_threshold: u64,
    read_buffer_size: usize,
    fsx_directory: PathBuf,
    store: Option<Arc<dyn ObjectStore>>,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Settings for the generated payload
    pub fn payload(&self) -> &PayloadSettings {
        &self.payload
    }

    /// Number of bytes between progress log lines
    pub fn report_threshold(&self) -> u64 {
        self.report_threshold
    }

    /// Size of the buffer used for each filesystem read
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// Mount point of the shared filesystem
    pub fn fsx_directory(&self) -> &Path {
        &self.fsx_directory
    }

    /// The object store upload and download jobs use, if configured
    pub fn store(&self) -> Option<&Arc<dyn ObjectStore>> {
        self.store.as_ref()
    }
}

impl Default for Config {
    fn default() -> Self {
        Builder::default().build()
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone)]
pub struct Builder {
    payload: PayloadSettings,
    report_threshold: u64,
    read_buffer_size: usize,
    fsx_directory: PathBuf,
    store: Option<Arc<dyn ObjectStore>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            payload: PayloadSettings::default(),
            report_threshold: DEFAULT_REPORT_THRESHOLD,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            fsx_directory: PathBuf::from(DEFAULT_FSX_DIRECTORY),
            store: None,
        }
    }
}

impl Builder {
    /// Seed for the payload PRNG.
    ///
    /// The same seed always produces the same payload. Default is `19590414`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.payload.seed = seed;
        self
    }

    /// Size of the random block replicated to build the payload.
    ///
    /// Must be a power of two, this is checked when the payload is generated.
    /// Default is 1 MiB.
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.payload.block_size = block_size;
        self
    }

    /// Total size of generated payloads. Default is 3.5 GiB.
    pub fn payload_size(mut self, size: u64) -> Self {
        self.payload.size = size;
        self
    }

    /// Number of bytes between progress log lines.
    ///
    /// Values below one byte are rounded up. Default is 256 MiB (2<sup>28</sup> bytes).
    pub fn report_threshold(mut self, threshold: u64) -> Self {
        self.report_threshold = threshold.max(1);
        self
    }

    /// Size of the buffer used for each filesystem read. Default is 8 MiB.
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Mount point of the shared filesystem. Default is `/fsx`.
    pub fn fsx_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fsx_directory = dir.into();
        self
    }

    /// Object store used by upload and download jobs
    pub fn store(mut self, store: impl ObjectStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Object store used by upload and download jobs.
    ///
    /// NOTE: for internal use, allows sharing an already constructed store
    pub(crate) fn set_store(mut self, store: Option<Arc<dyn ObjectStore>>) -> Self {
        self.store = store;
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    pub fn build(self) -> Config {
        Config {
            payload: self.payload,
            report_threshold: self.report_threshold,
            read_buffer_size: self.read_buffer_size,
            fsx_directory: self.fsx_directory,
            store: self.store,
        }
    }
}
