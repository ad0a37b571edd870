/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! AWS Batch transfer runner
//!
//! Single-shot data transfers executed inside an AWS Batch container. A job moves a
//! deterministic synthetic payload to or from Amazon S3, or to or from a mounted FSx
//! filesystem, while tracking throughput and computing a SHA-256 digest of the content.
//!
//! ```no_run
//! use aws_batch_transfer::types::{Direction, TransferJob};
//! use aws_batch_transfer::Client;
//!
//! # async fn run() -> Result<(), aws_batch_transfer::error::Error> {
//! let config = aws_batch_transfer::from_env().load().await;
//! let client = Client::new(config);
//! let job = TransferJob::new("my-bucket", "data/key1", Direction::Upload);
//! let output = client.run(&job).await?;
//! println!("sha256: {}", output.sha256());
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

pub(crate) const MEBIBYTE: u64 = 1024 * 1024;

/// Progress is logged every time this many bytes have been transferred
pub(crate) const DEFAULT_REPORT_THRESHOLD: u64 = 1 << 28;

/// 3.5 GiB
pub(crate) const DEFAULT_PAYLOAD_SIZE: u64 = 3584 * MEBIBYTE;

pub(crate) const DEFAULT_SEED: u64 = 19_590_414;

pub(crate) const DEFAULT_BLOCK_SIZE: usize = MEBIBYTE as usize;

pub(crate) const DEFAULT_READ_BUFFER_SIZE: usize = 8 * MEBIBYTE as usize;

pub(crate) const DEFAULT_FSX_DIRECTORY: &str = "/fsx";

/// Error types emitted by `aws-batch-transfer`
pub mod error;

/// Common types used by `aws-batch-transfer`
pub mod types;

/// Types and helpers for I/O
pub mod io;

/// Throughput measurement and progress tracking
pub mod metrics;

/// SHA-256 content digests
pub mod checksum;

/// Object store abstraction and implementations
pub mod store;

/// Transfer client
pub mod client;

/// Transfer operations
pub mod operation;

/// Runner configuration
pub mod config;

pub use self::client::Client;
pub use self::config::Config;

/// Create a config loader that builds the object store from the environment
pub fn from_env() -> config::loader::ConfigLoader {
    config::loader::ConfigLoader::default()
}
