/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::checksum::Sha256Digest;
use crate::metrics::TransferSummary;
use crate::types::Direction;

/// Upload the generated payload to the object store
pub(crate) mod upload;

/// Download an object from the object store
pub(crate) mod download;

/// Write and read the shared filesystem mount
pub(crate) mod fsx;

/// Result of a completed transfer
#[derive(Debug, Clone)]
pub struct TransferOutput {
    direction: Direction,
    target: String,
    sha256: Sha256Digest,
    summary: TransferSummary,
}

impl TransferOutput {
    pub(crate) fn new(
        direction: Direction,
        target: impl Into<String>,
        sha256: Sha256Digest,
        summary: TransferSummary,
    ) -> Self {
        Self {
            direction,
            target: target.into(),
            sha256,
            summary,
        }
    }

    /// The kind of transfer performed
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Where the bytes went to or came from, e.g. `s3://bucket/key` or a file path
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Number of bytes moved
    pub fn bytes_transferred(&self) -> u64 {
        self.summary.total_bytes()
    }

    /// SHA-256 digest of the transferred content
    pub fn sha256(&self) -> &Sha256Digest {
        &self.sha256
    }

    /// Throughput summary logged when the transfer finished
    pub fn summary(&self) -> &TransferSummary {
        &self.summary
    }
}
