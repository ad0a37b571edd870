/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tracing::Instrument;

use crate::error;
use crate::operation::download::Download;
use crate::operation::fsx::{FsxRead, FsxWrite};
use crate::operation::upload::Upload;
use crate::operation::TransferOutput;
use crate::store::ObjectStore;
use crate::types::{Direction, ObjectLocation, TransferJob};
use crate::Config;

/// Transfer runner client.
///
/// Each operation performs exactly one transfer, tracked from start to finish.
#[derive(Debug, Clone)]
pub struct Client {
    handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: Config,
}

impl Handle {
    /// The object store, required by upload and download
    pub(crate) fn store(&self) -> Result<&Arc<dyn ObjectStore>, error::Error> {
        self.config
            .store()
            .ok_or_else(|| error::invalid_input("no object store configured"))
    }
}

impl Client {
    /// Creates a new client from a runner config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Run the transfer described by `job`
    pub async fn run(&self, job: &TransferJob) -> Result<TransferOutput, error::Error> {
        let location = job.location();
        let span = tracing::info_span!(
            "transfer",
            direction = %job.direction(),
            bucket = location.bucket(),
            key = location.key()
        );

        async {
            match job.direction() {
                Direction::Upload => self.upload(location).await,
                Direction::Download => self.download(location).await,
                Direction::FsxWrite => self.fsx_write(location.key()).await,
                Direction::FsxRead => self.fsx_read(location.key()).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Upload the generated payload to `location`.
    ///
    /// The payload digest is stored alongside the object.
    pub async fn upload(&self, location: &ObjectLocation) -> Result<TransferOutput, error::Error> {
        Upload::orchestrate(self.handle.clone(), location).await
    }

    /// Download the object at `location` into memory and compute its digest.
    ///
    /// Fails with [`ChecksumMismatch`](crate::error::ErrorKind::ChecksumMismatch) if the object
    /// was stored with a different digest.
    pub async fn download(&self, location: &ObjectLocation) -> Result<TransferOutput, error::Error> {
        Download::orchestrate(self.handle.clone(), location).await
    }

    /// Write the generated payload to `key` below the configured filesystem mount
    pub async fn fsx_write(&self, key: &str) -> Result<TransferOutput, error::Error> {
        FsxWrite::orchestrate(self.handle.clone(), key).await
    }

    /// Read `key` below the configured filesystem mount and compute its digest
    pub async fn fsx_read(&self, key: &str) -> Result<TransferOutput, error::Error> {
        FsxRead::orchestrate(self.handle.clone(), key).await
    }
}
