/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::checksum::Sha256Hasher;
use crate::client::Handle;
use crate::error;
use crate::io::CallbackStream;
use crate::metrics::ThroughputTracker;
use crate::operation::TransferOutput;
use crate::types::Direction;

/// Operation struct for writing the generated payload to the filesystem mount
#[derive(Clone, Default, Debug)]
pub(crate) struct FsxWrite;

impl FsxWrite {
    /// Execute a single `FsxWrite` transfer operation
    pub(crate) async fn orchestrate(
        handle: Arc<Handle>,
        key: &str,
    ) -> Result<TransferOutput, error::Error> {
        let path = resolve_path(handle.config.fsx_directory(), key)?;
        let payload = handle.config.payload().generate()?;
        let digest = payload.sha256();
        tracing::info!(
            path = %path.display(),
            size = payload.len(),
            seed = payload.seed(),
            sha256 = %digest,
            "generated payload"
        );

        let guard = ThroughputTracker::enter(
            path.display().to_string(),
            handle.config.report_threshold(),
        );
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = tokio::fs::File::create(&path).await?;
        let mut dest = CallbackStream::new(file, guard.callback());
        for chunk in payload.chunks() {
            dest.write_all(&chunk).await?;
        }
        dest.flush().await?;
        dest.into_inner().sync_all().await?;
        let summary = guard.finish();

        tracing::info!("{} bytes written to {}", summary.total_bytes(), path.display());
        Ok(TransferOutput::new(
            Direction::FsxWrite,
            path.display().to_string(),
            digest,
            summary,
        ))
    }
}

/// Operation struct for reading a file back from the filesystem mount
#[derive(Clone, Default, Debug)]
pub(crate) struct FsxRead;

impl FsxRead {
    /// Execute a single `FsxRead` transfer operation
    pub(crate) async fn orchestrate(
        handle: Arc<Handle>,
        key: &str,
    ) -> Result<TransferOutput, error::Error> {
        let path = resolve_path(handle.config.fsx_directory(), key)?;
        let guard = ThroughputTracker::enter(
            path.display().to_string(),
            handle.config.report_threshold(),
        );

        let file = tokio::fs::File::open(&path).await?;
        let mut src = CallbackStream::new(file, guard.callback());
        let mut hasher = Sha256Hasher::new();
        let mut buf = vec![0u8; handle.config.read_buffer_size()];
        loop {
            let n = src.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        let summary = guard.finish();

        let digest = hasher.finalize();
        tracing::info!(
            sha256 = %digest,
            "{} bytes read from {}",
            summary.total_bytes(),
            path.display()
        );
        Ok(TransferOutput::new(
            Direction::FsxRead,
            path.display().to_string(),
            digest,
            summary,
        ))
    }
}

/// Resolve `key` to a path below `root`.
///
/// Keys must be relative and may not climb out of `root`.
pub(crate) fn resolve_path(root: &Path, key: &str) -> Result<PathBuf, error::Error> {
    let relative = Path::new(key);
    let mut path = root.to_path_buf();
    let mut depth = 0;
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                path.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(error::invalid_input(format!(
                    "key {key:?} must be a relative path without '..' components"
                )));
            }
        }
    }

    if depth == 0 {
        return Err(error::invalid_input(format!("key {key:?} does not name a file")));
    }
    Ok(path)
}
