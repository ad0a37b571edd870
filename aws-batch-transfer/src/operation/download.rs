/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tokio::io::AsyncReadExt;

use crate::checksum::Sha256Digest;
use crate::client::Handle;
use crate::error;
use crate::io::CallbackStream;
use crate::metrics::ThroughputTracker;
use crate::operation::TransferOutput;
use crate::types::{Direction, ObjectLocation};

/// Operation struct for downloading a single object into memory
#[derive(Clone, Default, Debug)]
pub(crate) struct Download;

impl Download {
    /// Execute a single `Download` transfer operation
    ///
    /// The whole object is buffered in memory before it is hashed. If the object was stored
    /// with a digest the computed one has to match it.
    pub(crate) async fn orchestrate(
        handle: Arc<Handle>,
        location: &ObjectLocation,
    ) -> Result<TransferOutput, error::Error> {
        let store = handle.store()?;
        let guard =
            ThroughputTracker::enter(location.to_string(), handle.config.report_threshold());

        let output = store.get_object(location).await?;
        let expected = output.sha256().copied();
        let capacity = output
            .content_length()
            .and_then(|len| usize::try_from(len).ok())
            .unwrap_or_default();

        let mut body = CallbackStream::new(output.into_body(), guard.callback());
        let mut data = Vec::with_capacity(capacity);
        body.read_to_end(&mut data).await?;
        let summary = guard.finish();

        let digest = Sha256Digest::of(&data);
        tracing::info!(%location, sha256 = %digest, "{} bytes downloaded", data.len());

        match expected {
            Some(expected) if expected != digest => {
                return Err(error::checksum_mismatch(format!(
                    "sha256 of {location} is {digest}, object metadata recorded {expected}"
                )));
            }
            Some(_) => tracing::debug!(%location, "sha256 matches object metadata"),
            None => tracing::debug!(%location, "object has no sha256 metadata to verify against"),
        }

        Ok(TransferOutput::new(
            Direction::Download,
            location.to_string(),
            digest,
            summary,
        ))
    }
}
