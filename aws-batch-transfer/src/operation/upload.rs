/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::client::Handle;
use crate::error;
use crate::io::{CallbackStream, UploadReader};
use crate::metrics::ThroughputTracker;
use crate::operation::TransferOutput;
use crate::store::PutObjectInput;
use crate::types::{Direction, ObjectLocation};

/// Operation struct for uploading the generated payload
#[derive(Clone, Default, Debug)]
pub(crate) struct Upload;

impl Upload {
    /// Execute a single `Upload` transfer operation
    pub(crate) async fn orchestrate(
        handle: Arc<Handle>,
        location: &ObjectLocation,
    ) -> Result<TransferOutput, error::Error> {
        let store = handle.store()?;
        let payload = handle.config.payload().generate()?;
        let digest = payload.sha256();
        tracing::info!(
            %location,
            size = payload.len(),
            seed = payload.seed(),
            sha256 = %digest,
            "generated payload"
        );

        let guard =
            ThroughputTracker::enter(location.to_string(), handle.config.report_threshold());
        let body: UploadReader = Box::pin(CallbackStream::new(payload.reader(), guard.callback()));
        let input = PutObjectInput::new(body, payload.len()).with_sha256(digest);
        store.put_object(location, input).await?;
        let summary = guard.finish();

        tracing::info!("{} bytes uploaded to {location}", summary.total_bytes());
        Ok(TransferOutput::new(
            Direction::Upload,
            location.to_string(),
            digest,
            summary,
        ))
    }
}
