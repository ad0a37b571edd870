/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

pub(crate) mod body;
mod callback_stream;
/// Deterministic synthetic payloads
pub mod payload;

use std::pin::Pin;

use tokio::io::AsyncRead;

// re-exports
pub use self::callback_stream::CallbackStream;
pub use self::payload::{Payload, PayloadReader};

/// Boxed reader handed to an object store for upload
pub type UploadReader = Pin<Box<dyn AsyncRead + Send + Sync + 'static>>;

/// Boxed reader returned by an object store for download
pub type DownloadReader = Pin<Box<dyn AsyncRead + Send + 'static>>;
