/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Object stores a transfer can read from or write to.
//!
//! [`ObjectStore`] is the seam between the transfer operations and the storage service.
//! [`S3Store`] talks to Amazon S3, [`InMemoryStore`] keeps objects in process memory.

use std::fmt;

use async_trait::async_trait;

use crate::checksum::Sha256Digest;
use crate::error::Error;
use crate::io::{DownloadReader, UploadReader};
use crate::types::ObjectLocation;

mod in_memory;
mod s3;

pub use self::in_memory::InMemoryStore;
pub use self::s3::S3Store;

/// User metadata key the payload digest is stored under
pub const SHA256_METADATA_KEY: &str = "sha256";

/// Storage service holding opaque objects addressed by bucket and key
#[async_trait]
pub trait ObjectStore: Send + Sync + fmt::Debug {
    /// Store the entire body under `location`, replacing any existing object.
    ///
    /// Implementations must read the body to completion.
    async fn put_object(&self, location: &ObjectLocation, input: PutObjectInput)
        -> Result<(), Error>;

    /// Open the object stored under `location` for reading
    async fn get_object(&self, location: &ObjectLocation) -> Result<GetObjectOutput, Error>;
}

/// Request to store an object
pub struct PutObjectInput {
    body: UploadReader,
    content_length: u64,
    sha256: Option<Sha256Digest>,
}

impl PutObjectInput {
    /// Create a new request for a body of exactly `content_length` bytes
    pub fn new(body: UploadReader, content_length: u64) -> Self {
        Self {
            body,
            content_length,
            sha256: None,
        }
    }

    /// Record the digest of the body alongside the object
    pub fn with_sha256(mut self, digest: Sha256Digest) -> Self {
        self.sha256 = Some(digest);
        self
    }

    /// Length of the body in bytes
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Digest recorded alongside the object, if any
    pub fn sha256(&self) -> Option<&Sha256Digest> {
        self.sha256.as_ref()
    }

    /// Consume the request returning the body
    pub fn into_body(self) -> UploadReader {
        self.body
    }
}

impl fmt::Debug for PutObjectInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutObjectInput")
            .field("content_length", &self.content_length)
            .field("sha256", &self.sha256)
            .finish_non_exhaustive()
    }
}

/// A stored object opened for reading
pub struct GetObjectOutput {
    body: DownloadReader,
    content_length: Option<u64>,
    sha256: Option<Sha256Digest>,
}

impl GetObjectOutput {
    /// Create a new output wrapping `body`
    pub fn new(body: DownloadReader) -> Self {
        Self {
            body,
            content_length: None,
            sha256: None,
        }
    }

    /// Set the advertised content length
    pub fn with_content_length(mut self, content_length: Option<u64>) -> Self {
        self.content_length = content_length;
        self
    }

    /// Set the digest recorded when the object was stored
    pub fn with_sha256(mut self, digest: Option<Sha256Digest>) -> Self {
        self.sha256 = digest;
        self
    }

    /// The advertised content length, if known
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// The digest recorded when the object was stored, if any
    pub fn sha256(&self) -> Option<&Sha256Digest> {
        self.sha256.as_ref()
    }

    /// Consume the output returning the body
    pub fn into_body(self) -> DownloadReader {
        self.body
    }
}

impl fmt::Debug for GetObjectOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetObjectOutput")
            .field("content_length", &self.content_length)
            .field("sha256", &self.sha256)
            .finish_non_exhaustive()
    }
}
