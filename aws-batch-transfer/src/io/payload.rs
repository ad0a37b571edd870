/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::cmp;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, ReadBuf};

use crate::checksum::{Sha256Digest, Sha256Hasher};
use crate::error;

/// Deterministic synthetic data.
///
/// A single power-of-two block is filled from a PRNG seeded with `seed` and then replicated
/// until `len` bytes have been produced. Only the block is held in memory, the full payload
/// is produced on demand by [`chunks`](Payload::chunks) or [`reader`](Payload::reader).
///
/// The same `(seed, block_size, len)` always produces byte-identical output.
#[derive(Debug, Clone)]
pub struct Payload {
    seed: u64,
    block: Bytes,
    len: u64,
}

impl Payload {
    /// Generate a payload of `len` bytes from `seed` using blocks of `block_size` bytes.
    ///
    /// `block_size` must be a non-zero power of two.
    pub fn generate(seed: u64, block_size: usize, len: u64) -> Result<Payload, error::Error> {
        if !block_size.is_power_of_two() {
            return Err(error::invalid_input(format!(
                "payload block size must be a non-zero power of two, got {block_size}"
            )));
        }

        let mut rng = fastrand::Rng::with_seed(seed);
        let mut block = vec![0u8; block_size];
        rng.fill(&mut block);

        Ok(Payload {
            seed,
            block: Bytes::from(block),
            len,
        })
    }

    /// Total payload length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if the payload has no content
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The seed used to generate this payload
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Size of the replicated block
    pub fn block_size(&self) -> usize {
        self.block.len()
    }

    /// Iterate over the payload one block at a time. The final chunk may be shorter.
    pub fn chunks(&self) -> Chunks {
        Chunks {
            block: self.block.clone(),
            remaining: self.len,
        }
    }

    /// Returns an [`AsyncRead`] over the full payload
    pub fn reader(&self) -> PayloadReader {
        PayloadReader {
            block: self.block.clone(),
            offset: 0,
            remaining: self.len,
        }
    }

    /// Compute the SHA-256 digest of the full payload
    pub fn sha256(&self) -> Sha256Digest {
        let mut hasher = Sha256Hasher::new();
        for chunk in self.chunks() {
            hasher.update(&chunk);
        }
        hasher.finalize()
    }

    /// Materialize the full payload in memory.
    ///
    /// Fails if the payload does not fit in the address space.
    pub fn to_bytes(&self) -> Result<Bytes, error::Error> {
        let len = usize::try_from(self.len).map_err(|_| {
            error::invalid_input(format!("payload of {} bytes does not fit in memory", self.len))
        })?;
        let mut out = BytesMut::with_capacity(len);
        for chunk in self.chunks() {
            out.extend_from_slice(&chunk);
        }
        Ok(out.freeze())
    }
}

/// Iterator over the chunks of a [`Payload`]
#[derive(Debug)]
pub struct Chunks {
    block: Bytes,
    remaining: u64,
}

impl Iterator for Chunks {
    type Item = Bytes;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let n = cmp::min(self.block.len() as u64, self.remaining) as usize;
        self.remaining -= n as u64;
        Some(self.block.slice(..n))
    }
}

/// [`AsyncRead`] implementation yielding the bytes of a [`Payload`]
#[derive(Debug)]
pub struct PayloadReader {
    block: Bytes,
    offset: usize,
    remaining: u64,
}

impl PayloadReader {
    /// Bytes left to read
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl AsyncRead for PayloadReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = &mut *self;
        if this.remaining == 0 || this.block.is_empty() {
            return Poll::Ready(Ok(()));
        }

        let available = cmp::min((this.block.len() - this.offset) as u64, this.remaining) as usize;
        let n = cmp::min(available, buf.remaining());
        buf.put_slice(&this.block[this.offset..this.offset + n]);

        this.offset = (this.offset + n) % this.block.len();
        this.remaining -= n as u64;
        Poll::Ready(Ok(()))
    }
}
