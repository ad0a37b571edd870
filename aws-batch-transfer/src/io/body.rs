/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::cmp;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::{Bytes, BytesMut};
use http_body_1x::{Body, Frame, SizeHint};
use pin_project_lite::pin_project;
use tokio::io::AsyncRead;

pin_project! {
    /// Adapts an [`AsyncRead`] of known length into an HTTP body that yields frames of at
    /// most `frame_size` bytes.
    ///
    /// Reaching EOF before `content_length` bytes have been read is an error.
    #[derive(Debug)]
    pub(crate) struct ReaderBody<R> {
        #[pin]
        inner: R,
        remaining: u64,
        frame_size: usize,
    }
}

impl<R> ReaderBody<R> {
    pub(crate) fn new(inner: R, content_length: u64, frame_size: usize) -> Self {
        Self {
            inner,
            remaining: content_length,
            frame_size: frame_size.max(1),
        }
    }
}

impl<R> Body for ReaderBody<R>
where
    R: AsyncRead,
{
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.project();
        if *this.remaining == 0 {
            return Poll::Ready(None);
        }

        let capacity = cmp::min(*this.frame_size as u64, *this.remaining) as usize;
        let mut buf = BytesMut::with_capacity(capacity);
        let n = ready!(tokio_util::io::poll_read_buf(this.inner, cx, &mut buf))?;
        if n == 0 {
            return Poll::Ready(Some(Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("body ended with {} bytes left to send", this.remaining),
            ))));
        }

        *this.remaining -= cmp::min(n as u64, *this.remaining);
        Poll::Ready(Some(Ok(Frame::data(buf.freeze()))))
    }

    fn is_end_stream(&self) -> bool {
        self.remaining == 0
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.remaining)
    }
}
