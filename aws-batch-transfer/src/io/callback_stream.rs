/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use pin_project_lite::pin_project;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

pin_project! {
    /// Pass-through wrapper over a byte stream that reports every successful read or write.
    ///
    /// The callback receives the exact number of bytes moved by each underlying
    /// `poll_read`/`poll_write` call that completes successfully (including zero-length
    /// reads at EOF). Errors, flushes and shutdowns are forwarded untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use aws_batch_transfer::io::CallbackStream;
    /// use tokio::io::AsyncReadExt;
    ///
    /// # async fn example() -> std::io::Result<()> {
    /// let mut seen = 0;
    /// let mut stream = CallbackStream::new(&b"hello world"[..], |n| seen += n);
    /// let mut out = Vec::new();
    /// stream.read_to_end(&mut out).await?;
    /// drop(stream);
    /// assert_eq!(11, seen);
    /// # Ok(())
    /// # }
    /// ```
    #[derive(Debug)]
    pub struct CallbackStream<S, F> {
        #[pin]
        inner: S,
        callback: F,
    }
}

impl<S, F> CallbackStream<S, F>
where
    F: FnMut(u64),
{
    /// Wrap `inner`, invoking `callback` with the byte count of every I/O call
    pub fn new(inner: S, callback: F) -> Self {
        Self { inner, callback }
    }
}

impl<S, F> CallbackStream<S, F> {
    /// Borrow the inner stream
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwrap the inner stream
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, F> AsyncRead for CallbackStream<S, F>
where
    S: AsyncRead,
    F: FnMut(u64),
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.project();
        let before = buf.filled().len();
        ready!(this.inner.poll_read(cx, buf))?;
        let n = buf.filled().len() - before;
        (this.callback)(n as u64);
        Poll::Ready(Ok(()))
    }
}

impl<S, F> AsyncWrite for CallbackStream<S, F>
where
    S: AsyncWrite,
    F: FnMut(u64),
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.project();
        let n = ready!(this.inner.poll_write(cx, buf))?;
        (this.callback)(n as u64);
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.project().inner.poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.project().inner.poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio_test::io::Builder;

    use super::CallbackStream;

    fn recorder() -> (Arc<Mutex<Vec<u64>>>, impl FnMut(u64)) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let cb = {
            let calls = calls.clone();
            move |n| calls.lock().unwrap().push(n)
        };
        (calls, cb)
    }

    #[tokio::test]
    async fn test_read_reports_each_call() {
        let mock = Builder::new()
            .read(b"hello")
            .read(b" ")
            .read(b"world")
            .build();
        let (calls, cb) = recorder();
        let mut stream = CallbackStream::new(mock, cb);

        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();

        assert_eq!(b"hello world", out.as_slice());
        // trailing zero is the EOF read
        assert_eq!(vec![5, 1, 5, 0], *calls.lock().unwrap());
    }

    #[tokio::test]
    async fn test_read_error_forwarded() {
        let mock = Builder::new()
            .read(b"partial")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let (calls, cb) = recorder();
        let mut stream = CallbackStream::new(mock, cb);

        let mut out = Vec::new();
        let err = stream.read_to_end(&mut out).await.unwrap_err();

        assert_eq!(io::ErrorKind::ConnectionReset, err.kind());
        assert_eq!(vec![7], *calls.lock().unwrap());
    }

    #[tokio::test]
    async fn test_write_reports_each_call() {
        let mock = Builder::new().write(b"abc").write(b"defg").build();
        let (calls, cb) = recorder();
        let mut stream = CallbackStream::new(mock, cb);

        stream.write_all(b"abc").await.unwrap();
        stream.write_all(b"defg").await.unwrap();
        stream.flush().await.unwrap();

        assert_eq!(vec![3, 4], *calls.lock().unwrap());
    }

    #[tokio::test]
    async fn test_into_inner() {
        let stream = CallbackStream::new(&b"data"[..], |_| {});
        assert_eq!(b"data", stream.get_ref());
        assert_eq!(b"data", stream.into_inner());
    }
}
