//! Async buffer I/O.
//!
//! This module provides asynchronous counterparts of
//! [`Buffer::read_from`](crate::Buffer::read_from) and
//! [`Buffer::write_to`](crate::Buffer::write_to) using the
//! `futures-io` traits, making them runtime-agnostic and compatible with
//! tokio, async-std, smol, and other async runtimes.
//!
//! # Example
//!
//! ```ignore
//! use bufrs::{read_from_async, write_to_async, BufferPool};
//! use futures_io::{AsyncRead, AsyncWrite};
//!
//! async fn pipe<R, W>(reader: R, writer: W) -> std::io::Result<u64>
//! where
//!     R: AsyncRead,
//!     W: AsyncWrite,
//! {
//!     let pool = BufferPool::default();
//!     let mut buf = pool.get();
//!
//!     read_from_async(reader, &mut buf).await?;
//!     let written = write_to_async(&buf, writer).await?;
//!
//!     pool.put(buf);
//!     Ok(written)
//! }
//! ```
//!
//! # Runtime Compatibility
//!
//! For tokio users, `tokio_util::compat` converts `tokio::io::AsyncRead`
//! to `futures_io::AsyncRead`:
//!
//! ```ignore
//! use tokio_util::compat::TokioAsyncReadCompatExt;
//! use bufrs::read_from_async;
//!
//! let file = tokio::fs::File::open("data.bin").await?;
//! let appended = read_from_async(file.compat(), &mut buf).await?;
//! ```

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_io::{AsyncRead, AsyncWrite};
use pin_project_lite::pin_project;

use crate::buffer::Buffer;

pin_project! {
    /// Future returned by [`read_from_async`].
    ///
    /// Resolves to the number of newly appended bytes once the reader
    /// signals end-of-data, with the same growth and error semantics as
    /// [`Buffer::read_from`](crate::Buffer::read_from).
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct ReadFrom<'a, R> {
        #[pin]
        reader: R,
        buffer: &'a mut Buffer,
        appended: u64,
    }
}

impl<R: AsyncRead> Future for ReadFrom<'_, R> {
    type Output = io::Result<u64>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        // The buffer's length is logical at every entry and every exit of
        // this function; only the fill position advances in between. A
        // suspended or dropped future therefore never leaves inflated
        // storage behind.
        let mut pos = this.buffer.len();

        loop {
            let region = this.buffer.fill_region(pos);

            match this.reader.as_mut().poll_read(cx, region) {
                Poll::Pending => {
                    this.buffer.set_filled(pos);
                    return Poll::Pending;
                }
                Poll::Ready(Ok(0)) => {
                    this.buffer.set_filled(pos);
                    return Poll::Ready(Ok(*this.appended));
                }
                Poll::Ready(Ok(n)) => {
                    pos += n;
                    *this.appended += n as u64;
                }
                Poll::Ready(Err(e)) if e.kind() == io::ErrorKind::Interrupted => {}
                Poll::Ready(Err(e)) => {
                    this.buffer.set_filled(pos);
                    return Poll::Ready(Err(e));
                }
            }
        }
    }
}

pin_project! {
    /// Future returned by [`write_to_async`].
    ///
    /// Resolves to the number of bytes written, which is always the
    /// buffer's logical length on success.
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct WriteTo<'a, W> {
        #[pin]
        writer: W,
        buffer: &'a Buffer,
        written: usize,
    }
}

impl<W: AsyncWrite> Future for WriteTo<'_, W> {
    type Output = io::Result<u64>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            let remaining = &this.buffer.as_slice()[*this.written..];
            if remaining.is_empty() {
                return Poll::Ready(Ok(*this.written as u64));
            }

            let n = ready!(this.writer.as_mut().poll_write(cx, remaining))?;
            if n == 0 {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "sink accepted no bytes",
                )));
            }
            *this.written += n;
        }
    }
}

/// Appends bytes from an async reader until end-of-data or an error.
///
/// This is the async counterpart of
/// [`Buffer::read_from`](crate::Buffer::read_from): growth bootstraps a
/// zero-capacity buffer to 64 bytes and doubles whenever the write
/// position reaches capacity, end-of-data resolves to the count of newly
/// appended bytes, and partially read bytes stay in the buffer when the
/// reader fails.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O.
///
/// # Example
///
/// ```ignore
/// use bufrs::{read_from_async, Buffer};
///
/// let mut buf = Buffer::new();
/// let appended = read_from_async(&b"streamed bytes"[..], &mut buf).await?;
/// assert_eq!(appended, 14);
/// ```
pub fn read_from_async<R: AsyncRead>(reader: R, buffer: &mut Buffer) -> ReadFrom<'_, R> {
    ReadFrom {
        reader,
        buffer,
        appended: 0,
    }
}

/// Writes the buffer's full logical content to an async writer.
///
/// The async counterpart of
/// [`Buffer::write_to`](crate::Buffer::write_to): the buffer is not
/// mutated, short writes are continued until the content is fully
/// written, and sink errors are propagated verbatim. A sink that accepts
/// zero bytes surfaces as [`io::ErrorKind::WriteZero`].
///
/// # Example
///
/// ```ignore
/// use bufrs::{write_to_async, Buffer};
///
/// let mut buf = Buffer::new();
/// buf.extend_from_slice(b"payload");
///
/// let mut sink = futures_util::io::Cursor::new(Vec::new());
/// let written = write_to_async(&buf, &mut sink).await?;
/// assert_eq!(written, 7);
/// ```
pub fn write_to_async<W: AsyncWrite>(buffer: &Buffer, writer: W) -> WriteTo<'_, W> {
    WriteTo {
        writer,
        buffer,
        written: 0,
    }
}
