//! bufrs
//!
//! Recyclable byte buffers for Rust.
//!
//! `bufrs` lets many concurrent producers and consumers of variable-length
//! byte sequences reuse previously allocated memory instead of allocating
//! and discarding on every call. It is designed as a small, composable
//! primitive for:
//!
//! - network request/response assembly
//! - serialization scratch space
//! - log line and record formatting
//! - any hot path that builds short-lived byte sequences
//!
//! The crate intentionally:
//! - does NOT implement a general-purpose allocator
//! - does NOT manage fixed-size slabs
//! - does NOT share memory across processes
//! - does NOT recycle implicitly through a global pool
//!
//! It only does one thing: **get a buffer → fill it → put it back**
//!
//! The pool is self-tuning. Every returned buffer's length is recorded in
//! a logarithmic size histogram, and every N returns the pool recalibrates
//! two thresholds from that histogram: the capacity handed to freshly
//! constructed buffers (so most callers never trigger a grow), and the
//! capacity above which a returned buffer is dropped instead of retained
//! (so one huge request cannot pin memory forever).
//!
//! # Sync
//!
//! ```
//! use bufrs::BufferPool;
//!
//! fn main() -> std::io::Result<()> {
//!     let pool = BufferPool::default();
//!
//!     let mut buf = pool.get();
//!     buf.extend_from_slice(b"hello ");
//!     buf.read_from(&mut &b"world"[..])?;
//!     assert_eq!(buf.as_slice(), b"hello world");
//!
//!     pool.put(buf);
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use bufrs::{read_from_async, BufferPool};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead>(reader: R) -> std::io::Result<()> {
//!     let pool = BufferPool::default();
//!     let mut buf = pool.get();
//!
//!     let appended = read_from_async(reader, &mut buf).await?;
//!     println!("read {appended} bytes");
//!
//!     pool.put(buf);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod error;
mod pool;

#[cfg(feature = "async-io")]
mod async_io;

//
// Public surface (intentionally tiny)
//

pub use buffer::Buffer;
pub use config::PoolConfig;
pub use error::PoolError;
pub use pool::BufferPool;

#[cfg(feature = "async-io")]
pub use async_io::{ReadFrom, WriteTo, read_from_async, write_to_async};
