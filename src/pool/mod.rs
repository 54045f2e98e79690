//! Self-tuning buffer pool.
//!
//! The [`BufferPool`] issues and reclaims [`Buffer`](crate::Buffer)s,
//! records the length of every returned buffer in a logarithmic size
//! histogram, and periodically recalibrates the capacity it hands out by
//! default and the capacity above which returns are discarded.

mod engine;
mod histogram;

pub use engine::BufferPool;
