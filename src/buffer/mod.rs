//! Recyclable byte buffer.
//!
//! The [`Buffer`] type is an owned, growable byte container with a
//! doubling growth strategy, designed to be checked out of and returned
//! to a [`BufferPool`](crate::BufferPool).

mod byte_buffer;

pub use byte_buffer::Buffer;
