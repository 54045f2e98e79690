//! The Buffer type - an owned, growable byte container.

use std::io::{self, Read, Write};

use bytes::Bytes;

/// Bootstrap capacity for a buffer that has none when a read starts.
pub(crate) const MIN_READ_CAPACITY: usize = 64;

/// An owned, growable byte container with a doubling growth strategy.
///
/// A `Buffer` keeps a *logical length* (bytes meaningfully written) that
/// never exceeds its *capacity* (bytes physically allocated). Capacity
/// only grows, never shrinks, until the buffer is dropped. Appends are
/// infallible for in-memory growth; reads from a source double capacity
/// whenever the write position reaches it (amortized O(1)).
///
/// Buffers are usually checked out of a [`BufferPool`](crate::BufferPool)
/// and returned through [`BufferPool::put`](crate::BufferPool::put),
/// which records their final length and recycles the allocation. A
/// standalone `Buffer` works just as well; it is simply never recycled.
///
/// # Example
///
/// ```
/// use bufrs::Buffer;
///
/// let mut buf = Buffer::new();
/// buf.extend_from_slice(b"hello world");
/// assert_eq!(buf.len(), 11);
///
/// buf.reset();
/// assert!(buf.is_empty());
/// // Capacity is preserved across resets
/// assert!(buf.capacity() >= 11);
/// ```
#[derive(Debug, Default)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Creates an empty buffer with no allocated capacity.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an empty buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Returns the logical length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the allocated capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns the logical content as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Appends the given bytes, growing capacity as needed.
    ///
    /// This operation cannot fail: growth is constrained only by available
    /// memory, whose exhaustion aborts rather than returning an error.
    ///
    /// # Example
    ///
    /// ```
    /// use bufrs::Buffer;
    ///
    /// let mut buf = Buffer::new();
    /// buf.extend_from_slice(b"abc");
    /// buf.extend_from_slice(b"");
    /// assert_eq!(buf.as_slice(), b"abc");
    /// ```
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Appends bytes read from `reader` until end-of-data or an error.
    ///
    /// Growth starts from the buffer's existing capacity (or 64 bytes if
    /// it has none) and doubles each time the write position reaches the
    /// current capacity. Data is never truncated: the call only returns
    /// once the source is exhausted or fails.
    ///
    /// On end-of-data, returns the number of *newly appended* bytes, not
    /// counting content already present before the call.
    ///
    /// # Errors
    ///
    /// Source errors are propagated verbatim (`ErrorKind::Interrupted` is
    /// retried, as `Read::read_to_end` does). Bytes read before the error
    /// remain in the buffer and are visible through [`len`](Self::len).
    ///
    /// # Example
    ///
    /// ```
    /// use bufrs::Buffer;
    ///
    /// let mut buf = Buffer::new();
    /// buf.extend_from_slice(b"head:");
    ///
    /// let appended = buf.read_from(&mut &b"body"[..])?;
    /// assert_eq!(appended, 4);
    /// assert_eq!(buf.as_slice(), b"head:body");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> io::Result<u64> {
        let start = self.data.len();
        let mut pos = start;

        loop {
            let region = self.fill_region(pos);

            match reader.read(region) {
                Ok(0) => {
                    self.set_filled(pos);
                    return Ok((pos - start) as u64);
                }
                Ok(n) => pos += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.set_filled(pos);
                    return Err(e);
                }
            }
        }
    }

    /// Writes the full logical content to `writer`.
    ///
    /// Does not mutate the buffer. Returns the number of bytes written,
    /// which is always the logical length on success.
    ///
    /// # Errors
    ///
    /// Sink errors are propagated verbatim.
    ///
    /// # Example
    ///
    /// ```
    /// use bufrs::Buffer;
    ///
    /// let mut buf = Buffer::new();
    /// buf.extend_from_slice(b"payload");
    ///
    /// let mut out = Vec::new();
    /// let written = buf.write_to(&mut out)?;
    /// assert_eq!(written, 7);
    /// assert_eq!(out, b"payload");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<u64> {
        writer.write_all(&self.data)?;
        Ok(self.data.len() as u64)
    }

    /// Sets the logical length to zero without releasing capacity.
    ///
    /// Used by the pool when recycling; also handy for reusing a
    /// standalone buffer across iterations.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Consumes the buffer and returns its content as immutable [`Bytes`].
    ///
    /// This is the exit path for callers that want to keep the data
    /// instead of recycling the allocation; the conversion does not copy.
    ///
    /// # Example
    ///
    /// ```
    /// use bufrs::Buffer;
    ///
    /// let mut buf = Buffer::new();
    /// buf.extend_from_slice(b"keep me");
    /// let bytes = buf.freeze();
    /// assert_eq!(&bytes[..], b"keep me");
    /// ```
    pub fn freeze(self) -> Bytes {
        Bytes::from(self.data)
    }

    /// Returns the writable region starting at `pos`, doubling capacity
    /// first if `pos` has reached it (or bootstrapping to 64 bytes).
    ///
    /// Storage stays extended to full capacity between calls, so only
    /// newly grown bytes are ever zeroed; read loops keep their own fill
    /// position and must restore the logical length with
    /// [`set_filled`](Self::set_filled) before handing the buffer back,
    /// including across suspension points.
    pub(crate) fn fill_region(&mut self, pos: usize) -> &mut [u8] {
        if self.data.capacity() == pos {
            let target = if pos == 0 { MIN_READ_CAPACITY } else { pos * 2 };
            self.data.reserve_exact(target - pos);
        }
        let capacity = self.data.capacity();
        if self.data.len() < capacity {
            self.data.resize(capacity, 0);
        }
        &mut self.data[pos..]
    }

    /// Truncates storage back to the `pos` bytes actually filled.
    pub(crate) fn set_filled(&mut self, pos: usize) {
        self.data.truncate(pos);
    }
}

/// Appending writer. Every write succeeds in full.
impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that yields `payload` and then fails with the given error kind.
    struct FailingReader {
        payload: Vec<u8>,
        pos: usize,
        kind: io::ErrorKind,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos < self.payload.len() {
                let n = buf.len().min(self.payload.len() - self.pos);
                buf[..n].copy_from_slice(&self.payload[self.pos..self.pos + n]);
                self.pos += n;
                Ok(n)
            } else {
                Err(io::Error::new(self.kind, "source failed"))
            }
        }
    }

    #[test]
    fn test_new_is_empty() {
        let buf = Buffer::new();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn test_extend_and_reset() {
        let mut buf = Buffer::new();
        buf.extend_from_slice(b"hello world");
        assert_eq!(buf.len(), 11);

        buf.reset();
        assert!(buf.is_empty());
        // Capacity should be preserved
        assert!(buf.capacity() >= 11);
    }

    #[test]
    fn test_zero_length_append_is_noop() {
        let mut buf = Buffer::new();
        buf.extend_from_slice(b"");
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn test_read_from_bootstraps_empty_buffer() {
        let mut buf = Buffer::new();
        let appended = buf.read_from(&mut &b"abc"[..]).unwrap();

        assert_eq!(appended, 3);
        assert_eq!(buf.as_slice(), b"abc");
        assert!(buf.capacity() >= MIN_READ_CAPACITY);
    }

    #[test]
    fn test_read_from_counts_only_new_bytes() {
        let mut buf = Buffer::new();
        buf.extend_from_slice(b"prefix");

        let appended = buf.read_from(&mut &b"suffix"[..]).unwrap();
        assert_eq!(appended, 6);
        assert_eq!(buf.as_slice(), b"prefixsuffix");
    }

    #[test]
    fn test_read_from_grows_past_initial_capacity() {
        let data = vec![0x5Au8; 10_000];
        let mut buf = Buffer::with_capacity(64);

        let appended = buf.read_from(&mut &data[..]).unwrap();
        assert_eq!(appended, 10_000);
        assert_eq!(buf.as_slice(), &data[..]);
        assert!(buf.capacity() >= 10_000);
    }

    #[test]
    fn test_read_from_error_keeps_partial_bytes() {
        let mut reader = FailingReader {
            payload: vec![0xAB; 30],
            pos: 0,
            kind: io::ErrorKind::ConnectionReset,
        };

        let mut buf = Buffer::new();
        buf.extend_from_slice(b"xy");

        let err = buf.read_from(&mut reader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        // Pre-existing 2 bytes plus the 30 read before the failure
        assert_eq!(buf.len(), 32);
    }

    #[test]
    fn test_write_to_roundtrip() {
        let mut buf = Buffer::new();
        buf.extend_from_slice(b"roundtrip");

        let mut out = Vec::new();
        let written = buf.write_to(&mut out).unwrap();

        assert_eq!(written, 9);
        assert_eq!(out, b"roundtrip");
        // write_to must not mutate the buffer
        assert_eq!(buf.as_slice(), b"roundtrip");
    }

    #[test]
    fn test_io_write_impl() {
        let mut buf = Buffer::new();
        let n = Write::write(&mut buf, b"via trait").unwrap();
        assert_eq!(n, 9);
        assert_eq!(buf.as_slice(), b"via trait");
        Write::flush(&mut buf).unwrap();
    }

    #[test]
    fn test_read_from_small_chunks_into_large_capacity() {
        /// Reader that hands out one byte per call.
        struct OneByteReader {
            data: Vec<u8>,
            pos: usize,
        }

        impl Read for OneByteReader {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.pos == self.data.len() || buf.is_empty() {
                    return Ok(0);
                }
                buf[0] = self.data[self.pos];
                self.pos += 1;
                Ok(1)
            }
        }

        let data: Vec<u8> = (0..10_000).map(|i| (i % 253) as u8).collect();
        let mut reader = OneByteReader {
            data: data.clone(),
            pos: 0,
        };

        // Plenty of spare capacity up front; the byte-at-a-time source
        // must not disturb the logical length or the content.
        let mut buf = Buffer::with_capacity(16 * 1024);
        let appended = buf.read_from(&mut reader).unwrap();

        assert_eq!(appended, 10_000);
        assert_eq!(buf.len(), 10_000);
        assert_eq!(buf.as_slice(), &data[..]);
    }

    #[test]
    fn test_capacity_monotone_until_reset() {
        let mut buf = Buffer::new();
        let mut last_capacity = 0;

        for _ in 0..10 {
            buf.read_from(&mut &[0u8; 500][..]).unwrap();
            assert!(buf.capacity() >= last_capacity);
            last_capacity = buf.capacity();
        }

        buf.reset();
        assert_eq!(buf.capacity(), last_capacity);
    }

    #[test]
    fn test_freeze() {
        let mut buf = Buffer::new();
        buf.extend_from_slice(b"frozen");
        let bytes = buf.freeze();
        assert_eq!(&bytes[..], b"frozen");
    }
}
