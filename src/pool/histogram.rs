//! Logarithmic size histogram backing calibration.
//!
//! Bucket `i` covers logical lengths up to `64 << i`; the topmost bucket
//! catches everything beyond the largest configured boundary. Counters
//! are plain atomics: returners increment concurrently, and the single
//! calibration winner drains them with a swap-to-zero pass.

use std::sync::atomic::{AtomicU64, Ordering};

/// Smallest bucket boundary as a power of two (2^6 = 64 bytes).
pub(crate) const MIN_BIT_SIZE: u32 = 6;

/// Returns the size in bytes covered by bucket `index`.
pub(crate) fn bucket_size(index: usize) -> usize {
    (1usize << MIN_BIT_SIZE) << index
}

/// Counters of returned-buffer lengths, one per logarithmic size bucket.
pub(crate) struct SizeHistogram {
    counts: Box<[AtomicU64]>,
}

impl SizeHistogram {
    /// Creates a histogram with `steps` buckets, all zero.
    pub(crate) fn new(steps: usize) -> Self {
        let counts = (0..steps).map(|_| AtomicU64::new(0)).collect();
        Self { counts }
    }

    /// Returns the bucket index covering a length of `len` bytes.
    ///
    /// Lengths of 0..=64 land in bucket 0; each further bucket doubles the
    /// boundary; the topmost bucket is a catch-all.
    pub(crate) fn bucket_index(&self, len: usize) -> usize {
        let mut n = len.saturating_sub(1) >> MIN_BIT_SIZE;
        let mut index = 0;
        while n > 0 {
            n >>= 1;
            index += 1;
        }
        index.min(self.counts.len() - 1)
    }

    /// Counts one returned buffer of `len` bytes.
    pub(crate) fn record(&self, len: usize) {
        let index = self.bucket_index(len);
        self.counts[index].fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshots all buckets and zeroes them.
    ///
    /// Returners may still be incrementing while this runs; an increment
    /// that slips past the swap simply lands in the next epoch.
    pub(crate) fn drain(&self) -> Vec<u64> {
        self.counts
            .iter()
            .map(|count| count.swap(0, Ordering::Relaxed))
            .collect()
    }
}
