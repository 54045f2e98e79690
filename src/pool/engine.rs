//! Core pool engine - checkout, return, and calibration.
//!
//! This module implements the self-tuning recycling policy:
//!
//! - [`BufferPool::get`] - Hand out an idle buffer or construct one at
//!   the current default size
//! - [`BufferPool::put`] - Record the returned length, maybe calibrate,
//!   and retain or discard the buffer
//! - Calibration - Recompute `default_size`/`max_size` from the size
//!   histogram, one winner at a time
//!
//! # Example
//!
//! ```
//! use bufrs::{BufferPool, PoolConfig};
//!
//! let pool = BufferPool::new(PoolConfig::default())?;
//!
//! let mut buf = pool.get();
//! buf.extend_from_slice(b"request body");
//! pool.put(buf);
//! # Ok::<(), bufrs::PoolError>(())
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use crossbeam_queue::SegQueue;

use super::histogram::{SizeHistogram, bucket_size};
use crate::buffer::Buffer;
use crate::config::PoolConfig;
use crate::error::PoolError;

/// A recycler of [`Buffer`]s with a self-tuning size policy.
///
/// `get` hands out an idle buffer from the internal cache, or constructs
/// one sized at the current *default size* when the cache is empty. `put`
/// records the buffer's final length in a logarithmic histogram and
/// retains the buffer only if its capacity does not exceed the current
/// *max size*. Every `calibrate_threshold` returns, one caller
/// recalibrates both thresholds from the histogram:
///
/// - `default_size` becomes the smallest bucket boundary covering the
///   configured default percentile of returned lengths, so most callers
///   get a buffer large enough on the first allocation
/// - `max_size` becomes the boundary covering the max percentile, so
///   buffers serving rare oversized requests are not retained forever
///
/// # Thread Safety
///
/// All operations are non-blocking and safe to call from any number of
/// threads. Calibration is mutually excluded via an atomic flag, never a
/// lock: concurrent returners keep completing their histogram increment
/// and cache push while a pass runs, and may briefly observe stale
/// thresholds.
///
/// # Example
///
/// ```
/// use bufrs::BufferPool;
///
/// let pool = BufferPool::default();
///
/// let mut buf = pool.get();
/// buf.extend_from_slice(b"hello");
/// pool.put(buf);
///
/// // The allocation is reused by the next checkout
/// let buf = pool.get();
/// assert!(buf.is_empty());
/// ```
pub struct BufferPool {
    config: PoolConfig,

    /// Idle buffers awaiting reuse.
    idle: SegQueue<Buffer>,

    /// Lengths of buffers returned since the last calibration.
    histogram: SizeHistogram,

    /// Returns since the histogram was last consumed.
    returns_since_calibration: AtomicU64,

    /// Single-writer gate: set while one calibration pass runs.
    calibrating: AtomicBool,

    /// Capacity given to freshly constructed buffers.
    default_size: AtomicUsize,

    /// Capacity above which a returned buffer is discarded.
    max_size: AtomicUsize,
}

impl BufferPool {
    /// Creates a pool with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the configuration fails
    /// [`PoolConfig::validate`].
    ///
    /// # Example
    ///
    /// ```
    /// use bufrs::{BufferPool, PoolConfig};
    ///
    /// let config = PoolConfig::default().with_calibrate_threshold(1000);
    /// let pool = BufferPool::new(config)?;
    /// # Ok::<(), bufrs::PoolError>(())
    /// ```
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: PoolConfig) -> Self {
        // Until the first calibration, retain everything up to the top
        // bucket boundary; an initial_size past that boundary raises the
        // cutoff so fresh buffers are never discarded on their own return.
        let top = bucket_size(config.steps() - 1).max(config.initial_size());

        Self {
            idle: SegQueue::new(),
            histogram: SizeHistogram::new(config.steps()),
            returns_since_calibration: AtomicU64::new(0),
            calibrating: AtomicBool::new(false),
            default_size: AtomicUsize::new(config.initial_size()),
            max_size: AtomicUsize::new(top),
            config,
        }
    }

    /// Checks a buffer out of the pool.
    ///
    /// Takes an idle buffer if one is cached, otherwise constructs a new
    /// one with capacity [`default_size`](Self::default_size). Never
    /// fails. The buffer is always logically empty.
    ///
    /// # Example
    ///
    /// ```
    /// use bufrs::BufferPool;
    ///
    /// let pool = BufferPool::default();
    /// let buf = pool.get();
    /// assert!(buf.is_empty());
    /// assert!(buf.capacity() >= 64);
    /// ```
    pub fn get(&self) -> Buffer {
        match self.idle.pop() {
            Some(buffer) => buffer,
            None => Buffer::with_capacity(self.default_size.load(Ordering::Relaxed)),
        }
    }

    /// Returns a buffer to the pool.
    ///
    /// The buffer's logical length is recorded in the size histogram; if
    /// this return crosses the calibration threshold, one caller runs a
    /// calibration pass. The buffer is then reset and cached for reuse,
    /// unless its capacity exceeds [`max_size`](Self::max_size), in which
    /// case it is dropped to bound retained memory.
    ///
    /// # Example
    ///
    /// ```
    /// use bufrs::BufferPool;
    ///
    /// let pool = BufferPool::default();
    /// let mut buf = pool.get();
    /// buf.extend_from_slice(b"short-lived");
    /// pool.put(buf);
    /// ```
    pub fn put(&self, mut buffer: Buffer) {
        self.histogram.record(buffer.len());

        let returns = self.returns_since_calibration.fetch_add(1, Ordering::Relaxed) + 1;
        if returns >= self.config.calibrate_threshold() {
            self.calibrate();
        }

        if buffer.capacity() <= self.max_size.load(Ordering::Relaxed) {
            buffer.reset();
            self.idle.push(buffer);
        }
    }

    /// Returns the capacity currently given to freshly constructed buffers.
    ///
    /// Eventually consistent: callers racing a calibration pass may
    /// observe the previous value.
    pub fn default_size(&self) -> usize {
        self.default_size.load(Ordering::Relaxed)
    }

    /// Returns the capacity above which returned buffers are discarded.
    ///
    /// Eventually consistent, like [`default_size`](Self::default_size).
    pub fn max_size(&self) -> usize {
        self.max_size.load(Ordering::Relaxed)
    }

    /// Returns the configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Recomputes `default_size`/`max_size` from the histogram.
    ///
    /// Exactly one concurrent caller wins the gate; losers return
    /// immediately and proceed with their cache return. An empty
    /// histogram leaves both thresholds unchanged.
    fn calibrate(&self) {
        if self
            .calibrating
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return;
        }

        self.returns_since_calibration.store(0, Ordering::Relaxed);

        let counts = self.histogram.drain();
        let total: u64 = counts.iter().sum();

        if total > 0 {
            let default_target = percentile_target(total, self.config.default_percentile());
            let max_target = percentile_target(total, self.config.max_percentile());

            let mut cumulative = 0u64;
            let mut new_default = bucket_size(counts.len() - 1);
            let mut new_max = bucket_size(counts.len() - 1);

            let mut default_found = false;
            for (index, &count) in counts.iter().enumerate() {
                cumulative += count;
                if !default_found && cumulative >= default_target {
                    new_default = bucket_size(index);
                    default_found = true;
                }
                if cumulative >= max_target {
                    new_max = bucket_size(index);
                    break;
                }
            }

            // default_size <= max_size must hold after every pass
            let new_max = new_max.max(new_default);

            self.default_size.store(new_default, Ordering::Relaxed);
            self.max_size.store(new_max, Ordering::Relaxed);
        }

        self.calibrating.store(false, Ordering::Release);
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::from_validated(PoolConfig::default())
    }
}

/// Smallest cumulative count that covers `percentile` of `total` returns.
fn percentile_target(total: u64, percentile: f64) -> u64 {
    (((total as f64) * percentile).ceil() as u64).max(1)
}
