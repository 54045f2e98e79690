//! Configuration for pool behavior.
//!
//! This module provides [`PoolConfig`], which controls how a
//! [`BufferPool`](crate::BufferPool) sizes fresh buffers and how it
//! recalibrates that sizing from observed usage.
//!
//! # Example
//!
//! ```
//! use bufrs::PoolConfig;
//!
//! // Recalibrate every 1000 returns, cover 99% of sizes when retaining
//! let config = PoolConfig::default()
//!     .with_calibrate_threshold(1000)
//!     .with_max_percentile(0.99);
//!
//! config.validate()?;
//! # Ok::<(), bufrs::PoolError>(())
//! ```

use crate::error::PoolError;

/// Default capacity for freshly constructed buffers (64 bytes).
///
/// This is also the bootstrap capacity a zero-capacity buffer grows to on
/// its first read.
pub const DEFAULT_INITIAL_SIZE: usize = 64;

/// Default number of logarithmic histogram buckets.
pub const DEFAULT_STEPS: usize = 20;

/// Maximum number of histogram buckets.
///
/// Bucket `i` covers sizes up to `64 << i`, so 32 buckets already span
/// past 128 GiB.
pub const MAX_STEPS: usize = 32;

/// Default number of returns between calibration passes.
pub const DEFAULT_CALIBRATE_THRESHOLD: u64 = 42_000;

/// Default percentile used to pick the checkout size (the majority).
pub const DEFAULT_SIZE_PERCENTILE: f64 = 0.5;

/// Default percentile used to pick the retention cutoff.
pub const DEFAULT_MAX_PERCENTILE: f64 = 0.95;

/// Configuration for the self-tuning recycling policy.
///
/// `PoolConfig` controls the starting buffer capacity, the shape of the
/// size histogram, and when and how calibration recomputes the pool's
/// `default_size`/`max_size` pair:
///
/// - `initial_size` - Capacity of fresh buffers before the first calibration
/// - `steps` - Number of logarithmic histogram buckets
/// - `calibrate_threshold` - Returns between calibration passes
/// - `default_percentile` - Fraction of returns the checkout size must cover
/// - `max_percentile` - Fraction of returns the retention cutoff must cover
///
/// # Constraints
///
/// - `initial_size`, `steps`, and `calibrate_threshold` must be non-zero
/// - `steps` must not exceed [`MAX_STEPS`]
/// - Percentiles must lie in `(0.0, 1.0]` with
///   `default_percentile <= max_percentile`
///
/// # Example
///
/// ```
/// use bufrs::PoolConfig;
///
/// // Use default configuration
/// let config = PoolConfig::default();
///
/// // Custom configuration, validated up front
/// let config = PoolConfig::new(4096, 16, 1000)?;
///
/// // Builder pattern
/// let config = PoolConfig::default()
///     .with_default_percentile(0.6)
///     .with_max_percentile(0.99);
/// # Ok::<(), bufrs::PoolError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolConfig {
    /// Capacity of freshly constructed buffers before the first calibration.
    initial_size: usize,

    /// Number of logarithmic histogram buckets.
    steps: usize,

    /// Number of returns between calibration passes.
    calibrate_threshold: u64,

    /// Percentile of returned sizes the checkout size must cover.
    default_percentile: f64,

    /// Percentile of returned sizes the retention cutoff must cover.
    max_percentile: f64,
}

impl PoolConfig {
    /// Creates a new configuration with the specified sizing parameters.
    ///
    /// Percentiles are left at their defaults (0.5 and 0.95); use
    /// [`with_default_percentile`](Self::with_default_percentile) and
    /// [`with_max_percentile`](Self::with_max_percentile) to change them.
    ///
    /// # Arguments
    ///
    /// * `initial_size` - Capacity of fresh buffers in bytes
    /// * `steps` - Number of histogram buckets (1 to [`MAX_STEPS`])
    /// * `calibrate_threshold` - Returns between calibration passes
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if any parameter is zero or
    /// `steps` exceeds [`MAX_STEPS`].
    ///
    /// # Example
    ///
    /// ```
    /// use bufrs::PoolConfig;
    ///
    /// let config = PoolConfig::new(64, 20, 1000)?;
    /// assert_eq!(config.initial_size(), 64);
    /// # Ok::<(), bufrs::PoolError>(())
    /// ```
    pub fn new(
        initial_size: usize,
        steps: usize,
        calibrate_threshold: u64,
    ) -> Result<Self, PoolError> {
        let config = Self {
            initial_size,
            steps,
            calibrate_threshold,
            default_percentile: DEFAULT_SIZE_PERCENTILE,
            max_percentile: DEFAULT_MAX_PERCENTILE,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the capacity of freshly constructed buffers.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`PoolConfig::validate`] to check if the configuration is valid.
    pub fn with_initial_size(mut self, size: usize) -> Self {
        self.initial_size = size;
        self
    }

    /// Sets the number of histogram buckets.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`PoolConfig::validate`] to check if the configuration is valid.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the number of returns between calibration passes.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`PoolConfig::validate`] to check if the configuration is valid.
    ///
    /// # Example
    ///
    /// ```
    /// use bufrs::PoolConfig;
    ///
    /// let config = PoolConfig::default().with_calibrate_threshold(1000);
    /// assert_eq!(config.calibrate_threshold(), 1000);
    /// ```
    pub fn with_calibrate_threshold(mut self, threshold: u64) -> Self {
        self.calibrate_threshold = threshold;
        self
    }

    /// Sets the percentile used to pick the checkout size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`PoolConfig::validate`] to check if the configuration is valid.
    pub fn with_default_percentile(mut self, percentile: f64) -> Self {
        self.default_percentile = percentile;
        self
    }

    /// Sets the percentile used to pick the retention cutoff.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`PoolConfig::validate`] to check if the configuration is valid.
    pub fn with_max_percentile(mut self, percentile: f64) -> Self {
        self.max_percentile = percentile;
        self
    }

    /// Returns the capacity given to freshly constructed buffers.
    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    /// Returns the number of histogram buckets.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the number of returns between calibration passes.
    pub fn calibrate_threshold(&self) -> u64 {
        self.calibrate_threshold
    }

    /// Returns the percentile used to pick the checkout size.
    pub fn default_percentile(&self) -> f64 {
        self.default_percentile
    }

    /// Returns the percentile used to pick the retention cutoff.
    pub fn max_percentile(&self) -> f64 {
        self.max_percentile
    }

    /// Validates the current configuration.
    ///
    /// Returns an error if the configuration is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use bufrs::PoolConfig;
    ///
    /// let config = PoolConfig::default().with_steps(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.initial_size == 0 {
            return Err(PoolError::InvalidConfig {
                message: "initial_size must be non-zero",
            });
        }

        if self.steps == 0 {
            return Err(PoolError::InvalidConfig {
                message: "steps must be non-zero",
            });
        }

        if self.steps > MAX_STEPS {
            return Err(PoolError::InvalidConfig {
                message: "steps exceeds the maximum bucket count",
            });
        }

        if self.calibrate_threshold == 0 {
            return Err(PoolError::InvalidConfig {
                message: "calibrate_threshold must be non-zero",
            });
        }

        if !(self.default_percentile > 0.0 && self.default_percentile <= 1.0) {
            return Err(PoolError::InvalidConfig {
                message: "default_percentile must lie in (0.0, 1.0]",
            });
        }

        if !(self.max_percentile > 0.0 && self.max_percentile <= 1.0) {
            return Err(PoolError::InvalidConfig {
                message: "max_percentile must lie in (0.0, 1.0]",
            });
        }

        if self.default_percentile > self.max_percentile {
            return Err(PoolError::InvalidConfig {
                message: "default_percentile cannot be greater than max_percentile",
            });
        }

        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_INITIAL_SIZE,
            steps: DEFAULT_STEPS,
            calibrate_threshold: DEFAULT_CALIBRATE_THRESHOLD,
            default_percentile: DEFAULT_SIZE_PERCENTILE,
            max_percentile: DEFAULT_MAX_PERCENTILE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.initial_size(), DEFAULT_INITIAL_SIZE);
        assert_eq!(config.steps(), DEFAULT_STEPS);
        assert_eq!(config.calibrate_threshold(), DEFAULT_CALIBRATE_THRESHOLD);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PoolConfig::default()
            .with_initial_size(4096)
            .with_steps(16)
            .with_calibrate_threshold(1000)
            .with_default_percentile(0.6)
            .with_max_percentile(0.99);

        assert_eq!(config.initial_size(), 4096);
        assert_eq!(config.steps(), 16);
        assert_eq!(config.calibrate_threshold(), 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_zero_fields() {
        assert!(PoolConfig::new(0, 20, 1000).is_err());
        assert!(PoolConfig::new(64, 0, 1000).is_err());
        assert!(PoolConfig::new(64, 20, 0).is_err());
    }

    #[test]
    fn test_invalid_config_too_many_steps() {
        let result = PoolConfig::new(64, MAX_STEPS + 1, 1000);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_config_percentiles() {
        let config = PoolConfig::default().with_default_percentile(0.0);
        assert!(config.validate().is_err());

        let config = PoolConfig::default().with_max_percentile(1.5);
        assert!(config.validate().is_err());

        let config = PoolConfig::default()
            .with_default_percentile(0.99)
            .with_max_percentile(0.5);
        assert!(config.validate().is_err());
    }
}
