//! Error types for bufrs.

use std::fmt;

/// Errors that can occur when configuring a pool.
///
/// Buffer I/O (`read_from`, `write_to`) speaks [`std::io::Error`]
/// directly so that source/sink errors propagate verbatim; `get` and
/// `put` never fail. Configuration is the only fallible surface.
#[derive(Debug)]
pub enum PoolError {
    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for PoolError {}
