// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration errors.
//!
//! Every variant here is produced synchronously, before any RPC request is
//! issued, so callers can validate settings up front.

/// Errors raised while validating batch, multicall or range configuration.
///
/// # Examples
///
/// ```rust
/// use ethopt::{partition_block_range, ConfigError};
///
/// let err = partition_block_range(10, 5, 1000, false).unwrap_err();
/// assert!(matches!(err, ConfigError::InvalidBlockRange { from_block: 10, to_block: 5 }));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The requests-per-second ceiling is zero, negative, NaN or infinite.
    #[error("Requests per second must be a positive finite number, got {rate}")]
    InvalidRate {
        /// The rejected rate
        rate: f64,
    },

    /// A size-like setting that must be at least one was zero.
    ///
    /// Used for batch size, concurrency size, multicall max count and range width.
    #[error("{field} must be at least 1")]
    ZeroSize {
        /// Name of the offending setting
        field: &'static str,
    },

    /// A block range whose start lies after its end.
    #[error("Invalid block range: from_block {from_block} is after to_block {to_block}")]
    InvalidBlockRange {
        /// Requested start block (inclusive)
        from_block: u64,
        /// Requested end block (inclusive)
        to_block: u64,
    },

    /// An index range (used by storage-slot search) whose start lies after its end.
    #[error("Invalid index range: start {start} is after end {end}")]
    InvalidIndexRange {
        /// Requested first index (inclusive)
        start: u64,
        /// Requested last index (inclusive)
        end: u64,
    },
}

impl ConfigError {
    /// Create a `ZeroSize` error for the named setting.
    pub fn zero_size(field: &'static str) -> Self {
        ConfigError::ZeroSize { field }
    }

    /// Create an `InvalidBlockRange` error.
    pub fn invalid_block_range(from_block: u64, to_block: u64) -> Self {
        ConfigError::InvalidBlockRange {
            from_block,
            to_block,
        }
    }
}
