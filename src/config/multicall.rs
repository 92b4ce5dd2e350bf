//! Configuration for the multicall aggregation queue

use std::time::Duration;

use alloy_primitives::Address;

use super::constants::MULTICALL3;
use crate::errors::ConfigError;

/// Settings for one [`MulticallQueue`](crate::MulticallQueue)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticallConfig {
    /// Debounce window opened by the first call into an idle queue
    pub stall_time: Duration,

    /// Maximum number of legs in a single `aggregate3` invocation
    pub max_count: usize,

    /// `allowFailure` flag sent with every leg
    ///
    /// With `false`, a single reverting leg reverts the whole aggregate and
    /// every call of the drain fails.
    pub allow_failure: bool,

    /// Start offset between concurrent chunks of one drain (multiplied by chunk index)
    pub chunk_stagger: Duration,

    /// Aggregator contract address
    pub aggregator: Address,
}

impl Default for MulticallConfig {
    fn default() -> Self {
        Self {
            stall_time: Duration::from_millis(30),
            max_count: 1000,
            allow_failure: true,
            chunk_stagger: Duration::from_millis(10),
            aggregator: MULTICALL3,
        }
    }
}

impl MulticallConfig {
    /// Start a builder from the defaults
    pub fn builder() -> MulticallConfigBuilder {
        MulticallConfigBuilder::default()
    }
}

/// Builder for [`MulticallConfig`]
///
/// # Examples
///
/// ```rust
/// use ethopt::MulticallConfig;
/// use std::time::Duration;
///
/// let config = MulticallConfig::builder()
///     .stall_time(Duration::from_millis(50))
///     .max_count(500)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_count, 500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MulticallConfigBuilder {
    config: MulticallConfig,
}

impl MulticallConfigBuilder {
    /// Set the debounce window
    pub fn stall_time(mut self, stall_time: Duration) -> Self {
        self.config.stall_time = stall_time;
        self
    }

    /// Set the per-invocation leg cap
    pub fn max_count(mut self, max_count: usize) -> Self {
        self.config.max_count = max_count;
        self
    }

    /// Set the per-leg `allowFailure` flag
    pub fn allow_failure(mut self, allow_failure: bool) -> Self {
        self.config.allow_failure = allow_failure;
        self
    }

    /// Set the chunk start offset
    pub fn chunk_stagger(mut self, chunk_stagger: Duration) -> Self {
        self.config.chunk_stagger = chunk_stagger;
        self
    }

    /// Use a Multicall3 deployment at a non-canonical address
    pub fn aggregator(mut self, aggregator: Address) -> Self {
        self.config.aggregator = aggregator;
        self
    }

    /// Validate and build
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroSize`] if `max_count` is zero.
    pub fn build(self) -> Result<MulticallConfig, ConfigError> {
        if self.config.max_count == 0 {
            return Err(ConfigError::zero_size("max_count"));
        }
        Ok(self.config)
    }
}
