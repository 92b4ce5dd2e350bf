//! Configuration for ethopt operations
//!
//! This module provides a flexible configuration system for controlling
//! batch pacing, paginated log ranges and multicall aggregation.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use ethopt::EthoptConfig;
//!
//! // Two parallel sub-batches of five, one chunk per second, 1000-block log ranges
//! let config = EthoptConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use ethopt::EthoptConfigBuilder;
//! use alloy_chains::NamedChain;
//!
//! let config = EthoptConfigBuilder::with_defaults()
//!     .events_range(5000)
//!     .chain_rate_limit(NamedChain::Arbitrum, 25.0, 10)
//!     .unwrap()
//!     .build();
//! ```

use std::collections::HashMap;
use std::time::Duration;

use alloy_chains::NamedChain;

use crate::config_types::MaxBlockRange;
use crate::errors::ConfigError;

mod batch;
pub mod constants;
mod multicall;

pub use batch::{BatchConfig, BatchConfigBuilder};
pub use multicall::{MulticallConfig, MulticallConfigBuilder};

/// Configuration for ethopt operations
///
/// Holds global defaults plus per-chain overrides. Use [`EthoptConfigBuilder`]
/// for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct EthoptConfig {
    /// Scheduler pacing used by the batch retrieval helpers
    pub batch: BatchConfig,

    /// Width of one `eth_getLogs` partition
    /// Default: 1000 blocks
    pub events_range: MaxBlockRange,

    /// Multicall queue settings
    pub multicall: MulticallConfig,

    /// Timeout for RPC requests
    /// Default: 30 seconds
    pub rpc_timeout: Duration,

    /// Chain-specific overrides
    pub chain_overrides: HashMap<NamedChain, ChainConfig>,
}

/// Chain-specific configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    /// Override scheduler pacing for this chain
    pub batch: Option<BatchConfig>,

    /// Override the log partition width for this chain
    pub events_range: Option<MaxBlockRange>,
}

impl Default for EthoptConfig {
    fn default() -> Self {
        Self::with_common_defaults()
    }
}

impl EthoptConfig {
    /// Create config with defaults suited to public RPC endpoints
    ///
    /// Base and Sonic endpoints tend to enforce stricter rate limits, so they
    /// get a four-requests-per-second pacing override.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ethopt::EthoptConfig;
    /// use alloy_chains::NamedChain;
    ///
    /// let config = EthoptConfig::with_common_defaults();
    /// assert_eq!(config.get_batch_config(NamedChain::Base).chunk_size(), 4);
    /// assert_eq!(config.get_batch_config(NamedChain::Mainnet).chunk_size(), 10);
    /// ```
    pub fn with_common_defaults() -> Self {
        let mut config = Self::minimal();

        let strict = BatchConfig {
            concurrency_size: 1,
            batch_size: 4,
            ..BatchConfig::default()
        };
        for chain in [NamedChain::Base, NamedChain::Sonic] {
            config.set_chain_override(
                chain,
                ChainConfig {
                    batch: Some(strict.clone()),
                    events_range: None,
                },
            );
        }

        config
    }

    /// Create config without chain overrides
    pub fn minimal() -> Self {
        Self {
            batch: BatchConfig::default(),
            events_range: MaxBlockRange::DEFAULT,
            multicall: MulticallConfig::default(),
            rpc_timeout: Duration::from_secs(30),
            chain_overrides: HashMap::new(),
        }
    }

    /// Get effective scheduler pacing for a specific chain
    ///
    /// Returns chain-specific override if set, otherwise returns global default.
    pub fn get_batch_config(&self, chain: NamedChain) -> BatchConfig {
        self.chain_overrides
            .get(&chain)
            .and_then(|c| c.batch.clone())
            .unwrap_or_else(|| self.batch.clone())
    }

    /// Get effective log partition width for a specific chain
    ///
    /// # Example
    ///
    /// ```rust
    /// use ethopt::{EthoptConfigBuilder, MaxBlockRange};
    /// use alloy_chains::NamedChain;
    ///
    /// let config = EthoptConfigBuilder::new()
    ///     .chain_events_range(NamedChain::Polygon, 3000)
    ///     .build();
    ///
    /// assert_eq!(config.get_events_range(NamedChain::Polygon), MaxBlockRange::new(3000));
    /// assert_eq!(config.get_events_range(NamedChain::Mainnet), MaxBlockRange::DEFAULT);
    /// ```
    pub fn get_events_range(&self, chain: NamedChain) -> MaxBlockRange {
        self.chain_overrides
            .get(&chain)
            .and_then(|c| c.events_range)
            .unwrap_or(self.events_range)
    }

    /// Set chain-specific override
    pub fn set_chain_override(&mut self, chain: NamedChain, config: ChainConfig) {
        self.chain_overrides.insert(chain, config);
    }
}

/// Builder for [`EthoptConfig`]
///
/// # Example
///
/// ```rust
/// use ethopt::{BatchConfig, EthoptConfigBuilder};
/// use std::time::Duration;
///
/// let config = EthoptConfigBuilder::new()
///     .events_range(2000)
///     .batch(BatchConfig::builder().retry_max(4).build().unwrap())
///     .rpc_timeout(Duration::from_secs(60))
///     .build();
/// ```
pub struct EthoptConfigBuilder {
    config: EthoptConfig,
}

impl Default for EthoptConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EthoptConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: EthoptConfig::minimal(),
        }
    }

    /// Start with common defaults
    ///
    /// Initializes the builder with the same defaults as [`EthoptConfig::with_common_defaults`].
    pub fn with_defaults() -> Self {
        Self {
            config: EthoptConfig::with_common_defaults(),
        }
    }

    /// Set global scheduler pacing
    pub fn batch(mut self, batch: BatchConfig) -> Self {
        self.config.batch = batch;
        self
    }

    /// Derive global scheduler pacing from a requests-per-second ceiling
    ///
    /// See [`BatchConfig::from_rate_limit`]. The chunk delay is one second.
    pub fn rate_limit(
        mut self,
        requests_per_second: f64,
        max_batch_size: usize,
    ) -> Result<Self, ConfigError> {
        self.config.batch = BatchConfig::from_rate_limit(
            requests_per_second,
            max_batch_size,
            BatchConfig::MIN_RATE_WINDOW,
        )?;
        Ok(self)
    }

    /// Set global log partition width
    pub fn events_range(mut self, blocks: u64) -> Self {
        self.config.events_range = MaxBlockRange::new(blocks);
        self
    }

    /// Set multicall queue settings
    pub fn multicall(mut self, multicall: MulticallConfig) -> Self {
        self.config.multicall = multicall;
        self
    }

    /// Set global RPC timeout
    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.config.rpc_timeout = timeout;
        self
    }

    /// Add chain-specific configuration
    pub fn chain_config(mut self, chain: NamedChain, config: ChainConfig) -> Self {
        self.config.set_chain_override(chain, config);
        self
    }

    /// Convenience: derive pacing for a specific chain from its rate limit
    pub fn chain_rate_limit(
        mut self,
        chain: NamedChain,
        requests_per_second: f64,
        max_batch_size: usize,
    ) -> Result<Self, ConfigError> {
        let batch = BatchConfig::from_rate_limit(
            requests_per_second,
            max_batch_size,
            BatchConfig::MIN_RATE_WINDOW,
        )?;
        let existing = self.config.chain_overrides.remove(&chain).unwrap_or_default();
        self.config.set_chain_override(
            chain,
            ChainConfig {
                batch: Some(batch),
                ..existing
            },
        );
        Ok(self)
    }

    /// Convenience: set log partition width for a specific chain
    pub fn chain_events_range(mut self, chain: NamedChain, blocks: u64) -> Self {
        let existing = self.config.chain_overrides.remove(&chain).unwrap_or_default();
        self.config.set_chain_override(
            chain,
            ChainConfig {
                events_range: Some(MaxBlockRange::new(blocks)),
                ..existing
            },
        );
        self
    }

    /// Build the final configuration
    pub fn build(self) -> EthoptConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EthoptConfig::default();

        assert_eq!(config.get_batch_config(NamedChain::Base).batch_size, 4);
        assert_eq!(config.get_batch_config(NamedChain::Sonic).concurrency_size, 1);
        assert_eq!(
            config.get_batch_config(NamedChain::Arbitrum),
            BatchConfig::default()
        );
        assert_eq!(
            config.get_events_range(NamedChain::Base),
            MaxBlockRange::DEFAULT
        );
        assert_eq!(config.rpc_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_minimal_config() {
        let config = EthoptConfig::minimal();
        assert!(config.chain_overrides.is_empty());
        assert_eq!(
            config.get_batch_config(NamedChain::Base),
            BatchConfig::default()
        );
    }

    #[test]
    fn test_chain_config_preserves_existing() {
        let config = EthoptConfigBuilder::new()
            .chain_events_range(NamedChain::Arbitrum, 2000)
            .chain_rate_limit(NamedChain::Arbitrum, 10.0, 5)
            .unwrap()
            .build();

        assert_eq!(
            config.get_events_range(NamedChain::Arbitrum),
            MaxBlockRange::new(2000)
        );
        assert_eq!(config.get_batch_config(NamedChain::Arbitrum).chunk_size(), 10);
    }

    #[test]
    fn test_invalid_chain_rate_rejected() {
        let result = EthoptConfigBuilder::new().chain_rate_limit(NamedChain::Base, 0.0, 5);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_rate_limit() {
        let config = EthoptConfigBuilder::new().rate_limit(25.0, 10).unwrap().build();
        assert_eq!(config.batch.batch_size, 10);
        assert_eq!(config.batch.concurrency_size, 2);
        assert_eq!(
            config.get_batch_config(NamedChain::Optimism),
            config.batch
        );
    }
}
