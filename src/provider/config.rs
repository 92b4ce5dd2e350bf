//! Provider configuration options

use crate::config::MulticallConfig;

/// Configuration for creating providers
///
/// # Example
///
/// ```rust
/// use ethopt::provider::ProviderConfig;
///
/// let config = ProviderConfig::new("https://eth.llamarpc.com").with_logging(true);
/// assert!(config.logging_enabled);
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// RPC endpoint URL
    pub url: String,
    /// Log every JSON-RPC method with its latency
    pub logging_enabled: bool,
    /// Settings of the multicall queue attached by
    /// [`create_multicall_provider`](super::create_multicall_provider)
    pub multicall: MulticallConfig,
}

impl ProviderConfig {
    /// Configuration for `url` with logging off and default multicall settings
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            logging_enabled: false,
            multicall: MulticallConfig::default(),
        }
    }

    /// Toggle RPC logging
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Replace the multicall queue settings
    #[must_use]
    pub fn with_multicall(mut self, multicall: MulticallConfig) -> Self {
        self.multicall = multicall;
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new("http://localhost:8545")
    }
}
