// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Offchain spot-price oracle bindings
//!
//! The oracle quotes tokens against the chain's wrapped native token. Rates
//! are scaled by `1e18` and by the difference in decimals, so a token with
//! `d` decimals worth `x` ETH per whole token reports `x * 10^(36 - d)`.

use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_sol_types::sol;
use futures::future::try_join_all;
use tracing::debug;

use crate::config::constants::OFFCHAIN_ORACLE;
use crate::errors::MulticallError;
use crate::multicall::MulticallProvider;

sol! {
    /// 1inch offchain oracle.
    interface OffchainOracle {
        function getRate(address srcToken, address dstToken, bool useWrappers)
            external view returns (uint256 weightedRate);

        function getRateToEth(address srcToken, bool useSrcWrappers)
            external view returns (uint256 weightedRate);
    }
}

/// Batched price lookups against the offchain oracle
#[derive(Clone)]
pub struct PriceOracle<P> {
    provider: MulticallProvider<P>,
    oracle: Address,
}

impl<P> PriceOracle<P>
where
    P: Provider + Clone + 'static,
{
    /// Use the canonical oracle deployment
    pub fn new(provider: MulticallProvider<P>) -> Self {
        Self::at(provider, OFFCHAIN_ORACLE)
    }

    /// Use an oracle deployed at `oracle`
    pub fn at(provider: MulticallProvider<P>, oracle: Address) -> Self {
        Self { provider, oracle }
    }

    /// Rate of `token` to the native token
    pub async fn rate_to_eth(&self, token: Address) -> Result<U256, MulticallError> {
        self.provider
            .call_sol(
                self.oracle,
                &OffchainOracle::getRateToEthCall {
                    srcToken: token,
                    useSrcWrappers: true,
                },
            )
            .await
    }

    /// Rates of every token to the native token, in order
    ///
    /// All lookups are issued together and share one aggregate call.
    pub async fn rates_to_eth(&self, tokens: &[Address]) -> Result<Vec<U256>, MulticallError> {
        debug!(tokens = tokens.len(), oracle = %self.oracle, "Querying rates to ETH");
        try_join_all(tokens.iter().map(|&token| self.rate_to_eth(token))).await
    }

    /// Rate of `src` denominated in `dst`
    pub async fn rate(&self, src: Address, dst: Address) -> Result<U256, MulticallError> {
        self.provider
            .call_sol(
                self.oracle,
                &OffchainOracle::getRateCall {
                    srcToken: src,
                    dstToken: dst,
                    useWrappers: true,
                },
            )
            .await
    }
}
