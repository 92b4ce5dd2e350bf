// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Fee population with bump heuristics
//!
//! [`FeeEstimator::populate_fees`] fills whatever fee and gas fields a
//! transaction request is missing:
//!
//! - if the latest block has a base fee and no `gas_price` was set,
//!   EIP-1559 fields with `max_fee = base_fee × (100 + fee_bump)% + priority_fee`
//! - otherwise a legacy `gas_price` bumped by `fee_bump`
//! - `gas` from `eth_estimateGas`, bumped by `gas_limit_bump`
//!
//! Fields already set on the request are left alone.

mod l2;

pub use l2::L2;

use alloy_chains::NamedChain;
use alloy_eips::BlockNumberOrTag;
use alloy_primitives::{Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use tracing::{debug, warn};

use crate::config::constants::OP_GAS_PRICE_ORACLE;
use crate::contracts::gas_oracle::GasPriceOracle;
use crate::errors::FeeError;
use crate::multicall::MulticallProvider;

/// Default bump applied to base fee and legacy gas price, in percent
pub const DEFAULT_FEE_BUMP_PERCENT: u64 = 20;

/// Default bump applied to estimated gas, in percent
pub const DEFAULT_GAS_LIMIT_BUMP_PERCENT: u64 = 30;

/// Priority fee used when the node does not support `eth_maxPriorityFeePerGas` (1 gwei)
pub const DEFAULT_FALLBACK_PRIORITY_FEE: u128 = 1_000_000_000;

/// Scale `value` by `(100 + percent)%`, saturating
pub fn bump(value: u128, percent: u64) -> u128 {
    value
        .checked_mul(100 + u128::from(percent))
        .map_or(u128::MAX, |scaled| scaled / 100)
}

/// Fills fee fields of transaction requests
#[derive(Clone)]
pub struct FeeEstimator<P> {
    provider: MulticallProvider<P>,
    chain: Option<NamedChain>,
    fee_bump_percent: u64,
    gas_limit_bump_percent: u64,
    fallback_priority_fee: u128,
}

impl<P> FeeEstimator<P>
where
    P: Provider + Clone + 'static,
{
    /// Estimator with default bumps
    pub fn new(provider: MulticallProvider<P>) -> Self {
        Self {
            provider,
            chain: None,
            fee_bump_percent: DEFAULT_FEE_BUMP_PERCENT,
            gas_limit_bump_percent: DEFAULT_GAS_LIMIT_BUMP_PERCENT,
            fallback_priority_fee: DEFAULT_FALLBACK_PRIORITY_FEE,
        }
    }

    /// Declare the chain, enabling the L1 fee check
    pub fn with_chain(mut self, chain: NamedChain) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Override the base fee / gas price bump
    pub fn with_fee_bump(mut self, percent: u64) -> Self {
        self.fee_bump_percent = percent;
        self
    }

    /// Override the gas limit bump
    pub fn with_gas_limit_bump(mut self, percent: u64) -> Self {
        self.gas_limit_bump_percent = percent;
        self
    }

    /// Override the fallback priority fee
    pub fn with_fallback_priority_fee(mut self, wei: u128) -> Self {
        self.fallback_priority_fee = wei;
        self
    }

    /// Fill missing fee and gas fields of `tx`
    pub async fn populate_fees(
        &self,
        mut tx: TransactionRequest,
    ) -> Result<TransactionRequest, FeeError> {
        let provider = self.provider.provider();

        let latest = provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| FeeError::rpc("eth_getBlockByNumber", e))?
            .ok_or(FeeError::LatestBlockUnavailable)?;

        match latest.header.base_fee_per_gas {
            // Legacy and EIP-1559 fields are mutually exclusive on a request.
            Some(_) if tx.gas_price.is_some() => {}
            Some(base_fee) => {
                let priority_fee = match tx.max_priority_fee_per_gas {
                    Some(fee) => fee,
                    None => self.priority_fee().await,
                };
                let max_fee = bump(u128::from(base_fee), self.fee_bump_percent)
                    .saturating_add(priority_fee);
                debug!(base_fee, priority_fee, max_fee, "Populating EIP-1559 fees");
                tx.max_priority_fee_per_gas.get_or_insert(priority_fee);
                tx.max_fee_per_gas.get_or_insert(max_fee);
            }
            None if tx.gas_price.is_none() => {
                let gas_price = provider
                    .get_gas_price()
                    .await
                    .map_err(|e| FeeError::rpc("eth_gasPrice", e))?;
                let bumped = bump(gas_price, self.fee_bump_percent);
                debug!(gas_price, bumped, "Populating legacy gas price");
                tx.gas_price = Some(bumped);
            }
            None => {}
        }

        if tx.gas.is_none() {
            let estimate = provider
                .estimate_gas(tx.clone())
                .await
                .map_err(|e| FeeError::rpc("eth_estimateGas", e))?;
            let gas = u64::try_from(bump(u128::from(estimate), self.gas_limit_bump_percent))
                .unwrap_or(u64::MAX);
            debug!(estimate, gas, "Populating gas limit");
            tx.gas = Some(gas);
        }

        Ok(tx)
    }

    async fn priority_fee(&self) -> u128 {
        match self.provider.provider().get_max_priority_fee_per_gas().await {
            Ok(fee) => fee,
            Err(error) => {
                warn!(
                    error = %error,
                    fallback = self.fallback_priority_fee,
                    "eth_maxPriorityFeePerGas failed, using fallback"
                );
                self.fallback_priority_fee
            }
        }
    }

    /// L1 data fee for posting `data`, from the OP-stack gas price oracle
    ///
    /// # Errors
    ///
    /// [`FeeError::NoL1Fee`] when the estimator's chain is known not to
    /// charge an L1 data fee.
    pub async fn l1_fee(&self, data: Bytes) -> Result<U256, FeeError> {
        self.ensure_l1_fees()?;
        Ok(self
            .provider
            .call_sol(OP_GAS_PRICE_ORACLE, &GasPriceOracle::getL1FeeCall { data })
            .await?)
    }

    /// Current L1 base fee seen by the OP-stack gas price oracle
    pub async fn l1_base_fee(&self) -> Result<U256, FeeError> {
        self.ensure_l1_fees()?;
        Ok(self
            .provider
            .call_sol(OP_GAS_PRICE_ORACLE, &GasPriceOracle::l1BaseFeeCall {})
            .await?)
    }

    fn ensure_l1_fees(&self) -> Result<(), FeeError> {
        match self.chain {
            Some(chain) if !chain.has_l1_fees() => Err(FeeError::NoL1Fee {
                chain: chain.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{U128, U64};
    use alloy_provider::{ProviderBuilder, RootProvider};
    use alloy_rpc_types::Block;
    use alloy_transport::mock::Asserter;

    fn estimator() -> (Asserter, FeeEstimator<RootProvider>) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());
        (asserter, FeeEstimator::new(MulticallProvider::new(provider)))
    }

    fn latest_block(base_fee: Option<u64>) -> Block {
        let mut block: Block = Block::default();
        block.header.inner.base_fee_per_gas = base_fee;
        block
    }

    #[tokio::test]
    async fn test_populate_eip1559_fees() {
        let (asserter, estimator) = estimator();
        asserter.push_success(&latest_block(Some(10_000_000_000)));
        asserter.push_success(&U128::from(2_000_000_000u64));
        asserter.push_success(&U64::from(21_000u64));

        let tx = estimator
            .populate_fees(TransactionRequest::default())
            .await
            .unwrap();

        assert_eq!(tx.max_priority_fee_per_gas, Some(2_000_000_000));
        assert_eq!(tx.max_fee_per_gas, Some(14_000_000_000));
        assert_eq!(tx.gas, Some(27_300));
        assert!(tx.gas_price.is_none());
    }

    #[tokio::test]
    async fn test_populate_legacy_gas_price_keeps_gas() {
        let (asserter, estimator) = estimator();
        asserter.push_success(&latest_block(None));
        asserter.push_success(&U128::from(5_000_000_000u64));

        let tx = estimator
            .populate_fees(TransactionRequest::default().gas_limit(50_000))
            .await
            .unwrap();

        assert_eq!(tx.gas_price, Some(6_000_000_000));
        assert_eq!(tx.gas, Some(50_000));
        assert!(tx.max_fee_per_gas.is_none());
    }

    #[tokio::test]
    async fn test_preset_gas_price_skips_eip1559_fields() {
        let (asserter, estimator) = estimator();
        asserter.push_success(&latest_block(Some(10_000_000_000)));

        let tx = estimator
            .populate_fees(
                TransactionRequest::default()
                    .gas_limit(21_000)
                    .gas_price(5_000_000_000),
            )
            .await
            .unwrap();

        assert_eq!(tx.gas_price, Some(5_000_000_000));
        assert!(tx.max_fee_per_gas.is_none());
        assert!(tx.max_priority_fee_per_gas.is_none());
    }

    #[tokio::test]
    async fn test_priority_fee_falls_back() {
        let (asserter, estimator) = estimator();
        asserter.push_success(&latest_block(Some(100)));
        asserter.push_failure_msg("method not found");

        let tx = estimator
            .with_fee_bump(0)
            .populate_fees(TransactionRequest::default().gas_limit(21_000))
            .await
            .unwrap();

        assert_eq!(tx.max_priority_fee_per_gas, Some(DEFAULT_FALLBACK_PRIORITY_FEE));
        assert_eq!(tx.max_fee_per_gas, Some(100 + DEFAULT_FALLBACK_PRIORITY_FEE));
    }

    #[tokio::test]
    async fn test_l1_fee_rejected_on_l1_chain() {
        let (_asserter, estimator) = estimator();
        let error = estimator
            .with_chain(NamedChain::Mainnet)
            .l1_fee(Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(error, FeeError::NoL1Fee { .. }));
    }

    #[test]
    fn test_bump() {
        assert_eq!(bump(100, 20), 120);
        assert_eq!(bump(1_000_000_000, 0), 1_000_000_000);
        assert_eq!(bump(u128::MAX, 50), u128::MAX);
        assert_eq!(bump(u128::MAX / 100, 50), u128::MAX);
    }
}
