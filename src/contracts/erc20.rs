// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! ERC-20, WETH and Permit2 bindings with a batched token reader

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::config::constants::PERMIT2;
use crate::errors::MulticallError;
use crate::multicall::MulticallProvider;

sol! {
    /// ERC-20 read interface, including the optional metadata extension.
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    /// Wrapped Ether.
    interface IWETH {
        function deposit() external payable;
        function withdraw(uint256 wad) external;
    }

    /// Uniswap Permit2 allowance lookup.
    interface IPermit2 {
        function allowance(address user, address token, address spender)
            external view returns (uint160 amount, uint48 expiration, uint48 nonce);
    }
}

/// Token metadata from the ERC-20 metadata extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Token decimals
    pub decimals: u8,
}

/// A Permit2 allowance entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permit2Allowance {
    /// Approved amount
    pub amount: U256,
    /// Unix timestamp at which the approval expires
    pub expiration: u64,
    /// Current signature nonce
    pub nonce: u64,
}

/// Reads token state through the multicall queue
///
/// Reads started together (e.g. with `try_join!`) travel in one aggregate call.
#[derive(Clone)]
pub struct TokenReader<P> {
    provider: MulticallProvider<P>,
}

impl<P> TokenReader<P>
where
    P: Provider + Clone + 'static,
{
    /// Read through `provider`'s queue
    pub fn new(provider: MulticallProvider<P>) -> Self {
        Self { provider }
    }

    /// Name, symbol and decimals of `token`
    pub async fn metadata(&self, token: Address) -> Result<TokenMetadata, MulticallError> {
        let (name, symbol, decimals) = futures::try_join!(
            self.provider.call_sol(token, &IERC20::nameCall {}),
            self.provider.call_sol(token, &IERC20::symbolCall {}),
            self.provider.call_sol(token, &IERC20::decimalsCall {}),
        )?;
        Ok(TokenMetadata {
            name,
            symbol,
            decimals,
        })
    }

    /// Token balance of `owner`
    pub async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, MulticallError> {
        self.provider
            .call_sol(token, &IERC20::balanceOfCall { owner })
            .await
    }

    /// Token balances of every holder, in order
    pub async fn balances(
        &self,
        token: Address,
        holders: &[Address],
    ) -> Result<Vec<U256>, MulticallError> {
        try_join_all(holders.iter().map(|&owner| self.balance_of(token, owner))).await
    }

    /// Native balance of every holder, in order
    ///
    /// Each balance is a direct `eth_getBalance`; calls targeting the
    /// aggregator itself are never batched.
    pub async fn eth_balances(&self, holders: &[Address]) -> Result<Vec<U256>, MulticallError> {
        try_join_all(
            holders
                .iter()
                .map(|&holder| async move {
                    Ok::<_, MulticallError>(self.provider.provider().get_balance(holder).await?)
                }),
        )
        .await
    }

    /// ERC-20 allowance granted by `owner` to `spender`
    pub async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, MulticallError> {
        self.provider
            .call_sol(token, &IERC20::allowanceCall { owner, spender })
            .await
    }

    /// Permit2 allowance of `spender` over `owner`'s `token`
    pub async fn permit2_allowance(
        &self,
        owner: Address,
        token: Address,
        spender: Address,
    ) -> Result<Permit2Allowance, MulticallError> {
        let entry = self
            .provider
            .call_sol(
                PERMIT2,
                &IPermit2::allowanceCall {
                    user: owner,
                    token,
                    spender,
                },
            )
            .await?;
        Ok(Permit2Allowance {
            amount: U256::from(entry.amount),
            expiration: entry.expiration.to::<u64>(),
            nonce: entry.nonce.to::<u64>(),
        })
    }
}

/// Request wrapping `amount` native tokens into `weth`
pub fn weth_deposit_request(weth: Address, amount: U256) -> TransactionRequest {
    TransactionRequest::default()
        .with_to(weth)
        .with_value(amount)
        .with_input(Bytes::from(IWETH::depositCall {}.abi_encode()))
}

/// Request unwrapping `amount` of `weth`
pub fn weth_withdraw_request(weth: Address, amount: U256) -> TransactionRequest {
    TransactionRequest::default()
        .with_to(weth)
        .with_input(Bytes::from(IWETH::withdrawCall { wad: amount }.abi_encode()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::WETH;

    #[test]
    fn test_weth_deposit_request() {
        let tx = weth_deposit_request(WETH, U256::from(5));
        assert_eq!(tx.value, Some(U256::from(5)));
        assert_eq!(
            tx.input.input().unwrap().as_ref(),
            IWETH::depositCall::SELECTOR.as_slice()
        );
    }

    #[test]
    fn test_weth_withdraw_request() {
        let tx = weth_withdraw_request(WETH, U256::from(5));
        let input = tx.input.input().unwrap();
        let decoded = IWETH::withdrawCall::abi_decode(input).unwrap();
        assert_eq!(decoded.wad, U256::from(5));
        assert_eq!(tx.value, None);
    }
}
