// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for `MulticallProvider` against alloy's mocked transport
//!
//! Each queued response answers exactly one JSON-RPC request, so the number
//! of responses pushed doubles as a check on how many requests were sent.

use alloy_eips::BlockId;
use alloy_primitives::{address, Address, Bytes, U256};
use alloy_provider::{ProviderBuilder, RootProvider};
use alloy_sol_types::{Revert, SolCall, SolError};
use alloy_transport::mock::Asserter;
use ethopt::contracts::{Multicall3, IERC20};
use ethopt::{MulticallError, MulticallProvider, TokenReader};

const TOKEN: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
const HOLDER: Address = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");

fn mocked() -> (Asserter, MulticallProvider<RootProvider>) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_mocked_client(asserter.clone());
    (asserter, MulticallProvider::new(provider))
}

fn ok_leg(data: Vec<u8>) -> Multicall3::Result {
    Multicall3::Result {
        success: true,
        returnData: data.into(),
    }
}

fn aggregate_response(results: Vec<Multicall3::Result>) -> Bytes {
    Multicall3::aggregate3Call::abi_encode_returns(&results).into()
}

/// Three concurrent reads are answered by one aggregate `eth_call`
#[tokio::test]
async fn test_token_metadata_uses_one_request() {
    let (asserter, provider) = mocked();
    asserter.push_success(&aggregate_response(vec![
        ok_leg(IERC20::nameCall::abi_encode_returns(&"USD Coin".to_string())),
        ok_leg(IERC20::symbolCall::abi_encode_returns(&"USDC".to_string())),
        ok_leg(IERC20::decimalsCall::abi_encode_returns(&6u8)),
    ]));

    let metadata = TokenReader::new(provider).metadata(TOKEN).await.unwrap();

    assert_eq!(metadata.name, "USD Coin");
    assert_eq!(metadata.symbol, "USDC");
    assert_eq!(metadata.decimals, 6);
}

/// A reverted leg surfaces as `Reverted` with the decoded reason
#[tokio::test]
async fn test_reverted_leg_is_decoded() {
    let (asserter, provider) = mocked();
    asserter.push_success(&aggregate_response(vec![Multicall3::Result {
        success: false,
        returnData: Revert::from("insufficient balance").abi_encode().into(),
    }]));

    let error = provider
        .call_sol(TOKEN, &IERC20::balanceOfCall { owner: HOLDER })
        .await
        .unwrap_err();

    match error {
        MulticallError::Reverted { target, reason, .. } => {
            assert_eq!(target, TOKEN);
            assert!(reason.contains("insufficient balance"), "{reason}");
        }
        other => panic!("expected Reverted, got {other:?}"),
    }
}

/// Historical reads bypass the queue and go straight to `eth_call`
#[tokio::test]
async fn test_historical_read_is_not_batched() {
    let (asserter, provider) = mocked();
    let balance = U256::from(1_000_000u64);
    asserter.push_success(&Bytes::from(IERC20::balanceOfCall::abi_encode_returns(
        &balance,
    )));

    let result = provider
        .call_sol_at(
            TOKEN,
            &IERC20::balanceOfCall { owner: HOLDER },
            BlockId::number(19_000_000),
        )
        .await
        .unwrap();

    assert_eq!(result, balance);
    assert_eq!(provider.queue().pending_len(), 0);
}

/// A transport failure of the aggregate fails every batched call
#[tokio::test]
async fn test_aggregate_failure_fails_all_calls() {
    let (asserter, provider) = mocked();
    asserter.push_failure_msg("upstream unavailable");

    let reader = TokenReader::new(provider);
    let error = reader.metadata(TOKEN).await.unwrap_err();

    assert!(error.is_drain_failure());
}

/// Native balances go out as plain `eth_getBalance` requests
#[tokio::test]
async fn test_eth_balances_use_get_balance() {
    let (asserter, provider) = mocked();
    let balance = U256::from(1_000_000_000_000_000_000u128);
    asserter.push_success(&balance);
    asserter.push_success(&balance);

    let balances = TokenReader::new(provider)
        .eth_balances(&[HOLDER, TOKEN])
        .await
        .unwrap();

    assert_eq!(balances, vec![balance, balance]);
}
