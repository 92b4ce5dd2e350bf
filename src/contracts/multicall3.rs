// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Multicall3 bindings
//!
//! Only the read-side entry points are bound. `aggregate3` is what the
//! multicall queue invokes; the block getters are convenient to batch
//! alongside other reads so that every value comes from the same block.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::sol;

sol! {
    /// Multicall3, deployed at the same address on most EVM chains.
    /// See: https://www.multicall3.com/
    interface Multicall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls) external payable returns (Result[] memory returnData);

        function getEthBalance(address addr) external view returns (uint256 balance);

        function getBlockNumber() external view returns (uint256 blockNumber);

        function getCurrentBlockTimestamp() external view returns (uint256 timestamp);

        function getBasefee() external view returns (uint256 basefee);
    }
}

/// Build one `aggregate3` leg.
pub fn call3(target: Address, call_data: Bytes, allow_failure: bool) -> Multicall3::Call3 {
    Multicall3::Call3 {
        target,
        allowFailure: allow_failure,
        callData: call_data,
    }
}
