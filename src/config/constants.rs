//! Well-known addresses and constants
//!
//! This module centralizes the deployment addresses of the contracts ethopt
//! binds to. All of them are deployed at the same address on every chain
//! they exist on, unless noted otherwise.

use alloy_primitives::{address, Address};

/// Multicall3, the aggregator used by the multicall queue
///
/// Contract: 0xcA11bde05977b3631167028862bE2a173976CA11
pub const MULTICALL3: Address = address!("ca11bde05977b3631167028862be2a173976ca11");

/// Uniswap Permit2
///
/// Contract: 0x000000000022D473030F116dDEE9F6B43aC78BA3
pub const PERMIT2: Address = address!("000000000022d473030f116ddee9f6b43ac78ba3");

/// 1inch offchain spot-price oracle
///
/// Contract: 0x00000000000D6FFc74A8feb35aF5827bf57f6786
pub const OFFCHAIN_ORACLE: Address = address!("00000000000d6ffc74a8feb35af5827bf57f6786");

/// Deterministic deployment proxy (Arachnid CREATE2 factory)
///
/// Contract: 0x4e59b44847b379578588920cA78FbF26c0B4956C
pub const CREATE2_FACTORY: Address = address!("4e59b44847b379578588920ca78fbf26c0b4956c");

/// OP-stack `GasPriceOracle` predeploy
///
/// Contract: 0x420000000000000000000000000000000000000F
pub const OP_GAS_PRICE_ORACLE: Address = address!("420000000000000000000000000000000000000f");

/// ENS registry (with fallback) on Ethereum mainnet
///
/// Contract: 0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e
pub const ENS_REGISTRY: Address = address!("00000000000c2e074ec69a0dfb2997ba6c7d2e1e");

/// Wrapped Ether on Ethereum mainnet
///
/// Contract: 0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2
pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksums_match_documented_addresses() {
        assert_eq!(
            MULTICALL3.to_checksum(None),
            "0xcA11bde05977b3631167028862bE2a173976CA11"
        );
        assert_eq!(
            PERMIT2.to_checksum(None),
            "0x000000000022D473030F116dDEE9F6B43aC78BA3"
        );
        assert_eq!(
            WETH.to_checksum(None),
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
        );
    }
}
