//! Storage layout helpers

use alloy_primitives::{keccak256, Address, U256};

/// Result of a storage-slot search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageHit {
    /// First index whose slot held a non-zero value
    pub index: u64,
    /// The storage key for `index`
    pub slot: U256,
    /// The value stored there
    pub value: U256,
}

/// Storage key of `mapping(address => _)` entry `key` declared at `slot`
///
/// Solidity places the entry at `keccak256(abi.encode(key, slot))`.
pub fn mapping_slot(key: Address, slot: U256) -> U256 {
    let mut preimage = [0u8; 64];
    preimage[12..32].copy_from_slice(key.as_slice());
    preimage[32..].copy_from_slice(&slot.to_be_bytes::<32>());
    U256::from_be_bytes(keccak256(preimage).0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use alloy_sol_types::SolValue;

    #[test]
    fn test_mapping_slot_matches_abi_encoding() {
        let holder = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");
        let slot = U256::from(3);
        let expected = keccak256((holder, slot).abi_encode());
        assert_eq!(mapping_slot(holder, slot), U256::from_be_bytes(expected.0));
    }

    #[test]
    fn test_mapping_slot_depends_on_declaration_slot() {
        let holder = Address::repeat_byte(0x11);
        assert_ne!(
            mapping_slot(holder, U256::ZERO),
            mapping_slot(holder, U256::from(1))
        );
    }
}
