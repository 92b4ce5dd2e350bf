//! Deterministic deployments through the CREATE2 factory
//!
//! The factory takes `salt ++ init_code` as raw calldata and deploys the
//! contract at `create2(factory, salt, keccak256(init_code))`.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, B256};
use alloy_rpc_types::TransactionRequest;

use crate::config::constants::CREATE2_FACTORY;

/// Calldata for deploying `init_code` with `salt` through the factory
pub fn deterministic_deploy_calldata(salt: B256, init_code: &[u8]) -> Bytes {
    let mut calldata = Vec::with_capacity(32 + init_code.len());
    calldata.extend_from_slice(salt.as_slice());
    calldata.extend_from_slice(init_code);
    calldata.into()
}

/// Address the factory will deploy `init_code` to with `salt`
pub fn deterministic_address(salt: B256, init_code: &[u8]) -> Address {
    CREATE2_FACTORY.create2_from_code(salt, init_code)
}

/// Deployment request to the factory
pub fn deterministic_deploy_request(salt: B256, init_code: &[u8]) -> TransactionRequest {
    TransactionRequest::default()
        .with_to(CREATE2_FACTORY)
        .with_input(deterministic_deploy_calldata(salt, init_code))
}
