//! Which calls may be folded into an aggregate
//!
//! Every leg of an `aggregate3` invocation executes at the same block, with
//! zero value and with the aggregator as `msg.sender`. A call is only
//! batched when none of that changes what it would observe.

use alloy_eips::{BlockId, BlockNumberOrTag};
use alloy_primitives::{Address, Bytes, TxKind, U256};
use alloy_rpc_types::TransactionRequest;

/// Structured description of an `eth_call`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallDescriptor {
    /// Contract to call (`None` means contract creation)
    pub to: Option<Address>,
    /// Calldata
    pub data: Bytes,
    /// Block to execute at (`None` means latest)
    pub block: Option<BlockId>,
    /// Value sent with the call
    pub value: Option<U256>,
    /// Sender override
    pub from: Option<Address>,
}

impl CallDescriptor {
    /// A plain read of `to` at the latest block
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to: Some(to),
            data: data.into(),
            ..Default::default()
        }
    }

    /// Execute at a specific block
    pub fn at_block(mut self, block: impl Into<BlockId>) -> Self {
        self.block = Some(block.into());
        self
    }

    /// Attach a value
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Override the sender
    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Convert into a transaction request for a direct `eth_call`
    pub fn to_request(&self) -> TransactionRequest {
        TransactionRequest {
            to: self.to.map(TxKind::Call),
            input: self.data.clone().into(),
            value: self.value,
            from: self.from,
            ..Default::default()
        }
    }
}

impl From<TransactionRequest> for CallDescriptor {
    fn from(tx: TransactionRequest) -> Self {
        let to = match tx.to {
            Some(TxKind::Call(address)) => Some(address),
            _ => None,
        };
        Self {
            to,
            data: tx.input.into_input().unwrap_or_default(),
            block: None,
            value: tx.value,
            from: tx.from,
        }
    }
}

/// The call names a contract.
pub fn has_target(call: &CallDescriptor) -> bool {
    call.to.is_some()
}

/// The call goes to the aggregator itself.
pub fn targets_aggregator(call: &CallDescriptor, aggregator: Address) -> bool {
    call.to == Some(aggregator)
}

/// The call reads the latest block.
pub fn reads_latest_block(call: &CallDescriptor) -> bool {
    matches!(
        call.block,
        None | Some(BlockId::Number(BlockNumberOrTag::Latest))
    )
}

/// The call sends no value.
pub fn has_zero_value(call: &CallDescriptor) -> bool {
    call.value.is_none_or(|value| value.is_zero())
}

/// The call does not override `msg.sender`.
pub fn has_no_sender_override(call: &CallDescriptor) -> bool {
    call.from.is_none()
}

/// Whether `call` can be batched through `aggregator`
pub fn is_multicall_eligible(call: &CallDescriptor, aggregator: Address) -> bool {
    has_target(call)
        && !targets_aggregator(call, aggregator)
        && reads_latest_block(call)
        && has_zero_value(call)
        && has_no_sender_override(call)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::MULTICALL3;
    use alloy_primitives::address;

    const TOKEN: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

    #[test]
    fn test_plain_read_is_eligible() {
        let call = CallDescriptor::new(TOKEN, vec![0x18, 0x16, 0x0d, 0xdd]);
        assert!(is_multicall_eligible(&call, MULTICALL3));
    }

    #[test]
    fn test_explicit_latest_is_eligible() {
        let call = CallDescriptor::new(TOKEN, Bytes::new()).at_block(BlockNumberOrTag::Latest);
        assert!(reads_latest_block(&call));
        assert!(is_multicall_eligible(&call, MULTICALL3));
    }

    #[test]
    fn test_each_condition_excludes() {
        let base = CallDescriptor::new(TOKEN, Bytes::new());

        let creation = CallDescriptor {
            to: None,
            ..base.clone()
        };
        assert!(!has_target(&creation));
        assert!(!is_multicall_eligible(&creation, MULTICALL3));

        let recursive = CallDescriptor::new(MULTICALL3, Bytes::new());
        assert!(targets_aggregator(&recursive, MULTICALL3));
        assert!(!is_multicall_eligible(&recursive, MULTICALL3));

        let historical = base.clone().at_block(BlockNumberOrTag::Number(100));
        assert!(!reads_latest_block(&historical));
        assert!(!is_multicall_eligible(&historical, MULTICALL3));

        let pending = base.clone().at_block(BlockNumberOrTag::Pending);
        assert!(!is_multicall_eligible(&pending, MULTICALL3));

        let paying = base.clone().with_value(U256::from(1));
        assert!(!has_zero_value(&paying));
        assert!(!is_multicall_eligible(&paying, MULTICALL3));

        let impersonating = base.with_from(TOKEN);
        assert!(!has_no_sender_override(&impersonating));
        assert!(!is_multicall_eligible(&impersonating, MULTICALL3));
    }

    #[test]
    fn test_zero_value_is_eligible() {
        let call = CallDescriptor::new(TOKEN, Bytes::new()).with_value(U256::ZERO);
        assert!(is_multicall_eligible(&call, MULTICALL3));
    }

    #[test]
    fn test_from_transaction_request() {
        let tx = TransactionRequest {
            to: Some(TxKind::Call(TOKEN)),
            input: Bytes::from_static(&[1, 2, 3]).into(),
            ..Default::default()
        };
        let call = CallDescriptor::from(tx);
        assert_eq!(call.to, Some(TOKEN));
        assert_eq!(call.data, Bytes::from_static(&[1, 2, 3]));
        assert!(is_multicall_eligible(&call, MULTICALL3));
    }
}
