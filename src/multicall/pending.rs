//! Queued read calls and their settlement

use alloy_primitives::{Address, Bytes};
use tokio::sync::oneshot;
use tracing::warn;

use crate::errors::DrainError;

/// Outcome of one leg of an aggregate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResult {
    /// Whether the leg executed without reverting
    pub success: bool,
    /// Return data on success, revert data otherwise
    pub data: Bytes,
}

pub(crate) type Settler = oneshot::Sender<Result<CallResult, DrainError>>;

/// Observable settlement state of a [`PendingCall`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementState {
    /// Waiting for its drain
    Pending,
    /// Settled with a leg result
    Fulfilled,
    /// Settled with a drain failure
    Rejected,
}

#[derive(Debug)]
enum Settlement {
    Pending(Settler),
    Fulfilled,
    Rejected,
}

/// One read request waiting in (or claimed from) the multicall queue
///
/// A call is created pending and settles exactly once. Further settlement
/// attempts are refused and reported as `false`.
#[derive(Debug)]
pub struct PendingCall {
    /// Queue-unique identifier
    pub id: u64,
    /// Contract to call
    pub target: Address,
    /// ABI-encoded invocation
    pub calldata: Bytes,
    settlement: Settlement,
}

impl PendingCall {
    pub(crate) fn new(id: u64, target: Address, calldata: Bytes, settler: Settler) -> Self {
        Self {
            id,
            target,
            calldata,
            settlement: Settlement::Pending(settler),
        }
    }

    /// Current settlement state
    pub fn state(&self) -> SettlementState {
        match self.settlement {
            Settlement::Pending(_) => SettlementState::Pending,
            Settlement::Fulfilled => SettlementState::Fulfilled,
            Settlement::Rejected => SettlementState::Rejected,
        }
    }

    /// Deliver the leg result. Returns `false` if the call was already settled.
    pub fn fulfill(&mut self, result: CallResult) -> bool {
        self.settle(Ok(result), Settlement::Fulfilled)
    }

    /// Deliver a drain failure. Returns `false` if the call was already settled.
    pub fn reject(&mut self, error: DrainError) -> bool {
        self.settle(Err(error), Settlement::Rejected)
    }

    fn settle(&mut self, outcome: Result<CallResult, DrainError>, next: Settlement) -> bool {
        match std::mem::replace(&mut self.settlement, next) {
            Settlement::Pending(settler) => {
                // A dropped receiver only means the caller stopped waiting.
                let _ = settler.send(outcome);
                true
            }
            previous => {
                warn!(call_id = self.id, target = %self.target, "Refusing to settle multicall call twice");
                self.settlement = previous;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> (PendingCall, oneshot::Receiver<Result<CallResult, DrainError>>) {
        let (tx, rx) = oneshot::channel();
        (PendingCall::new(7, Address::ZERO, Bytes::new(), tx), rx)
    }

    #[test]
    fn test_fulfill_once() {
        let (mut call, mut rx) = pending();
        assert_eq!(call.state(), SettlementState::Pending);

        let result = CallResult {
            success: true,
            data: Bytes::from_static(&[1]),
        };
        assert!(call.fulfill(result.clone()));
        assert_eq!(call.state(), SettlementState::Fulfilled);
        assert_eq!(rx.try_recv().unwrap().unwrap(), result);
    }

    #[test]
    fn test_second_settlement_refused() {
        let (mut call, _rx) = pending();
        assert!(call.reject(DrainError::ResultCountMismatch {
            expected: 1,
            actual: 0
        }));
        assert!(!call.fulfill(CallResult {
            success: true,
            data: Bytes::new(),
        }));
        assert_eq!(call.state(), SettlementState::Rejected);
    }

    #[test]
    fn test_settle_after_receiver_dropped() {
        let (mut call, rx) = pending();
        drop(rx);
        assert!(call.reject(DrainError::ResultCountMismatch {
            expected: 1,
            actual: 0
        }));
        assert_eq!(call.state(), SettlementState::Rejected);
    }
}
