// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the multicall aggregation queue.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes};
use alloy_transport::TransportError;

/// Failure of a whole drain.
///
/// When the aggregate call itself fails there is no way to attribute the
/// failure to a single leg, so every call claimed by the drain receives a
/// clone of the same `DrainError`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DrainError {
    /// The aggregate `eth_call` failed at the transport or node level.
    #[error("Aggregate call failed: {0}")]
    Transport(Arc<TransportError>),

    /// The aggregator answered with a result list that does not line up with
    /// the submitted legs.
    #[error("Aggregate call returned {actual} results for {expected} calls")]
    ResultCountMismatch {
        /// Number of legs submitted
        expected: usize,
        /// Number of results returned
        actual: usize,
    },

    /// The aggregate call panicked before producing results.
    #[error("Aggregate call aborted before settling its calls")]
    Aborted,
}

impl From<TransportError> for DrainError {
    fn from(error: TransportError) -> Self {
        DrainError::Transport(Arc::new(error))
    }
}

/// Errors surfaced to callers of the multicall queue and [`MulticallProvider`].
///
/// A reverted leg is reported as [`MulticallError::Reverted`] with the revert
/// reason decoded the same way a direct `eth_call` revert would be, so batched
/// and unbatched calls look identical to the caller.
///
/// [`MulticallProvider`]: crate::MulticallProvider
#[derive(Debug, thiserror::Error)]
pub enum MulticallError {
    /// The drain this call belonged to failed as a whole.
    #[error(transparent)]
    Drain(#[from] DrainError),

    /// The individual call reverted inside an otherwise successful aggregate.
    #[error("Call to {target} reverted: {reason}")]
    Reverted {
        /// Contract that was called
        target: Address,
        /// Decoded revert reason, or the hex payload when it cannot be decoded
        reason: String,
        /// Raw revert payload
        data: Bytes,
    },

    /// A direct (non-batched) `eth_call` failed.
    #[error("eth_call failed: {0}")]
    Rpc(#[from] TransportError),

    /// Return data could not be decoded into the expected type.
    #[error("Failed to decode return data: {0}")]
    Decode(#[from] alloy_sol_types::Error),

    /// The queue was dropped before it settled this call.
    #[error("Multicall queue closed before the call was settled")]
    QueueClosed,
}

impl MulticallError {
    /// Build a `Reverted` error from the raw revert payload.
    pub fn reverted(target: Address, data: Bytes) -> Self {
        let reason = alloy_sol_types::decode_revert_reason(&data)
            .unwrap_or_else(|| format!("execution reverted with data {data}"));
        MulticallError::Reverted {
            target,
            reason,
            data,
        }
    }

    /// Returns true when the whole drain failed rather than this leg alone.
    pub fn is_drain_failure(&self) -> bool {
        matches!(self, MulticallError::Drain(_))
    }
}
