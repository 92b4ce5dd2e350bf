// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for fee population and L1 data fee lookups.

use alloy_transport::TransportError;

use super::MulticallError;

/// Errors that can occur while populating transaction fees.
#[derive(Debug, thiserror::Error)]
pub enum FeeError {
    /// Fetching the latest block for its base fee failed or returned nothing.
    #[error("Latest block unavailable for fee estimation")]
    LatestBlockUnavailable,

    /// An RPC used for fee estimation failed.
    #[error("Fee RPC {method} failed: {source}")]
    Rpc {
        /// JSON-RPC method that failed
        method: &'static str,
        /// The underlying transport error
        #[source]
        source: TransportError,
    },

    /// The L1 gas price oracle call failed.
    #[error("L1 fee oracle call failed: {0}")]
    Oracle(#[from] MulticallError),

    /// The chain does not post data to L1, so there is no L1 fee to read.
    #[error("Chain {chain} has no L1 data fee")]
    NoL1Fee {
        /// Chain the estimator is configured for
        chain: String,
    },
}

impl FeeError {
    /// Create an `Rpc` error for the given method.
    pub fn rpc(method: &'static str, source: TransportError) -> Self {
        FeeError::Rpc { method, source }
    }
}
