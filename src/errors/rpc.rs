//! Shared RPC error types for blockchain provider operations.
//!
//! This module provides error types for common RPC failures that can occur
//! across the batch retrieval helpers and the provider wrappers.

use super::ConfigError;

/// Errors that can occur during blockchain RPC operations.
///
/// Each variant carries enough context to tell which item of a batch failed.
/// Missing objects (a `null` block, transaction or receipt) are errors too:
/// inside the batch scheduler they fail their sub-batch and are retried like
/// any other transient failure.
///
/// # Examples
///
/// ```rust
/// use ethopt::RpcError;
///
/// let error = RpcError::TransactionNotFound {
///     tx_hash: "0x123...".to_string(),
/// };
/// println!("Error: {}", error);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Failed to fetch logs from the blockchain.
    ///
    /// This can occur due to rate limiting, a block range the node refuses,
    /// network connectivity issues, or provider-side errors.
    #[error("Failed to fetch logs for blocks {from_block}-{to_block}")]
    GetLogsFailed {
        /// First block of the failing partition
        from_block: u64,
        /// Last block of the failing partition
        to_block: u64,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transaction was not found on the blockchain.
    #[error("Transaction not found: {tx_hash}")]
    TransactionNotFound {
        /// The transaction hash that wasn't found
        tx_hash: String,
    },

    /// Receipt was not found for a transaction.
    ///
    /// This can occur if the transaction hasn't been mined yet, or if the
    /// provider hasn't indexed the receipt.
    #[error("Receipt not found for transaction: {tx_hash}")]
    ReceiptNotFound {
        /// The transaction hash whose receipt wasn't found
        tx_hash: String,
    },

    /// Block was not found at the specified block number.
    ///
    /// This can occur if the block number is beyond the chain tip, if there
    /// was a chain reorganization, or if the provider hasn't synced that block.
    #[error("Block not found: {block_number}")]
    BlockNotFound {
        /// The block number that wasn't found
        block_number: u64,
    },

    /// A generic RPC request failed.
    ///
    /// This is a catch-all for RPC failures that don't fit other categories,
    /// such as network errors, timeouts, or provider downtime.
    #[error("RPC request failed during {operation}")]
    RequestFailed {
        /// Description of the operation that failed (e.g., "eth_getBlockByNumber 100")
        operation: String,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The configured RPC URL could not be parsed.
    #[error("Invalid provider URL: {0}")]
    ProviderUrlInvalid(String),

    /// The requested block or index range was rejected before any request was sent.
    #[error(transparent)]
    InvalidRange(#[from] ConfigError),
}

impl RpcError {
    /// Helper to create a `GetLogsFailed` error from any error type.
    pub fn get_logs_failed(
        from_block: u64,
        to_block: u64,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetLogsFailed {
            from_block,
            to_block,
            source: Box::new(source),
        }
    }

    /// Helper to create a `RequestFailed` error from any error type.
    pub fn request_failed(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::RequestFailed {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create a `TransactionNotFound` error.
    pub fn transaction_not_found(tx_hash: impl std::fmt::Display) -> Self {
        RpcError::TransactionNotFound {
            tx_hash: tx_hash.to_string(),
        }
    }

    /// Helper to create a `ReceiptNotFound` error.
    pub fn receipt_not_found(tx_hash: impl std::fmt::Display) -> Self {
        RpcError::ReceiptNotFound {
            tx_hash: tx_hash.to_string(),
        }
    }
}
