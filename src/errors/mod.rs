//! Error types for the ethopt library.
//!
//! This module provides strongly-typed errors for all public APIs in ethopt.
//! It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling (`MulticallError`,
//!   `ConfigError`, etc.)
//! - **Unified error type** (`EthoptError`) for convenience when you don't need
//!   to distinguish between error sources
//!
//! # Architecture
//!
//! Each major module has its own error type:
//! - [`ConfigError`] - Invalid batch, multicall or block-range settings
//! - [`MulticallError`] - Failures of calls routed through the aggregation queue
//!   (wraps [`DrainError`] when a whole aggregate failed)
//! - [`EnsError`] - ENS name validation and resolution failures
//! - [`FeeError`] - Fee population and L1 data fee lookups
//!
//! Additionally, [`RpcError`] provides shared error variants for the batch
//! retrieval helpers.
//!
//! # Examples
//!
//! ## Fine-grained error handling
//!
//! ```rust,ignore
//! use ethopt::{MulticallError, MulticallProvider, CallDescriptor};
//!
//! async fn example(provider: MulticallProvider<impl alloy_provider::Provider + Clone + 'static>) {
//!     match provider.call(CallDescriptor::new(token, calldata)).await {
//!         Ok(data) => println!("Returned {} bytes", data.len()),
//!         Err(MulticallError::Reverted { reason, .. }) => eprintln!("Reverted: {reason}"),
//!         Err(e) if e.is_drain_failure() => eprintln!("Whole batch failed, retrying: {e}"),
//!         Err(e) => eprintln!("Other error: {e}"),
//!     }
//! }
//! ```
//!
//! ## Using the unified error type
//!
//! ```rust,ignore
//! use ethopt::{EthoptError, EnsResolver};
//!
//! async fn example(ens: &EnsResolver<impl alloy_provider::Provider + Clone + 'static>) -> Result<(), EthoptError> {
//!     let owner = ens.resolve_name("vitalik.eth").await?;
//!     // Errors automatically convert to EthoptError via From implementations
//!     println!("{owner:?}");
//!     Ok(())
//! }
//! ```

mod config;
mod ens;
mod fee;
mod multicall;
mod rpc;

pub use config::ConfigError;
pub use ens::EnsError;
pub use fee::FeeError;
pub use multicall::{DrainError, MulticallError};
pub use rpc::RpcError;

/// Unified error type for all ethopt operations.
///
/// This enum wraps all module-specific error types, providing a convenient way to
/// handle errors when you don't need to distinguish between different error sources.
///
/// All module-specific error types automatically convert to `EthoptError` via
/// `From` implementations, so you can use `?` to propagate errors naturally.
#[derive(Debug, thiserror::Error)]
pub enum EthoptError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a multicall-routed contract read.
    #[error("Multicall error: {0}")]
    Multicall(#[from] MulticallError),

    /// Error from a batch RPC helper.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Error from ENS resolution.
    #[error("ENS error: {0}")]
    Ens(#[from] EnsError),

    /// Error from fee population.
    #[error("Fee error: {0}")]
    Fee(#[from] FeeError),
}
