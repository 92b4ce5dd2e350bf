//! Typed bindings for well-known contracts
//!
//! Bindings are plain `sol!` interfaces; reads go through
//! [`MulticallProvider::call_sol`](crate::MulticallProvider::call_sol) so
//! they are batched whenever possible.

pub mod create2;
pub mod ens;
pub mod erc20;
pub mod gas_oracle;
pub mod multicall3;
pub mod oracle;

pub use erc20::{Permit2Allowance, TokenMetadata, TokenReader, IERC20, IPermit2, IWETH};
pub use multicall3::Multicall3;
pub use oracle::{OffchainOracle, PriceOracle};
