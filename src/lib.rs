// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # ethopt
//!
//! Convenience layer over an alloy [`Provider`](alloy_provider::Provider)
//! for read-heavy EVM workloads.
//!
//! - [`MulticallProvider`] coalesces eligible `eth_call`s issued close
//!   together into Multicall3 `aggregate3` invocations
//! - [`run_batch`] and [`BatchFetcher`] pace bulk retrieval under an RPC
//!   rate limit, retrying failed sub-batches
//! - [`EnsResolver`], [`FeeEstimator`], [`TokenReader`] and [`PriceOracle`]
//!   are typed helpers whose reads go through the multicall queue
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ethopt::provider::{create_multicall_provider, ProviderConfig};
//! use ethopt::{BatchFetcher, EnsResolver, TokenReader};
//!
//! let provider = create_multicall_provider(&ProviderConfig::new(rpc_url))?;
//!
//! // Both reads land in the same aggregate3 call
//! let tokens = TokenReader::new(provider.clone());
//! let (meta, balance) = tokio::try_join!(tokens.metadata(usdc), tokens.balance_of(usdc, holder))?;
//!
//! let ens = EnsResolver::new(provider.clone());
//! let owner = ens.resolve_name("vitalik.eth").await?;
//!
//! let fetcher = BatchFetcher::new(provider.provider().clone());
//! let blocks = fetcher.get_blocks((19_000_000..19_000_500).collect(), false).await?;
//! ```
//!
//! ## Block ranges
//!
//! ```rust
//! use ethopt::{partition_block_range, BlockRange};
//!
//! let ranges = partition_block_range(100, 350, 100, false).unwrap();
//! assert_eq!(ranges[2], BlockRange::new(300, 350));
//! ```

mod batch;
pub mod config;
mod config_types;
pub mod contracts;
mod ens;
pub mod errors;
mod fees;
mod multicall;
pub mod provider;
pub(crate) mod tracing;
pub mod transport;

pub use batch::{
    mapping_slot, partition_block_range, partition_index_range, run_batch,
    run_batch_with_progress, BatchFetcher, BatchProgress, ProgressCallback, ProgressSummary,
    StorageHit,
};
pub use config::{
    BatchConfig, BatchConfigBuilder, ChainConfig, EthoptConfig, EthoptConfigBuilder,
    MulticallConfig, MulticallConfigBuilder,
};
pub use config_types::{BlockRange, ChunkIterator, MaxBlockRange};
pub use contracts::{Permit2Allowance, PriceOracle, TokenMetadata, TokenReader};
pub use ens::{namehash, reverse_name, EnsResolver};
pub use errors::{
    ConfigError, DrainError, EnsError, EthoptError, FeeError, MulticallError, RpcError,
};
pub use fees::{
    bump, FeeEstimator, L2, DEFAULT_FALLBACK_PRIORITY_FEE, DEFAULT_FEE_BUMP_PERCENT,
    DEFAULT_GAS_LIMIT_BUMP_PERCENT,
};
pub use multicall::{
    has_no_sender_override, has_target, has_zero_value, is_multicall_eligible,
    reads_latest_block, targets_aggregator, AggregateTransport, CallDescriptor, CallHandle,
    CallResult, DeferredTimer, MulticallProvider, MulticallQueue, PendingCall, ProviderAggregator,
    QueuePhase, SettlementState, TokioTimer,
};
