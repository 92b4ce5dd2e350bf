//! Span creation helpers for ethopt operations.
//!
//! Each instrumented operation has a matching helper here instead of an
//! `#[instrument]` attribute on the function itself. Callers attach the span
//! with [`tracing::Instrument`] so it stays entered across await points:
//!
//! ```rust,ignore
//! async move { /* work */ }
//!     .instrument(spans::my_operation(value))
//!     .await
//! ```

use alloy_primitives::{Address, BlockNumber};
use tracing::{Level, Span};

/// Create span for a rate-limited batch run.
///
/// Parent: caller's span (e.g. a [`BatchFetcher`](crate::BatchFetcher) method)
/// Children: none; per-item work logs under this span
#[inline]
pub(crate) fn run_batch(label: &str, total: usize, chunks: usize) -> Span {
    tracing::span!(
        Level::INFO,
        "ethopt.run_batch",
        label = %label,
        total = total,
        chunks = chunks,
    )
}

/// Create span for draining one multicall window.
///
/// Parent: None (the drain runs on a spawned task)
#[inline]
pub(crate) fn multicall_drain(calls: usize, chunks: usize) -> Span {
    tracing::debug_span!("ethopt.multicall_drain", calls = calls, chunks = chunks)
}

/// Create span for a partitioned `eth_getLogs` fetch.
///
/// Children: run_batch span
#[inline]
pub(crate) fn fetch_logs(
    from_block: BlockNumber,
    to_block: BlockNumber,
    partitions: usize,
) -> Span {
    tracing::span!(
        Level::INFO,
        "ethopt.fetch_logs",
        from_block = from_block,
        to_block = to_block,
        partitions = partitions,
    )
}

/// Create span for a storage slot search.
#[inline]
pub(crate) fn find_storage_slot(address: Address, start: u64, end: u64) -> Span {
    tracing::span!(
        Level::INFO,
        "ethopt.find_storage_slot",
        address = %address,
        start = start,
        end = end,
    )
}

/// Create span for forward ENS resolution.
#[inline]
pub(crate) fn resolve_name(name: &str) -> Span {
    tracing::debug_span!("ethopt.resolve_name", name = %name)
}
