//! Multicall aggregation
//!
//! Read calls issued close together are coalesced into Multicall3
//! `aggregate3` invocations and their results routed back by index.
//!
//! - [`MulticallQueue`] owns the debounce window and the drain
//! - [`AggregateTransport`] is the round trip (the queue's only I/O seam)
//! - [`MulticallProvider`] decides per call whether batching is safe

mod eligibility;
mod pending;
mod provider;
mod queue;
mod timer;
mod transport;

pub use eligibility::{
    has_no_sender_override, has_target, has_zero_value, is_multicall_eligible,
    reads_latest_block, targets_aggregator, CallDescriptor,
};
pub use pending::{CallResult, PendingCall, SettlementState};
pub use provider::MulticallProvider;
pub use queue::{CallHandle, MulticallQueue, QueuePhase};
pub use timer::{DeferredTimer, TokioTimer};
pub use transport::{AggregateTransport, ProviderAggregator};
