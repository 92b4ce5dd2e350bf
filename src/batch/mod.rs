//! Rate-limited batch retrieval
//!
//! [`run_batch`] is the generic engine; [`BatchFetcher`] applies it to the
//! common JSON-RPC lookups.

mod fetch;
mod partition;
mod scheduler;
mod storage;

pub use fetch::{BatchFetcher, ProgressCallback};
pub use partition::{partition_block_range, partition_index_range};
pub use scheduler::{run_batch, run_batch_with_progress, BatchProgress, ProgressSummary};
pub use storage::{mapping_slot, StorageHit};
