// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Bulk historical retrieval on top of the batch scheduler
//!
//! Every method maps its keys to single-item requests and runs them through
//! [`run_batch_with_progress`], so results line up with the inputs. A `null`
//! answer (unknown block, transaction or receipt) is an error like any
//! transport failure: it fails its sub-batch, is retried, and eventually
//! fails the whole call.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_eips::{BlockId, BlockNumberOrTag};
use alloy_primitives::{Address, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{Block, Filter, Log, Transaction, TransactionReceipt};
use serde_json::{json, Value};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, Instrument};

use super::partition::{partition_block_range, partition_index_range};
use super::scheduler::{run_batch_with_progress, ProgressSummary};
use super::storage::{mapping_slot, StorageHit};
use crate::config::{BatchConfig, EthoptConfig};
use crate::config_types::MaxBlockRange;
use crate::errors::RpcError;
use crate::tracing::spans;

/// Callback receiving the counters of every completed chunk
pub type ProgressCallback = Arc<dyn Fn(ProgressSummary<'_>) + Send + Sync>;

/// Batch retrieval of blocks, transactions, receipts, traces, logs and storage
///
/// # Examples
///
/// ```rust,ignore
/// use ethopt::{BatchFetcher, EthoptConfig};
/// use alloy_chains::NamedChain;
///
/// let fetcher = BatchFetcher::from_config(provider, &EthoptConfig::default(), NamedChain::Base)
///     .with_progress(|p| println!("{}: {}/{}", p.label, p.processed, p.total));
/// let blocks = fetcher.get_blocks((19_000_000..19_000_100).collect(), false).await?;
/// ```
#[derive(Clone)]
pub struct BatchFetcher<P> {
    provider: P,
    config: BatchConfig,
    events_range: MaxBlockRange,
    request_timeout: Option<Duration>,
    on_progress: Option<ProgressCallback>,
}

impl<P> BatchFetcher<P>
where
    P: Provider + Clone,
{
    /// Fetcher with default pacing and a 1000-block events range
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: BatchConfig::default(),
            events_range: MaxBlockRange::DEFAULT,
            request_timeout: None,
            on_progress: None,
        }
    }

    /// Fetcher using the effective settings for `chain`
    pub fn from_config(provider: P, config: &EthoptConfig, chain: NamedChain) -> Self {
        Self {
            provider,
            config: config.get_batch_config(chain),
            events_range: config.get_events_range(chain),
            request_timeout: Some(config.rpc_timeout),
            on_progress: None,
        }
    }

    /// Replace the scheduler pacing
    pub fn with_batch_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the log partition width
    pub fn with_events_range(mut self, events_range: MaxBlockRange) -> Self {
        self.events_range = events_range;
        self
    }

    /// Fail any single request that takes longer than `limit`
    ///
    /// A timed-out request counts as a failure of its sub-batch and is
    /// retried like any other error.
    pub fn with_request_timeout(mut self, limit: Duration) -> Self {
        self.request_timeout = Some(limit);
        self
    }

    /// Report progress after every chunk
    pub fn with_progress(
        mut self,
        on_progress: impl Fn(ProgressSummary<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.on_progress = Some(Arc::new(on_progress));
        self
    }

    /// The scheduler pacing in use
    pub fn batch_config(&self) -> &BatchConfig {
        &self.config
    }

    async fn run<T, R, F, Fut>(
        &self,
        label: &str,
        inputs: Vec<T>,
        operation: F,
    ) -> Result<Vec<R>, RpcError>
    where
        T: Clone,
        F: Fn(T) -> Fut,
        Fut: std::future::Future<Output = Result<R, RpcError>>,
    {
        let limit = self.request_timeout;
        let operation = |input: T| {
            let request = operation(input);
            async move {
                match limit {
                    Some(limit) => timeout(limit, request)
                        .await
                        .map_err(|elapsed| RpcError::request_failed(label, elapsed))?,
                    None => request.await,
                }
            }
        };
        run_batch_with_progress(&self.config, label, inputs, operation, |progress| {
            if let Some(callback) = &self.on_progress {
                callback(progress.summary());
            }
        })
        .await
    }

    /// `eth_getBlockByNumber` for every number, optionally with full transactions
    pub async fn get_blocks(
        &self,
        numbers: Vec<u64>,
        full_transactions: bool,
    ) -> Result<Vec<Block>, RpcError> {
        self.run("blocks", numbers, |number| async move {
            let request = self
                .provider
                .get_block_by_number(BlockNumberOrTag::Number(number));
            let request = if full_transactions {
                request.full()
            } else {
                request
            };
            request
                .await
                .map_err(|e| RpcError::request_failed(format!("eth_getBlockByNumber {number}"), e))?
                .ok_or(RpcError::BlockNotFound {
                    block_number: number,
                })
        })
        .await
    }

    /// `eth_getTransactionByHash` for every hash
    pub async fn get_transactions(&self, hashes: Vec<B256>) -> Result<Vec<Transaction>, RpcError> {
        self.run("transactions", hashes, |hash| async move {
            self.provider
                .get_transaction_by_hash(hash)
                .await
                .map_err(|e| RpcError::request_failed(format!("eth_getTransactionByHash {hash}"), e))?
                .ok_or_else(|| RpcError::transaction_not_found(hash))
        })
        .await
    }

    /// `eth_getTransactionReceipt` for every hash
    pub async fn get_receipts(
        &self,
        hashes: Vec<B256>,
    ) -> Result<Vec<TransactionReceipt>, RpcError> {
        self.run("receipts", hashes, |hash| async move {
            self.provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| {
                    RpcError::request_failed(format!("eth_getTransactionReceipt {hash}"), e)
                })?
                .ok_or_else(|| RpcError::receipt_not_found(hash))
        })
        .await
    }

    /// `eth_getBlockReceipts` for every block number
    pub async fn get_block_receipts(
        &self,
        numbers: Vec<u64>,
    ) -> Result<Vec<Vec<TransactionReceipt>>, RpcError> {
        self.run("block receipts", numbers, |number| async move {
            self.provider
                .get_block_receipts(BlockId::number(number))
                .await
                .map_err(|e| RpcError::request_failed(format!("eth_getBlockReceipts {number}"), e))?
                .ok_or(RpcError::BlockNotFound {
                    block_number: number,
                })
        })
        .await
    }

    /// `debug_traceTransaction` with the call tracer, for every hash
    ///
    /// Traces are returned as the node's JSON call frames.
    pub async fn get_transaction_traces(&self, hashes: Vec<B256>) -> Result<Vec<Value>, RpcError> {
        self.run("transaction traces", hashes, |hash| async move {
            let trace: Value = self
                .provider
                .raw_request(
                    "debug_traceTransaction".into(),
                    (hash, json!({ "tracer": "callTracer" })),
                )
                .await
                .map_err(|e| RpcError::request_failed(format!("debug_traceTransaction {hash}"), e))?;
            if trace.is_null() {
                return Err(RpcError::transaction_not_found(hash));
            }
            Ok(trace)
        })
        .await
    }

    /// `debug_traceBlockByNumber` with the call tracer, for every block number
    pub async fn get_block_traces(&self, numbers: Vec<u64>) -> Result<Vec<Value>, RpcError> {
        self.run("block traces", numbers, |number| async move {
            let traces: Value = self
                .provider
                .raw_request(
                    "debug_traceBlockByNumber".into(),
                    (
                        BlockNumberOrTag::Number(number),
                        json!({ "tracer": "callTracer" }),
                    ),
                )
                .await
                .map_err(|e| {
                    RpcError::request_failed(format!("debug_traceBlockByNumber {number}"), e)
                })?;
            if traces.is_null() {
                return Err(RpcError::BlockNotFound {
                    block_number: number,
                });
            }
            Ok(traces)
        })
        .await
    }

    /// `eth_getLogs` over `[from_block, to_block]`, one request per events-range partition
    ///
    /// The filter's own block range is replaced per partition; its addresses
    /// and topics are passed through, so a multi-address filter stays one
    /// request per partition. Logs come back partition by partition, newest
    /// partition first when the batch config is reversed.
    pub async fn get_logs(
        &self,
        filter: &Filter,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Log>, RpcError> {
        let partitions = partition_block_range(
            from_block,
            to_block,
            self.events_range.as_u64(),
            self.config.reverse,
        )?;
        let span = spans::fetch_logs(from_block, to_block, partitions.len());

        async move {
            let per_partition = self
                .run("logs", partitions, |range| async move {
                    let partition_filter = filter
                        .clone()
                        .from_block(range.from_block)
                        .to_block(range.to_block);
                    let logs = self
                        .provider
                        .get_logs(&partition_filter)
                        .await
                        .map_err(|e| RpcError::get_logs_failed(range.from_block, range.to_block, e))?;
                    debug!(range = %range, logs = logs.len(), "Fetched logs for partition");
                    Ok(logs)
                })
                .await?;

            let logs: Vec<Log> = per_partition.into_iter().flatten().collect();
            info!(logs = logs.len(), "Finished log fetch");
            Ok(logs)
        }
        .instrument(span)
        .await
    }

    /// `eth_getStorageAt` of `address` for every slot
    pub async fn get_storage_at(
        &self,
        address: Address,
        slots: Vec<U256>,
    ) -> Result<Vec<U256>, RpcError> {
        self.run("storage", slots, |slot| async move {
            self.provider
                .get_storage_at(address, slot)
                .await
                .map_err(|e| RpcError::request_failed(format!("eth_getStorageAt {address} {slot}"), e))
        })
        .await
    }

    /// Find the first index in `indices` whose storage slot holds a non-zero value
    ///
    /// `slot_for_index` maps an index to the storage key to probe. The range
    /// is scanned one partition (of one scheduler chunk) at a time, so the
    /// search stops shortly after the first hit.
    pub async fn find_storage_slot<F>(
        &self,
        address: Address,
        indices: RangeInclusive<u64>,
        slot_for_index: F,
    ) -> Result<Option<StorageHit>, RpcError>
    where
        F: Fn(u64) -> U256,
    {
        let width = self.config.chunk_size() as u64;
        let partitions = partition_index_range(&indices, width)?;
        let span = spans::find_storage_slot(address, *indices.start(), *indices.end());

        async move {
            let last = partitions.len().saturating_sub(1);
            for (position, partition) in partitions.into_iter().enumerate() {
                let started = Instant::now();
                let probes: Vec<u64> = partition.collect();
                let values = self
                    .run("storage slot search", probes.clone(), |index| {
                        let slot = slot_for_index(index);
                        async move {
                            self.provider.get_storage_at(address, slot).await.map_err(|e| {
                                RpcError::request_failed(format!("eth_getStorageAt {address} {slot}"), e)
                            })
                        }
                    })
                    .await?;

                if let Some(found) = values.iter().position(|value| !value.is_zero()) {
                    let index = probes[found];
                    info!(index, "Found non-zero storage slot");
                    return Ok(Some(StorageHit {
                        index,
                        slot: slot_for_index(index),
                        value: values[found],
                    }));
                }

                if position < last {
                    pace(self.config.delays, started).await;
                }
            }

            debug!("No non-zero storage slot in range");
            Ok(None)
        }
        .instrument(span)
        .await
    }

    /// Locate the `balanceOf` mapping of a Solidity ERC-20
    ///
    /// Probes declaration slots `0..=max_slot` for `holder`'s entry and
    /// returns the first one holding a non-zero value. `holder` should have a
    /// non-zero balance.
    pub async fn find_balance_slot(
        &self,
        token: Address,
        holder: Address,
        max_slot: u64,
    ) -> Result<Option<StorageHit>, RpcError> {
        self.find_storage_slot(token, 0..=max_slot, |index| {
            mapping_slot(holder, U256::from(index))
        })
        .await
    }
}

async fn pace(delays: Duration, started: Instant) {
    let remaining = delays.saturating_sub(started.elapsed());
    if !remaining.is_zero() {
        sleep(remaining).await;
    }
}
