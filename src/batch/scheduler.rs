// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Rate-limited batch request scheduler
//!
//! Inputs are processed in outer chunks of `concurrency_size × batch_size`
//! items. Chunks run strictly one after another and each takes at least
//! `delays`. Within a chunk, sub-batches of `batch_size` items start
//! `stagger` apart and run concurrently, as do the items inside them. A
//! sub-batch is the retry unit: if any of its items fails, all of them are
//! run again after `retry_on`, up to `retry_max` more times.
//!
//! # Example
//!
//! ```rust,ignore
//! use ethopt::{run_batch, BatchConfig};
//!
//! let config = BatchConfig::from_rate_limit(10.0, 5, Duration::from_secs(1))?;
//! let balances = run_batch(&config, "balances", holders, |holder| async move {
//!     provider.get_balance(holder).await
//! })
//! .await?;
//! ```

use std::fmt::Display;
use std::future::Future;

use futures::future::try_join_all;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn, Instrument};

use crate::config::BatchConfig;
use crate::tracing::spans;

/// Progress report passed to the callback after every outer chunk
#[derive(Debug)]
pub struct BatchProgress<'a, T, R> {
    /// Label of the batch run (e.g. `"blocks"`)
    pub label: &'a str,
    /// Items completed so far, including this chunk
    pub processed: usize,
    /// Total number of items in the run
    pub total: usize,
    /// Zero-based index of the chunk that just completed
    pub chunk_index: usize,
    /// Number of chunks in the run
    pub chunk_count: usize,
    /// Inputs of the chunk that just completed
    pub inputs: &'a [T],
    /// Results of the chunk that just completed, aligned with `inputs`
    pub results: &'a [R],
}

impl<T, R> BatchProgress<'_, T, R> {
    /// The counters of this report, without the chunk data
    pub fn summary(&self) -> ProgressSummary<'_> {
        ProgressSummary {
            label: self.label,
            processed: self.processed,
            total: self.total,
            chunk_index: self.chunk_index,
            chunk_count: self.chunk_count,
        }
    }
}

/// Type-erased counters of a [`BatchProgress`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary<'a> {
    /// Label of the batch run
    pub label: &'a str,
    /// Items completed so far
    pub processed: usize,
    /// Total number of items
    pub total: usize,
    /// Zero-based index of the chunk that just completed
    pub chunk_index: usize,
    /// Number of chunks in the run
    pub chunk_count: usize,
}

/// Run `operation` over every input and return the results in input order
///
/// See [`run_batch_with_progress`].
pub async fn run_batch<T, R, E, F, Fut>(
    config: &BatchConfig,
    label: &str,
    inputs: Vec<T>,
    operation: F,
) -> Result<Vec<R>, E>
where
    T: Clone,
    E: Display,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    run_batch_with_progress(config, label, inputs, operation, |_| {}).await
}

/// Run `operation` over every input, reporting progress after each outer chunk
///
/// Results are returned in input order regardless of completion order.
///
/// # Errors
///
/// When a sub-batch still fails after `retry_max` retries, the last error
/// from that sub-batch is returned as is and no further chunks start.
/// Results of earlier chunks are discarded.
pub async fn run_batch_with_progress<T, R, E, F, Fut, G>(
    config: &BatchConfig,
    label: &str,
    inputs: Vec<T>,
    operation: F,
    mut on_progress: G,
) -> Result<Vec<R>, E>
where
    T: Clone,
    E: Display,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    G: FnMut(BatchProgress<'_, T, R>),
{
    let total = inputs.len();
    let chunk_size = config.chunk_size();
    let batch_size = config.batch_size.max(1);
    let chunk_count = total.div_ceil(chunk_size);

    let span = spans::run_batch(label, total, chunk_count);

    async move {
        info!(
            concurrency_size = config.concurrency_size,
            batch_size,
            delay_ms = config.delays.as_millis(),
            "Starting batch run"
        );

        let mut results = Vec::with_capacity(total);

        for (chunk_index, chunk) in inputs.chunks(chunk_size).enumerate() {
            let started = Instant::now();

            let sub_batches = chunk
                .chunks(batch_size)
                .enumerate()
                .map(|(position, items)| run_sub_batch(config, &operation, position, items));
            let chunk_results: Vec<R> = try_join_all(sub_batches)
                .await?
                .into_iter()
                .flatten()
                .collect();

            let processed = results.len() + chunk_results.len();
            debug!(chunk_index, processed, total, "Chunk completed");
            on_progress(BatchProgress {
                label,
                processed,
                total,
                chunk_index,
                chunk_count,
                inputs: chunk,
                results: &chunk_results,
            });
            results.extend(chunk_results);

            if chunk_index + 1 < chunk_count {
                let remaining = config.delays.saturating_sub(started.elapsed());
                if !remaining.is_zero() {
                    debug!(wait_ms = remaining.as_millis(), "Pacing before next chunk");
                    sleep(remaining).await;
                }
            }
        }

        info!(total, "Batch run completed");
        Ok::<_, E>(results)
    }
    .instrument(span)
    .await
}

/// Run one sub-batch, retrying it as a unit
async fn run_sub_batch<T, R, E, F, Fut>(
    config: &BatchConfig,
    operation: &F,
    position: usize,
    items: &[T],
) -> Result<Vec<R>, E>
where
    T: Clone,
    E: Display,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    if position > 0 {
        let offset = config
            .stagger
            .saturating_mul(u32::try_from(position).unwrap_or(u32::MAX));
        sleep(offset).await;
    }

    let mut attempt = 0usize;
    loop {
        match try_join_all(items.iter().cloned().map(operation)).await {
            Ok(results) => {
                if attempt > 0 {
                    debug!(position, attempt, "Sub-batch succeeded after retry");
                }
                return Ok(results);
            }
            Err(error) => {
                if attempt >= config.retry_max {
                    warn!(
                        error = %error,
                        position,
                        attempts = attempt + 1,
                        "Sub-batch retries exhausted"
                    );
                    return Err(error);
                }

                attempt += 1;
                warn!(
                    error = %error,
                    position,
                    attempt,
                    retry_max = config.retry_max,
                    delay_ms = config.retry_on.as_millis(),
                    "Sub-batch failed, retrying"
                );
                sleep(config.retry_on).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn fast_config(concurrency_size: usize, batch_size: usize) -> BatchConfig {
        BatchConfig::builder()
            .concurrency_size(concurrency_size)
            .batch_size(batch_size)
            .delays(Duration::ZERO)
            .retry_on(Duration::ZERO)
            .stagger(Duration::ZERO)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_input() {
        let results: Vec<u32> =
            run_batch(&fast_config(2, 2), "empty", Vec::<u32>::new(), |n| async move {
                Ok::<_, String>(n)
            })
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_results_follow_input_order() {
        let inputs: Vec<u64> = (0..23).collect();
        let results = run_batch(&fast_config(2, 3), "squares", inputs, |n| async move {
            tokio::task::yield_now().await;
            Ok::<_, String>(n * n)
        })
        .await
        .unwrap();
        assert_eq!(results, (0..23).map(|n| n * n).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_progress_reports_every_chunk() {
        let mut reports = Vec::new();
        run_batch_with_progress(
            &fast_config(2, 2),
            "progress",
            (0..9).collect::<Vec<u32>>(),
            |n| async move { Ok::<_, String>(n) },
            |progress| {
                reports.push((
                    progress.chunk_index,
                    progress.processed,
                    progress.inputs.to_vec(),
                    progress.results.to_vec(),
                ));
                assert_eq!(progress.label, "progress");
                assert_eq!(progress.total, 9);
                assert_eq!(progress.chunk_count, 3);
            },
        )
        .await
        .unwrap();

        assert_eq!(
            reports,
            vec![
                (0, 4, vec![0, 1, 2, 3], vec![0, 1, 2, 3]),
                (1, 8, vec![4, 5, 6, 7], vec![4, 5, 6, 7]),
                (2, 9, vec![8], vec![8]),
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_item_retries_whole_sub_batch() {
        let calls = AtomicUsize::new(0);
        let failures = AtomicUsize::new(0);
        let config = BatchConfig::builder()
            .concurrency_size(1)
            .batch_size(3)
            .retry_max(2)
            .delays(Duration::ZERO)
            .retry_on(Duration::ZERO)
            .build()
            .unwrap();

        let results = run_batch(&config, "retry", vec![1u32, 2, 3], |n| {
            let calls = &calls;
            let failures = &failures;
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if n == 3 && failures.fetch_add(1, Ordering::SeqCst) < 1 {
                    return Err("flaky".to_string());
                }
                Ok(n)
            }
        })
        .await
        .unwrap();

        assert_eq!(results, vec![1, 2, 3]);
        // The first attempt ran all three items, the retry ran all three again
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }
}
