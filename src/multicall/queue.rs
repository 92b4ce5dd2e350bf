//! Debounced multicall aggregation queue
//!
//! Calls registered within one window are drained together into as few
//! `aggregate3` invocations as `max_count` allows. The queue moves through
//! `Idle -> Armed -> Draining` and back to `Idle`, or straight to `Armed`
//! again when calls arrived while it was draining.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use alloy_primitives::{Address, Bytes};
use futures::future::try_join_all;
use futures::FutureExt;
use tokio::sync::oneshot;
use tracing::{debug, warn, Instrument};

use super::pending::{CallResult, PendingCall, SettlementState};
use super::timer::{DeferredTimer, TokioTimer};
use super::transport::AggregateTransport;
use crate::config::MulticallConfig;
use crate::contracts::multicall3::call3;
use crate::errors::{DrainError, MulticallError};
use crate::tracing::spans;

/// Window state of a [`MulticallQueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueuePhase {
    /// No window open, nothing queued
    Idle,
    /// A window timer is pending
    Armed,
    /// A drain is in flight; new calls wait for the next window
    Draining,
}

#[derive(Debug)]
struct QueueState {
    phase: QueuePhase,
    pending: Vec<PendingCall>,
    next_id: u64,
}

struct Inner<A, T> {
    transport: A,
    timer: T,
    config: MulticallConfig,
    state: Mutex<QueueState>,
}

/// Coalesces read calls into `aggregate3` invocations
///
/// One queue belongs to one provider; cloning the queue shares it.
///
/// # Examples
///
/// ```rust,ignore
/// use ethopt::{MulticallConfig, MulticallQueue, ProviderAggregator};
///
/// let queue = MulticallQueue::new(
///     ProviderAggregator::new(provider, config.aggregator),
///     MulticallConfig::default(),
/// );
/// let (a, b) = (queue.enqueue_call(token, name_calldata), queue.enqueue_call(token, symbol_calldata));
/// // Both legs travel in the same aggregate call
/// let (a, b) = futures::try_join!(a, b)?;
/// ```
pub struct MulticallQueue<A, T = TokioTimer> {
    inner: Arc<Inner<A, T>>,
}

impl<A, T> Clone for MulticallQueue<A, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> MulticallQueue<A, TokioTimer>
where
    A: AggregateTransport,
{
    /// Create a queue that closes windows on the tokio clock
    pub fn new(transport: A, config: MulticallConfig) -> Self {
        Self::with_timer(transport, config, TokioTimer)
    }
}

impl<A, T> MulticallQueue<A, T>
where
    A: AggregateTransport,
    T: DeferredTimer,
{
    /// Create a queue with a custom window timer
    pub fn with_timer(transport: A, config: MulticallConfig, timer: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                timer,
                config,
                state: Mutex::new(QueueState {
                    phase: QueuePhase::Idle,
                    pending: Vec::new(),
                    next_id: 0,
                }),
            }),
        }
    }

    /// Queue settings
    pub fn config(&self) -> &MulticallConfig {
        &self.inner.config
    }

    /// Current window state
    pub fn phase(&self) -> QueuePhase {
        self.inner.lock_state().phase
    }

    /// Number of calls waiting for the next drain
    pub fn pending_len(&self) -> usize {
        self.inner.lock_state().pending.len()
    }

    /// Register a read call for the current window
    ///
    /// The call joins the window as soon as this returns; the handle only
    /// waits for settlement. The first call into an idle queue arms the
    /// window timer, so this must be called from within a tokio runtime.
    ///
    /// The handle resolves to the leg's `{success, data}`. It fails only when
    /// the whole drain failed, in which case every call of that drain fails
    /// with the same [`DrainError`].
    pub fn enqueue_call(&self, target: Address, calldata: Bytes) -> CallHandle {
        let (settler, receiver) = oneshot::channel();

        let arm = {
            let mut state = self.inner.lock_state();
            let id = state.next_id;
            state.next_id += 1;
            state
                .pending
                .push(PendingCall::new(id, target, calldata, settler));

            if state.phase == QueuePhase::Idle {
                state.phase = QueuePhase::Armed;
                true
            } else {
                false
            }
        };

        if arm {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move { inner.run_windows().await });
        }

        CallHandle { receiver }
    }
}

impl<A, T> Inner<A, T>
where
    A: AggregateTransport,
    T: DeferredTimer,
{
    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait out each window and drain it, until a drain finds the queue empty.
    async fn run_windows(self: Arc<Self>) {
        loop {
            self.timer.delay(self.config.stall_time).await;

            let mut claimed = {
                let mut state = self.lock_state();
                state.phase = QueuePhase::Draining;
                std::mem::take(&mut state.pending)
            };

            if !claimed.is_empty() {
                // A panicking transport must not leave the queue stuck in Draining.
                let drained = AssertUnwindSafe(self.drain(&mut claimed))
                    .catch_unwind()
                    .await;
                if drained.is_err() {
                    warn!(calls = claimed.len(), "Multicall drain panicked, rejecting unsettled calls");
                    for call in claimed
                        .iter_mut()
                        .filter(|call| call.state() == SettlementState::Pending)
                    {
                        call.reject(DrainError::Aborted);
                    }
                }
            }

            let rearm = {
                let mut state = self.lock_state();
                if state.pending.is_empty() {
                    state.phase = QueuePhase::Idle;
                    false
                } else {
                    state.phase = QueuePhase::Armed;
                    true
                }
            };
            if !rearm {
                break;
            }
        }
    }

    async fn drain(&self, claimed: &mut [PendingCall]) {
        let max_count = self.config.max_count.max(1);
        let chunk_count = claimed.len().div_ceil(max_count);
        let span = spans::multicall_drain(claimed.len(), chunk_count);

        let chunks = claimed.chunks(max_count).enumerate().map(|(index, chunk)| {
            let legs: Vec<_> = chunk
                .iter()
                .map(|call| {
                    call3(
                        call.target,
                        call.calldata.clone(),
                        self.config.allow_failure,
                    )
                })
                .collect();
            self.run_chunk(index, legs)
        });

        let outcome = try_join_all(chunks).instrument(span).await;

        match outcome {
            Ok(results) => {
                for (call, leg) in claimed.iter_mut().zip(results.into_iter().flatten()) {
                    call.fulfill(leg);
                }
            }
            Err(error) => {
                warn!(calls = claimed.len(), error = %error, "Multicall drain failed, rejecting every call");
                for call in claimed.iter_mut() {
                    call.reject(error.clone());
                }
            }
        }
    }

    async fn run_chunk(
        &self,
        index: usize,
        legs: Vec<crate::contracts::Multicall3::Call3>,
    ) -> Result<Vec<CallResult>, DrainError> {
        if index > 0 {
            let offset = self
                .config
                .chunk_stagger
                .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
            self.timer.delay(offset).await;
        }

        let expected = legs.len();
        debug!(chunk = index, legs = expected, "Sending aggregate3");
        let results = self.transport.aggregate(legs).await?;
        if results.len() != expected {
            return Err(DrainError::ResultCountMismatch {
                expected,
                actual: results.len(),
            });
        }

        Ok(results
            .into_iter()
            .map(|result| CallResult {
                success: result.success,
                data: result.returnData,
            })
            .collect())
    }
}

/// Settlement future returned by [`MulticallQueue::enqueue_call`]
#[derive(Debug)]
#[must_use = "the call result is lost unless the handle is awaited"]
pub struct CallHandle {
    receiver: oneshot::Receiver<Result<CallResult, DrainError>>,
}

impl Future for CallHandle {
    type Output = Result<CallResult, MulticallError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|settled| match settled {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(error)) => Err(error.into()),
            Err(_) => Err(MulticallError::QueueClosed),
        })
    }
}
