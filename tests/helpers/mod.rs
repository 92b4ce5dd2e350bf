// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for ethopt integration tests
//!
//! Mock implementations of the queue's seams so aggregation can be tested
//! without a node.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::Bytes;
use alloy_sol_types::{Revert, SolError};
use alloy_transport::{TransportError, TransportErrorKind};
use async_trait::async_trait;
use ethopt::contracts::Multicall3;
use ethopt::{AggregateTransport, DeferredTimer};
use futures::future::BoxFuture;
use tokio::sync::oneshot;

/// Route library logs to the test harness, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Calldata of the `n`th test call
pub fn calldata(n: u8) -> Bytes {
    Bytes::from(vec![n])
}

/// Mock aggregator that echoes each leg's calldata back as its return data
///
/// Every invocation is recorded. Behaviour can be tuned per test:
///
/// ```rust,ignore
/// let mock = MockAggregator::new().with_failing_leg(calldata(3));
/// let queue = MulticallQueue::new(mock.clone(), MulticallConfig::default());
/// ```
#[derive(Clone, Default)]
pub struct MockAggregator {
    invocations: Arc<Mutex<Vec<Vec<Multicall3::Call3>>>>,
    failing_legs: Vec<Bytes>,
    transport_error: Option<String>,
    poisoned_leg: Option<Bytes>,
    drop_last_result: bool,
    latency: Option<Duration>,
    panics_left: Arc<Mutex<usize>>,
}

impl MockAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Legs with this calldata report `success: false` with a revert reason
    pub fn with_failing_leg(mut self, calldata: Bytes) -> Self {
        self.failing_legs.push(calldata);
        self
    }

    /// Every invocation fails at the transport level
    pub fn with_transport_error(mut self, message: &str) -> Self {
        self.transport_error = Some(message.to_string());
        self
    }

    /// Invocations containing a leg with this calldata fail at the transport level
    pub fn with_poisoned_leg(mut self, calldata: Bytes) -> Self {
        self.poisoned_leg = Some(calldata);
        self
    }

    /// Every invocation returns one result fewer than it was given
    pub fn with_missing_result(mut self) -> Self {
        self.drop_last_result = true;
        self
    }

    /// The next `count` invocations panic instead of answering
    pub fn with_panics(self, count: usize) -> Self {
        *self.panics_left.lock().unwrap() = count;
        self
    }

    /// Each invocation takes `latency` on the tokio clock
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of aggregate invocations so far
    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    /// Leg count of each invocation, in call order
    pub fn invocation_sizes(&self) -> Vec<usize> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(Vec::len)
            .collect()
    }
}

#[async_trait]
impl AggregateTransport for MockAggregator {
    async fn aggregate(
        &self,
        calls: Vec<Multicall3::Call3>,
    ) -> Result<Vec<Multicall3::Result>, TransportError> {
        self.invocations.lock().unwrap().push(calls.clone());

        {
            let mut panics_left = self.panics_left.lock().unwrap();
            if *panics_left > 0 {
                *panics_left -= 1;
                drop(panics_left);
                panic!("aggregator blew up");
            }
        }

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(message) = &self.transport_error {
            return Err(TransportErrorKind::custom_str(message));
        }
        if let Some(poisoned) = &self.poisoned_leg {
            if calls.iter().any(|call| &call.callData == poisoned) {
                return Err(TransportErrorKind::custom_str("poisoned invocation"));
            }
        }

        let mut results: Vec<_> = calls
            .into_iter()
            .map(|call| {
                if self.failing_legs.contains(&call.callData) {
                    Multicall3::Result {
                        success: false,
                        returnData: Revert::from("leg failed").abi_encode().into(),
                    }
                } else {
                    Multicall3::Result {
                        success: true,
                        returnData: call.callData,
                    }
                }
            })
            .collect();

        if self.drop_last_result {
            results.pop();
        }
        Ok(results)
    }
}

/// Timer whose delays complete only when [`ManualTimer::fire`] is called
#[derive(Clone, Default)]
pub struct ManualTimer {
    waiters: Arc<Mutex<Vec<oneshot::Sender<()>>>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of delays currently waiting
    pub fn waiting(&self) -> usize {
        self.waiters.lock().unwrap().len()
    }

    /// Complete every waiting delay
    pub fn fire(&self) {
        for waiter in self.waiters.lock().unwrap().drain(..) {
            let _ = waiter.send(());
        }
    }

    /// Yield until at least one delay is waiting
    pub async fn wait_armed(&self) {
        while self.waiting() == 0 {
            tokio::task::yield_now().await;
        }
    }
}

impl DeferredTimer for ManualTimer {
    fn delay(&self, _duration: Duration) -> BoxFuture<'static, ()> {
        let (sender, receiver) = oneshot::channel();
        self.waiters.lock().unwrap().push(sender);
        Box::pin(async move {
            let _ = receiver.await;
        })
    }
}
