//! Tower layer that logs each JSON-RPC request with its latency.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument};

/// A Tower layer that wraps every RPC request in a `rpc_call` span.
///
/// Method names and latency are logged at DEBUG, payloads at TRACE when
/// enabled, failures at WARN. Requests slower than the optional threshold
/// are also logged at WARN.
#[derive(Clone, Debug, Default)]
pub struct LoggingLayer {
    log_payloads: bool,
    slow_threshold: Option<Duration>,
}

impl LoggingLayer {
    /// Log method names, latency and errors only
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log request and response payloads at TRACE
    pub fn with_payloads(mut self) -> Self {
        self.log_payloads = true;
        self
    }

    /// Warn about requests slower than `threshold`
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            service,
            log_payloads: self.log_payloads,
            slow_threshold: self.slow_threshold,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Clone, Debug)]
pub struct LoggingService<S> {
    service: S,
    log_payloads: bool,
    slow_threshold: Option<Duration>,
}

impl<S> tower::Service<RequestPacket> for LoggingService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let log_payloads = self.log_payloads;
        let slow_threshold = self.slow_threshold;
        let mut service = self.service.clone();

        let method = describe(&request);
        let span = tracing::info_span!(
            "rpc_call",
            method = %method,
            duration_ms = tracing::field::Empty,
        );

        Box::pin(
            async move {
                if log_payloads {
                    trace!(request = ?request, "RPC request");
                }

                let start = Instant::now();
                let result = service.call(request).await;
                let elapsed = start.elapsed();
                tracing::Span::current().record("duration_ms", elapsed.as_millis() as u64);

                match &result {
                    Ok(response) => {
                        if log_payloads {
                            trace!(response = ?response, "RPC response");
                        }
                        if is_slow(elapsed, slow_threshold) {
                            warn!(duration_ms = elapsed.as_millis() as u64, "Slow RPC: {method}");
                        } else {
                            debug!(duration_ms = elapsed.as_millis() as u64, "RPC: {method}");
                        }
                    }
                    Err(error) => {
                        warn!(
                            error = %error,
                            duration_ms = elapsed.as_millis() as u64,
                            "RPC error: {method}"
                        );
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

fn is_slow(elapsed: Duration, threshold: Option<Duration>) -> bool {
    threshold.is_some_and(|threshold| elapsed > threshold)
}

/// Method name of a single request, or `batch[n]` for a JSON-RPC batch.
fn describe(request: &RequestPacket) -> String {
    match request {
        RequestPacket::Single(req) => req.method().to_string(),
        RequestPacket::Batch(reqs) if reqs.len() == 1 => reqs[0].method().to_string(),
        RequestPacket::Batch(reqs) => format!("batch[{}]", reqs.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_settings() {
        let layer = LoggingLayer::new();
        assert!(!layer.log_payloads);
        assert!(layer.slow_threshold.is_none());

        let layer = layer
            .with_payloads()
            .with_slow_threshold(Duration::from_secs(2));
        assert!(layer.log_payloads);
        assert_eq!(layer.slow_threshold, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_is_slow() {
        assert!(!is_slow(Duration::from_secs(10), None));
        assert!(!is_slow(Duration::from_secs(1), Some(Duration::from_secs(2))));
        assert!(is_slow(Duration::from_secs(3), Some(Duration::from_secs(2))));
    }

    #[test]
    fn test_describe_empty_batch() {
        assert_eq!(describe(&RequestPacket::Batch(Vec::new())), "batch[0]");
    }
}
