//! Deferred timer used to close aggregation windows

use std::time::Duration;

use futures::future::BoxFuture;

/// Single-shot deferred timer
///
/// The queue asks for one delay per window (and one per staggered chunk).
/// Production code uses [`TokioTimer`]; tests can substitute a timer that
/// fires only when told to, so window boundaries are deterministic.
pub trait DeferredTimer: Send + Sync + 'static {
    /// Returns a future that completes once `duration` has elapsed.
    fn delay(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// [`DeferredTimer`] backed by `tokio::time::sleep`
///
/// Honours tokio's paused clock, so `#[tokio::test(start_paused = true)]`
/// advances windows virtually.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl DeferredTimer for TokioTimer {
    fn delay(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_follows_virtual_clock() {
        let start = tokio::time::Instant::now();
        TokioTimer.delay(Duration::from_millis(30)).await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
