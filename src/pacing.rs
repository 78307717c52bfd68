//! Pacing delays between turn steps.

use tokio::time::{Duration, sleep};
use tracing::trace;

/// A fixed pause inserted so the display can settle between steps.
///
/// Pauses never affect correctness; they only space out what the user sees.
#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    /// Waits for one pacing interval.
    async fn pause(&self);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy)]
pub struct SleepPacer {
    duration: Duration,
}

impl SleepPacer {
    /// Creates a pacer pausing for `duration`.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Creates a pacer pausing for `millis` milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

#[async_trait::async_trait]
impl Pacer for SleepPacer {
    async fn pause(&self) {
        trace!(duration_ms = self.duration.as_millis() as u64, "Pacing");
        sleep(self.duration).await;
    }
}

/// Returns immediately. Used by tests and when pacing is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait::async_trait]
impl Pacer for NoPacing {
    async fn pause(&self) {}
}
