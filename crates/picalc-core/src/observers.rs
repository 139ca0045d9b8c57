//! Concrete observer implementations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{info, warn};

use crate::observer::SnapshotObserver;
use crate::snapshot::{RunResult, Snapshot};

/// Observer that forwards snapshots through a channel (non-blocking).
pub struct ChannelObserver {
    sender: Sender<Arc<Snapshot>>,
}

impl ChannelObserver {
    /// Create a new channel observer.
    #[must_use]
    pub fn new(sender: Sender<Arc<Snapshot>>) -> Self {
        Self { sender }
    }
}

impl SnapshotObserver for ChannelObserver {
    fn on_snapshot(&self, snapshot: &Snapshot) {
        // A full or disconnected channel drops the update.
        let _ = self.sender.try_send(Arc::new(snapshot.clone()));
    }
}

/// Observer that logs snapshots with temporal throttling.
pub struct LoggingObserver {
    min_interval_ms: u64,
    last_time: AtomicU64,
}

impl LoggingObserver {
    /// Create a new logging observer with the given minimum interval.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_time: AtomicU64::new(0),
        }
    }
}

impl SnapshotObserver for LoggingObserver {
    #[allow(clippy::cast_possible_truncation)]
    fn on_snapshot(&self, snapshot: &Snapshot) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let last_time = self.last_time.load(Ordering::Relaxed);
        if now.saturating_sub(last_time) < self.min_interval_ms {
            return;
        }
        self.last_time.store(now, Ordering::Relaxed);

        info!(
            iteration = snapshot.iteration,
            precision = snapshot.precision_digits,
            elapsed_secs = snapshot.elapsed.as_secs_f64(),
            "Snapshot published"
        );
    }

    fn on_finished(&self, result: &RunResult) {
        if let Some(fault) = &result.fault {
            warn!(%fault, "Calculation stopped by an arithmetic fault");
            return;
        }
        info!(
            reason = %result.stop_reason,
            iterations = result.snapshot.as_ref().map_or(0, |s| s.iteration),
            precision = result.snapshot.as_ref().map_or(0, |s| s.precision_digits),
            "Calculation complete"
        );
    }
}

/// Null object pattern — does nothing with snapshots.
pub struct NoOpObserver;

impl NoOpObserver {
    /// Create a new no-op observer that discards all snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotObserver for NoOpObserver {
    fn on_snapshot(&self, _snapshot: &Snapshot) {}
}
