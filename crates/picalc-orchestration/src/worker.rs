//! Worker loop: step, check stop triggers, publish at a bounded rate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{error, info};

use picalc_core::progress::{CancellationToken, Deadline};
use picalc_core::{RunResult, SeriesEvaluator, Snapshot, SnapshotObserver, StopReason};

use crate::snapshot_cell::SnapshotCell;

/// Hand-over slot for the single `RunResult` of a run.
pub(crate) enum ResultSlot {
    Pending,
    Ready(RunResult),
    Taken,
}

/// State shared between the worker and the supervisor handle.
pub(crate) struct Shared {
    pub(crate) cell: SnapshotCell,
    pub(crate) cancel: CancellationToken,
    pub(crate) outcome: Mutex<ResultSlot>,
    pub(crate) stopped: Condvar,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            cell: SnapshotCell::new(),
            cancel: CancellationToken::new(),
            outcome: Mutex::new(ResultSlot::Pending),
            stopped: Condvar::new(),
        }
    }

    /// Store the result and wake every waiter. Only the first call has an effect.
    fn finish(&self, result: RunResult) {
        let mut slot = self.outcome.lock();
        if matches!(*slot, ResultSlot::Pending) {
            *slot = ResultSlot::Ready(result);
            self.stopped.notify_all();
        }
    }
}

/// At most one publish per `interval`; the first publish is immediate.
pub(crate) struct PublishThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl PublishThrottle {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub(crate) fn is_due(&self) -> bool {
        self.last.map_or(true, |last| last.elapsed() >= self.interval)
    }

    pub(crate) fn mark(&mut self) {
        self.last = Some(Instant::now());
    }
}

/// Settles the result slot if the worker unwinds before finishing.
struct FinishGuard {
    shared: Arc<Shared>,
    deadline: Deadline,
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            return;
        }
        self.shared.cancel.cancel(StopReason::StoppedExplicitly);
        self.shared.finish(RunResult {
            snapshot: self.shared.cell.latest(),
            stop_reason: StopReason::StoppedExplicitly,
            fault: Some("worker panicked".into()),
            elapsed: self.deadline.elapsed(),
        });
    }
}

pub(crate) struct Worker {
    pub(crate) evaluator: Box<dyn SeriesEvaluator>,
    pub(crate) display_interval: Duration,
    pub(crate) deadline: Deadline,
    pub(crate) shared: Arc<Shared>,
    pub(crate) observer: Arc<dyn SnapshotObserver>,
}

impl Worker {
    pub(crate) fn run(mut self) {
        let _guard = FinishGuard {
            shared: Arc::clone(&self.shared),
            deadline: self.deadline,
        };
        let mut throttle = PublishThrottle::new(self.display_interval);

        // Stop triggers are only honored between steps, and the first step
        // always runs so every clean result carries a snapshot.
        let result = loop {
            if let Err(err) = self.evaluator.step() {
                error!(
                    algorithm = self.evaluator.name(),
                    iteration = self.evaluator.iteration(),
                    %err,
                    "Step failed, stopping"
                );
                self.shared.cancel.cancel(StopReason::StoppedExplicitly);
                break RunResult {
                    snapshot: self.shared.cell.latest(),
                    stop_reason: StopReason::StoppedExplicitly,
                    fault: Some(err.to_string()),
                    elapsed: self.deadline.elapsed(),
                };
            }

            if self.deadline.is_reached() && self.shared.cancel.cancel(StopReason::TimeLimitReached)
            {
                info!(
                    iteration = self.evaluator.iteration(),
                    "Time limit reached"
                );
            }

            if let Some(stop_reason) = self.shared.cancel.reason() {
                let snapshot = self.publish();
                break RunResult {
                    snapshot: Some(snapshot),
                    stop_reason,
                    fault: None,
                    elapsed: self.deadline.elapsed(),
                };
            }

            if throttle.is_due() {
                self.publish();
                throttle.mark();
            }
        };

        self.observer.on_finished(&result);
        self.shared.finish(result);
    }

    fn publish(&self) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot::capture(
            self.evaluator.as_ref(),
            self.deadline.elapsed(),
        ));
        if self.shared.cell.publish(Arc::clone(&snapshot)) {
            self.observer.on_snapshot(&snapshot);
        }
        snapshot
    }
}
