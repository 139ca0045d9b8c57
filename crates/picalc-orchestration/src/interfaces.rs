//! Presentation interface consumed by the monitor loop.

use picalc_core::{RunResult, Snapshot};

/// Trait for presenting snapshots and results to the user.
pub trait SnapshotPresenter: Send + Sync {
    /// Present a live snapshot.
    fn present_snapshot(&self, snapshot: &Snapshot);

    /// Present the final result.
    fn present_result(&self, result: &RunResult);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Null presenter (does nothing).
pub struct NullPresenter;

impl SnapshotPresenter for NullPresenter {
    fn present_snapshot(&self, _snapshot: &Snapshot) {}
    fn present_result(&self, _result: &RunResult) {}
    fn present_error(&self, _error: &str) {}
}
