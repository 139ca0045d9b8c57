//! Observer pattern for snapshot publication.

use crate::snapshot::{RunResult, Snapshot};

/// Observer trait for receiving published snapshots.
///
/// Called on the worker thread right after a snapshot is published, so
/// implementations must return quickly.
pub trait SnapshotObserver: Send + Sync {
    /// Receive a newly published snapshot.
    fn on_snapshot(&self, snapshot: &Snapshot);

    /// Receive the final result once the run has stopped.
    fn on_finished(&self, _result: &RunResult) {}
}
