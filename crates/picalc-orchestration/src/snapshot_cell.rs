//! Shared "latest snapshot" cell.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use picalc_core::Snapshot;

/// Single-slot cell holding the most recently published snapshot.
///
/// Publishing swaps an `Arc` under the lock, so readers never observe a
/// partially written snapshot. Snapshots that would move `iteration` or
/// `precision_digits` backwards are rejected.
#[derive(Default)]
pub struct SnapshotCell {
    latest: Mutex<Option<Arc<Snapshot>>>,
}

impl SnapshotCell {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot. Returns `false` if it would regress.
    pub fn publish(&self, snapshot: Arc<Snapshot>) -> bool {
        let mut latest = self.latest.lock();
        if let Some(current) = latest.as_ref() {
            if !snapshot.is_at_least(current) {
                warn!(
                    current = current.iteration,
                    rejected = snapshot.iteration,
                    "Refusing to publish a regressing snapshot"
                );
                return false;
            }
        }
        *latest = Some(snapshot);
        true
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest.lock().clone()
    }
}
