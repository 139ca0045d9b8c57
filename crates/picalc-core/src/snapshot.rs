//! Published snapshots and the final run result.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::evaluator::SeriesEvaluator;

/// Immutable point-in-time view of the best current estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Estimate truncated to `precision_digits` significant digits.
    pub digits: String,
    /// Terms folded when the snapshot was captured.
    pub iteration: u64,
    /// Working precision when the snapshot was captured.
    pub precision_digits: u64,
    /// Time since the run started.
    pub elapsed: Duration,
    /// Wall-clock capture time.
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    /// Capture the evaluator's current estimate.
    #[must_use]
    pub fn capture(evaluator: &dyn SeriesEvaluator, elapsed: Duration) -> Self {
        Self {
            digits: evaluator.render(),
            iteration: evaluator.iteration(),
            precision_digits: evaluator.precision_digits(),
            elapsed,
            captured_at: Utc::now(),
        }
    }

    /// Whether this snapshot is at least as advanced as `other`.
    #[must_use]
    pub fn is_at_least(&self, other: &Snapshot) -> bool {
        self.iteration >= other.iteration && self.precision_digits >= other.precision_digits
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StopReason {
    /// The configured time limit elapsed.
    TimeLimitReached,
    /// An external cancellation signal (Ctrl+C) arrived.
    Interrupted,
    /// The owning process requested the stop, or an arithmetic fault forced it.
    StoppedExplicitly,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TimeLimitReached => "time limit reached",
            Self::Interrupted => "interrupted",
            Self::StoppedExplicitly => "stopped explicitly",
        };
        f.write_str(text)
    }
}

/// Outcome of a run, created exactly once when the worker stops.
///
/// `snapshot` is the last fully computed estimate. It is `None` only when
/// an arithmetic fault hit the very first step. When `fault` is set the
/// snapshot may lag behind snapshots already published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Final snapshot.
    pub snapshot: Option<Arc<Snapshot>>,
    /// Stop trigger.
    pub stop_reason: StopReason,
    /// Description of the arithmetic fault that ended the run, if any.
    pub fault: Option<String>,
    /// Total run time.
    pub elapsed: Duration,
}

impl RunResult {
    /// Digits of the final snapshot, empty if there is none.
    #[must_use]
    pub fn digits(&self) -> &str {
        self.snapshot.as_ref().map_or("", |s| s.digits.as_str())
    }

    /// Whether the run ended without a fault.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fault.is_none() && self.snapshot.is_some()
    }
}
