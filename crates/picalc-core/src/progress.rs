//! Cooperative cancellation and deadline tracking.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::snapshot::StopReason;

const NOT_CANCELLED: u8 = 0;

fn encode(reason: StopReason) -> u8 {
    match reason {
        StopReason::TimeLimitReached => 1,
        StopReason::Interrupted => 2,
        StopReason::StoppedExplicitly => 3,
    }
}

fn decode(value: u8) -> Option<StopReason> {
    match value {
        1 => Some(StopReason::TimeLimitReached),
        2 => Some(StopReason::Interrupted),
        3 => Some(StopReason::StoppedExplicitly),
        _ => None,
    }
}

/// Cooperative cancellation token carrying the first stop reason.
///
/// # Example
/// ```
/// use picalc_core::progress::CancellationToken;
/// use picalc_core::StopReason;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// assert!(token.cancel(StopReason::Interrupted));
/// assert!(!token.cancel(StopReason::StoppedExplicitly));
/// assert_eq!(token.reason(), Some(StopReason::Interrupted));
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    reason: Arc<AtomicU8>,
}

impl CancellationToken {
    /// Create a new cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reason: Arc::new(AtomicU8::new(NOT_CANCELLED)),
        }
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.reason.load(Ordering::Acquire) != NOT_CANCELLED
    }

    /// Request cancellation. Returns `false` if a reason was already recorded.
    pub fn cancel(&self, reason: StopReason) -> bool {
        self.reason
            .compare_exchange(
                NOT_CANCELLED,
                encode(reason),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// The first recorded stop reason.
    #[must_use]
    pub fn reason(&self) -> Option<StopReason> {
        decode(self.reason.load(Ordering::Acquire))
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional wall-clock deadline measured from the start of a run.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Start the clock now.
    #[must_use]
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    /// Time since the clock started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether a limit is set and has elapsed.
    #[must_use]
    pub fn is_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.elapsed() >= limit)
    }

    /// Time left before the limit, `None` for unbounded runs.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(self.elapsed()))
    }
}
