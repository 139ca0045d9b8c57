//! Run configuration.

use std::time::Duration;

use serde::Serialize;

use crate::constants::{
    DEFAULT_DISPLAY_INTERVAL, DEFAULT_GUARD_DIGITS, DEFAULT_INITIAL_PRECISION,
    DEFAULT_ITERATIONS_PER_STEP, DEFAULT_PRECISION_STEP,
};
use crate::evaluator::PiError;

/// Immutable parameters of a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    /// Working precision (significant digits) before the first widening.
    pub initial_precision: u64,
    /// Digits added at each widening.
    pub precision_step: u64,
    /// Iterations between two widenings.
    pub iterations_per_step: u64,
    /// Minimum wall-clock time between two published snapshots.
    pub display_interval: Duration,
    /// Optional wall-clock limit for the whole run.
    pub time_limit: Option<Duration>,
    /// Extra digits carried by all intermediate fixed-point arithmetic.
    pub guard_digits: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            initial_precision: DEFAULT_INITIAL_PRECISION,
            precision_step: DEFAULT_PRECISION_STEP,
            iterations_per_step: DEFAULT_ITERATIONS_PER_STEP,
            display_interval: DEFAULT_DISPLAY_INTERVAL,
            time_limit: None,
            guard_digits: DEFAULT_GUARD_DIGITS,
        }
    }
}

impl RunConfig {
    /// Set the wall-clock limit.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Set the display interval.
    #[must_use]
    pub fn with_display_interval(mut self, interval: Duration) -> Self {
        self.display_interval = interval;
        self
    }

    /// Reject zero sizes, intervals, and limits.
    pub fn validate(&self) -> Result<(), PiError> {
        let positive = [
            ("initial_precision", self.initial_precision),
            ("precision_step", self.precision_step),
            ("iterations_per_step", self.iterations_per_step),
            ("guard_digits", self.guard_digits),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(PiError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        if self.display_interval.is_zero() {
            return Err(PiError::InvalidConfig(
                "display_interval must be positive".into(),
            ));
        }
        if self.time_limit.is_some_and(|limit| limit.is_zero()) {
            return Err(PiError::InvalidConfig("time_limit must be positive".into()));
        }
        Ok(())
    }
}
