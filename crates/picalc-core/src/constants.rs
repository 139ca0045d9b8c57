//! Constants for the Chudnovsky series and run configuration defaults.

use std::time::Duration;

/// Default working precision (significant digits) at the start of a run.
pub const DEFAULT_INITIAL_PRECISION: u64 = 1000;

/// Default number of digits added each time the precision is widened.
pub const DEFAULT_PRECISION_STEP: u64 = 100;

/// Default number of iterations between two precision widenings.
pub const DEFAULT_ITERATIONS_PER_STEP: u64 = 10;

/// Default minimum wall-clock time between two published snapshots.
pub const DEFAULT_DISPLAY_INTERVAL: Duration = Duration::from_secs(2);

/// Default number of guard digits carried beyond the reported precision.
pub const DEFAULT_GUARD_DIGITS: u64 = 20;

/// Decimal digits gained per Chudnovsky term: log10(640320³ / 1728).
pub const DIGITS_PER_TERM: f64 = 14.181_647_462_725_477;

/// Constant part of `L_k = 13591409 + 545140134·k`.
pub const CHUDNOVSKY_A: u64 = 13_591_409;

/// Linear part of `L_k`.
pub const CHUDNOVSKY_B: u64 = 545_140_134;

/// 640320³, the magnitude of the ratio between consecutive `X_k`.
pub const CHUDNOVSKY_C3: u64 = 262_537_412_640_768_000;

/// Multiplier of the final transform `π = 426880·√10005 / S`.
pub const CHUDNOVSKY_SCALE: u64 = 426_880;

/// Radicand of the final transform.
pub const CHUDNOVSKY_RADICAND: u64 = 10_005;

/// Exit codes for the `picalc` binary.
pub mod exit_codes {
    /// Successful execution, including runs stopped by Ctrl+C or the time limit.
    pub const SUCCESS: i32 = 0;
    /// Generic error (I/O, prompt input, arithmetic fault).
    pub const ERROR_GENERIC: i32 = 1;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}
