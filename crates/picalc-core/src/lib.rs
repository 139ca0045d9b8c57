//! # picalc-core
//!
//! Core library for the PiCalc-rs continuous π calculator.
//! Implements the Chudnovsky series with escalating working precision.

pub mod chudnovsky;
pub mod config;
pub mod constants;
pub mod evaluator;
pub mod fixed_point;
pub mod observer;
pub mod observers;
pub mod progress;
pub mod snapshot;

// Re-exports
pub use chudnovsky::{terms_for_digits, ChudnovskyEngine, EngineState, PartialSum};
pub use config::RunConfig;
pub use constants::exit_codes;
pub use evaluator::{PiError, SeriesEvaluator};
pub use observer::SnapshotObserver;
pub use progress::{CancellationToken, Deadline};
pub use snapshot::{RunResult, Snapshot, StopReason};

/// Compute π to `significant` significant digits.
///
/// This is a convenience function for simple use cases. For a continuous
/// run with live snapshots, use the supervisor in `picalc-orchestration`.
///
/// # Example
/// ```
/// assert_eq!(picalc_core::pi_digits(10).unwrap(), "3.141592653");
/// ```
pub fn pi_digits(significant: u64) -> Result<String, PiError> {
    let config = RunConfig {
        initial_precision: significant,
        precision_step: 1,
        iterations_per_step: u64::MAX,
        ..RunConfig::default()
    };
    let mut engine = ChudnovskyEngine::initialize(&config)?;
    for _ in 0..terms_for_digits(significant) {
        engine.step()?;
    }
    Ok(engine.render())
}
