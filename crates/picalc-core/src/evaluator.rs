//! Evaluator traits and the shared error type.
//!
//! `SeriesEvaluator` is the seam driven by the supervisor's worker loop.
//! `ChudnovskyEngine` is the production implementation; tests substitute
//! slow or faulting evaluators through the same trait.

/// Error type for π computations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PiError {
    /// The run configuration was rejected before any work started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A big-number operation could not be completed.
    #[error("arithmetic fault: {0}")]
    ArithmeticFault(String),

    /// The worker thread could not be created.
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(String),

    /// The run result was already handed over.
    #[error("run result already taken")]
    ResultTaken,
}

/// A series that is advanced one term at a time at escalating precision.
pub trait SeriesEvaluator: Send {
    /// Fold the next term into the partial sum.
    ///
    /// A step is applied completely or not at all.
    fn step(&mut self) -> Result<(), PiError>;

    /// Render the current estimate truncated to the working precision.
    fn render(&self) -> String;

    /// Number of terms folded so far.
    fn iteration(&self) -> u64;

    /// Current working precision in significant digits.
    fn precision_digits(&self) -> u64;

    /// Name of the series.
    fn name(&self) -> &str;
}
