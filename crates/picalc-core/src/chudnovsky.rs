//! Chudnovsky series engine with escalating working precision.
//!
//! The partial sum `S_n = Σ M_k·L_k / X_k` is folded exactly as a rational
//! `N_n / X_n` with `X_n = (−640320³)^n`, so widening the precision never
//! invalidates work already done. Only the final transform
//! `π ≈ 426880·√10005 / S_n` is evaluated in fixed point, at
//! `precision_digits + guard_digits` digits.

use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::{debug, trace};

use crate::config::RunConfig;
use crate::constants::{CHUDNOVSKY_A, CHUDNOVSKY_B, CHUDNOVSKY_C3, DIGITS_PER_TERM};
use crate::evaluator::{PiError, SeriesEvaluator};
use crate::fixed_point::{chudnovsky_constant, div_floor, render_truncated, working_scale};

/// Exact partial sum of the series, `numerator / denominator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSum {
    numerator: BigInt,
    denominator: BigInt,
}

impl PartialSum {
    fn empty() -> Self {
        Self {
            numerator: BigInt::zero(),
            denominator: BigInt::one(),
        }
    }

    /// Numerator `N_n`.
    #[must_use]
    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    /// Denominator `X_n`.
    #[must_use]
    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    /// Whether no term has been folded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numerator.is_zero()
    }

    fn folded(&self, term: &Term) -> Self {
        if term.index == 0 {
            return Self {
                numerator: &term.m * &term.l,
                denominator: BigInt::one(),
            };
        }
        let ratio = -BigInt::from(CHUDNOVSKY_C3);
        Self {
            numerator: &self.numerator * &ratio + &term.m * &term.l,
            denominator: &self.denominator * ratio,
        }
    }
}

/// Integer recurrences of the next term to fold.
#[derive(Debug, Clone)]
struct Term {
    index: u64,
    m: BigInt,
    l: BigInt,
    /// `12·index + 6`, the factor driving the `M` recurrence.
    k: BigInt,
}

impl Term {
    fn first() -> Self {
        Self {
            index: 0,
            m: BigInt::one(),
            l: BigInt::from(CHUDNOVSKY_A),
            k: BigInt::from(6u32),
        }
    }

    /// `M_{i} = M_{i-1}·(K³ − 16K) / i³`, `L_i = L_{i-1} + B`, `K += 12`.
    fn next(&self) -> Self {
        let index = self.index + 1;
        let i = BigInt::from(index);
        let k_cubed = &self.k * &self.k * &self.k;
        let m = &self.m * (k_cubed - &self.k * 16u32) / (&i * &i * &i);
        Self {
            index,
            m,
            l: &self.l + CHUDNOVSKY_B,
            k: &self.k + 12u32,
        }
    }
}

/// Arithmetic state owned by the engine.
#[derive(Debug, Clone)]
pub struct EngineState {
    iteration: u64,
    precision_digits: u64,
    accumulated_sum: PartialSum,
    /// `floor(π_n · 10^scale)`; absent before the first step.
    estimate: Option<BigInt>,
    scale: u32,
}

impl EngineState {
    /// Number of terms folded so far.
    #[must_use]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Current working precision in significant digits.
    #[must_use]
    pub fn precision_digits(&self) -> u64 {
        self.precision_digits
    }

    /// Exact partial sum of the folded terms.
    #[must_use]
    pub fn accumulated_sum(&self) -> &PartialSum {
        &self.accumulated_sum
    }

    /// Fixed-point estimate of π and its scale.
    #[must_use]
    pub fn current_pi_estimate(&self) -> Option<(&BigInt, u32)> {
        self.estimate.as_ref().map(|value| (value, self.scale))
    }
}

/// Chudnovsky series engine.
///
/// # Example
/// ```
/// use picalc_core::{ChudnovskyEngine, RunConfig, SeriesEvaluator};
///
/// let config = RunConfig {
///     initial_precision: 50,
///     precision_step: 10,
///     iterations_per_step: 2,
///     ..RunConfig::default()
/// };
/// let mut engine = ChudnovskyEngine::initialize(&config).unwrap();
/// for _ in 0..10 {
///     engine.step().unwrap();
/// }
/// assert_eq!(engine.precision_digits(), 100);
/// assert!(engine.render().starts_with("3.14159265358979323846"));
/// ```
#[derive(Debug, Clone)]
pub struct ChudnovskyEngine {
    precision_step: u64,
    iterations_per_step: u64,
    guard_digits: u64,
    state: EngineState,
    term: Term,
    /// `426880·√10005` at `state.scale`, reused until the precision widens.
    constant: Option<BigInt>,
}

impl ChudnovskyEngine {
    /// Create an engine at iteration 0 with an empty sum.
    pub fn initialize(config: &RunConfig) -> Result<Self, PiError> {
        config.validate()?;
        let scale = working_scale(config.initial_precision, config.guard_digits)?;
        Ok(Self {
            precision_step: config.precision_step,
            iterations_per_step: config.iterations_per_step,
            guard_digits: config.guard_digits,
            state: EngineState {
                iteration: 0,
                precision_digits: config.initial_precision,
                accumulated_sum: PartialSum::empty(),
                estimate: None,
                scale,
            },
            term: Term::first(),
            constant: None,
        })
    }

    /// Current engine state.
    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Guard digits carried beyond the working precision.
    #[must_use]
    pub fn guard_digits(&self) -> u64 {
        self.guard_digits
    }
}

impl SeriesEvaluator for ChudnovskyEngine {
    fn step(&mut self) -> Result<(), PiError> {
        let overflow = || PiError::ArithmeticFault("iteration counter overflow".into());
        let iteration = self.state.iteration.checked_add(1).ok_or_else(overflow)?;
        let widened = iteration % self.iterations_per_step == 0;
        let precision_digits = if widened {
            self.state
                .precision_digits
                .checked_add(self.precision_step)
                .ok_or_else(|| PiError::ArithmeticFault("precision counter overflow".into()))?
        } else {
            self.state.precision_digits
        };
        let scale = working_scale(precision_digits, self.guard_digits)?;

        // Everything is computed into locals so a failure leaves the state untouched.
        let accumulated_sum = self.state.accumulated_sum.folded(&self.term);
        let constant = match &self.constant {
            Some(constant) if scale == self.state.scale => constant.clone(),
            _ => chudnovsky_constant(scale),
        };
        let estimate = div_floor(
            &(&constant * accumulated_sum.denominator()),
            accumulated_sum.numerator(),
        )?;

        self.term = self.term.next();
        self.constant = Some(constant);
        self.state = EngineState {
            iteration,
            precision_digits,
            accumulated_sum,
            estimate: Some(estimate),
            scale,
        };

        if widened {
            debug!(iteration, precision_digits, "Working precision widened");
        } else {
            trace!(iteration, "Term folded");
        }
        Ok(())
    }

    fn render(&self) -> String {
        self.state
            .current_pi_estimate()
            .map(|(value, scale)| render_truncated(value, scale, self.state.precision_digits))
            .unwrap_or_default()
    }

    fn iteration(&self) -> u64 {
        self.state.iteration
    }

    fn precision_digits(&self) -> u64 {
        self.state.precision_digits
    }

    fn name(&self) -> &str {
        "Chudnovsky"
    }
}

/// Number of terms needed for `digits` correct significant digits, plus one spare.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn terms_for_digits(digits: u64) -> u64 {
    (digits as f64 / DIGITS_PER_TERM).ceil() as u64 + 1
}
