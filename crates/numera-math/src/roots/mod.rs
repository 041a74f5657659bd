//! Root-finding algorithms with full iteration history.
//!
//! Every solver takes the function (and its derivatives where needed) as
//! fallible closures, a starting configuration and a [`ToleranceSpec`], and
//! always returns a [`RootResult`]. Failures are reported through the
//! result's [`Status`] and message rather than as errors, and the steps
//! recorded before the failure are kept.
//!
//! - [`bisection`]: halves a bracket
//! - [`false_position`]: secant line through a bracket
//! - [`incremental_search`]: scans with a fixed step for a sign change
//! - [`fixed_point`]: iterates `x = g(x)`
//! - [`newton_raphson`]: uses the first derivative
//! - [`secant`]: two starting points, no derivative
//! - [`multiple_roots`]: modified Newton for roots of multiplicity > 1
//!
//! | Method | Converges | Requires |
//! |--------|-----------|----------|
//! | Bisection | Linear, guaranteed | Bracket |
//! | False position | Superlinear, guaranteed | Bracket |
//! | Newton-Raphson | Quadratic near simple roots | f' |
//! | Secant | Superlinear | Two guesses |
//! | Multiple roots | Quadratic, also at multiple roots | f', f'' |
//! | Fixed point | Linear if \|g'\| < 1 | g |
//!
//! # Example
//!
//! ```rust
//! use numera_math::convergence::ToleranceSpec;
//! use numera_math::expression::Expression;
//! use numera_math::roots::bisection;
//! use numera_math::Status;
//!
//! let f = Expression::parse("x^3 - x - 2").unwrap();
//! let spec = ToleranceSpec::new(1e-4, 50).unwrap();
//!
//! let result = bisection(|x| f.evaluate(x), 1.0, 2.0, &spec);
//! assert_eq!(result.status, Status::Converged);
//! assert!((result.final_estimate.unwrap() - 1.5214).abs() < 1e-3);
//! ```

mod bisection;
mod false_position;
mod fixed_point;
mod incremental;
mod multiple_roots;
mod newton;
mod secant;

pub use bisection::bisection;
pub use false_position::false_position;
pub use fixed_point::fixed_point;
pub use incremental::incremental_search;
pub use multiple_roots::multiple_roots;
pub use newton::newton_raphson;
pub use secant::secant;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::convergence::ToleranceSpec;
use crate::error::{EvalResult, ExprError, MathError, MathResult};
use crate::history::IterationRecorder;
use crate::status::Status;

/// Denominators smaller than this are treated as zero.
pub const NEAR_ZERO: f64 = 1e-15;

/// Fixed-point iterates beyond this magnitude are treated as divergent.
pub const DIVERGENCE_BOUND: f64 = 1e15;

/// Root-finding method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RootMethod {
    /// Interval halving.
    Bisection,
    /// Regula falsi.
    FalsePosition,
    /// Fixed-step scan for a sign change.
    IncrementalSearch,
    /// `x = g(x)` iteration.
    FixedPoint,
    /// Newton's method.
    NewtonRaphson,
    /// Secant method.
    Secant,
    /// Modified Newton for multiple roots.
    MultipleRoots,
}

impl RootMethod {
    /// All methods, in presentation order.
    pub const ALL: [Self; 7] = [
        Self::Bisection,
        Self::FalsePosition,
        Self::IncrementalSearch,
        Self::FixedPoint,
        Self::NewtonRaphson,
        Self::Secant,
        Self::MultipleRoots,
    ];

    /// Returns the method name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bisection => "Bisection",
            Self::FalsePosition => "False Position",
            Self::IncrementalSearch => "Incremental Search",
            Self::FixedPoint => "Fixed Point",
            Self::NewtonRaphson => "Newton-Raphson",
            Self::Secant => "Secant",
            Self::MultipleRoots => "Multiple Roots",
        }
    }

    /// Highest derivative order the method evaluates.
    pub fn derivative_order(self) -> u32 {
        match self {
            Self::NewtonRaphson => 1,
            Self::MultipleRoots => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for RootMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RootMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "bisection" => Ok(Self::Bisection),
            "falseposition" | "falserule" | "regulafalsi" => Ok(Self::FalsePosition),
            "incrementalsearch" | "incremental" => Ok(Self::IncrementalSearch),
            "fixedpoint" => Ok(Self::FixedPoint),
            "newtonraphson" | "newton" => Ok(Self::NewtonRaphson),
            "secant" => Ok(Self::Secant),
            "multipleroots" | "multiple" => Ok(Self::MultipleRoots),
            _ => Err(MathError::invalid_input(format!(
                "unknown root-finding method '{s}'"
            ))),
        }
    }
}

/// One recorded iteration of a root-finding method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationStep {
    /// 1-based iteration index.
    pub index: usize,
    /// Estimate produced by this iteration.
    pub estimate: f64,
    /// `f(estimate)`.
    pub function_value: f64,
    /// `f'(estimate)`, for derivative-based methods.
    pub derivative: Option<f64>,
    /// `f''(estimate)`, for the multiple-roots method.
    pub second_derivative: Option<f64>,
    /// Error against the previous estimate.
    pub error: f64,
}

impl IterationStep {
    fn new(index: usize, estimate: f64, function_value: f64, error: f64) -> Self {
        Self {
            index,
            estimate,
            function_value,
            derivative: None,
            second_derivative: None,
            error,
        }
    }
}

/// Outcome of a root-finding call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootResult {
    /// Method that produced the result.
    pub method: RootMethod,
    /// Terminal status.
    pub status: Status,
    /// Human-readable summary.
    pub message: String,
    /// Iteration history, in order.
    pub steps: Vec<IterationStep>,
    /// Last estimate, if any was produced.
    pub final_estimate: Option<f64>,
    /// Sign-change interval found by incremental search.
    pub bracket: Option<(f64, f64)>,
}

impl RootResult {
    /// Number of recorded iterations.
    pub fn iterations(&self) -> usize {
        self.steps.len()
    }

    /// True if a root (or a bracket) was found.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Bookkeeping shared by the solvers for one call.
pub(crate) struct RootRun {
    method: RootMethod,
    tolerance: f64,
    recorder: IterationRecorder<IterationStep>,
}

impl RootRun {
    pub(crate) fn new(method: RootMethod, spec: &ToleranceSpec) -> Self {
        Self {
            method,
            tolerance: spec.tolerance(),
            recorder: IterationRecorder::new(spec.max_iterations()),
        }
    }

    pub(crate) fn record(&mut self, step: IterationStep) {
        log::trace!(
            "{} step {}: x = {}, f(x) = {}, error = {}",
            self.method,
            step.index,
            step.estimate,
            step.function_value,
            step.error
        );
        self.recorder.push(step);
    }

    pub(crate) fn finish(
        self,
        status: Status,
        message: String,
        final_estimate: Option<f64>,
        bracket: Option<(f64, f64)>,
    ) -> RootResult {
        log::debug!(
            "{} finished after {} iterations: {}",
            self.method,
            self.recorder.len(),
            status
        );
        RootResult {
            method: self.method,
            status,
            message,
            steps: self.recorder.into_steps(),
            final_estimate,
            bracket,
        }
    }

    /// `f(x)` is exactly zero.
    pub(crate) fn exact_root(self, x: f64) -> RootResult {
        self.finish(
            Status::Converged,
            format!("{x} is a root of f(x)"),
            Some(x),
            None,
        )
    }

    /// The error satisfied the tolerance.
    pub(crate) fn converged(self, x: f64) -> RootResult {
        let message = format!(
            "The approximate solution is: {x}, with a tolerance = {}",
            self.tolerance
        );
        self.finish(Status::Converged, message, Some(x), None)
    }

    /// The iteration bound was reached.
    pub(crate) fn exhausted(self) -> RootResult {
        let message = format!("Failed in {} iterations", self.recorder.len());
        let last = self.last_estimate();
        self.finish(Status::MaxIterationsReached, message, last, None)
    }

    pub(crate) fn fail(self, error: MathError) -> RootResult {
        log::warn!("{} failed: {}", self.method, error);
        let last = self.last_estimate();
        let status = error.status();
        self.finish(status, error.to_string(), last, None)
    }

    fn last_estimate(&self) -> Option<f64> {
        self.recorder.last().map(|step| step.estimate)
    }
}

/// Evaluates `f` at `x`, rejecting non-finite values.
pub(crate) fn eval_at<F>(f: &F, x: f64) -> MathResult<f64>
where
    F: Fn(f64) -> EvalResult,
{
    let value = f(x)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExprError::NonFinite { at: x }.into())
    }
}

/// Rejects non-finite iterates.
pub(crate) fn finite_iterate(x: f64, iteration: usize) -> MathResult<f64> {
    if x.is_finite() {
        Ok(x)
    } else {
        Err(MathError::diverged(iteration, format!("iterate {x} is not finite")))
    }
}

/// Orders a bracket and checks its endpoints.
///
/// Returns `Ok(Err(root))` when an endpoint is an exact root.
pub(crate) fn check_bracket<F>(f: &F, a: f64, b: f64) -> MathResult<Result<Bracket, f64>>
where
    F: Fn(f64) -> EvalResult,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(MathError::invalid_input("bracket endpoints must be finite"));
    }
    let (lo, hi) = (a.min(b), a.max(b));
    let f_lo = eval_at(f, lo)?;
    if f_lo == 0.0 {
        return Ok(Err(lo));
    }
    let f_hi = eval_at(f, hi)?;
    if f_hi == 0.0 {
        return Ok(Err(hi));
    }
    if f_lo * f_hi > 0.0 {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }
    Ok(Ok(Bracket { lo, hi, f_lo, f_hi }))
}

/// Interval with a sign change.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bracket {
    pub lo: f64,
    pub hi: f64,
    pub f_lo: f64,
    pub f_hi: f64,
}

impl Bracket {
    /// Keeps the half whose endpoints still differ in sign.
    pub(crate) fn narrow(&mut self, c: f64, fc: f64) {
        if self.f_lo * fc < 0.0 {
            self.hi = c;
            self.f_hi = fc;
        } else {
            self.lo = c;
            self.f_lo = fc;
        }
    }
}
