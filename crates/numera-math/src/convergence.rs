//! Convergence policy shared by every iterative solver.
//!
//! A [`ToleranceSpec`] describes how the error between two consecutive
//! estimates is measured and when iteration stops. [`should_stop`] turns a
//! pair of scalar estimates into a [`StopDecision`]; [`should_stop_vector`]
//! does the same for vector iterates using the configured [`Norm`].
//!
//! The tolerance is always compared directly against the computed error.
//! The precision type only affects how values are rounded for display.

use std::fmt;
use std::str::FromStr;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Default tolerance for iterative methods.
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// Default maximum iterations for iterative methods.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Largest digit count [`ToleranceSpec::from_digits`] accepts; `10^-308` is
/// the smallest normal power of ten.
pub const MAX_DIGITS: u32 = 308;

/// How the error between consecutive estimates is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorType {
    /// `|current - previous|`
    #[default]
    Absolute,
    /// `|current - previous| / |current|`
    Relative,
}

/// How reported values are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrecisionType {
    /// Round to a number of digits after the decimal point.
    #[default]
    DecimalPlaces,
    /// Round to a number of significant digits.
    SignificantDigits,
}

/// Vector norm used by the iterative linear solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Norm {
    /// Largest absolute component.
    #[default]
    Infinity,
    /// Sum of absolute components.
    L1,
    /// Euclidean length.
    L2,
}

impl Norm {
    /// Applies the norm to a vector.
    pub fn apply(self, v: &DVector<f64>) -> f64 {
        self.of_slice(v.as_slice())
    }

    /// Applies the norm to a slice.
    pub fn of_slice(self, v: &[f64]) -> f64 {
        match self {
            Self::Infinity => v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs())),
            Self::L1 => v.iter().map(|x| x.abs()).sum(),
            Self::L2 => v.iter().map(|x| x * x).sum::<f64>().sqrt(),
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => f.write_str("absolute"),
            Self::Relative => f.write_str("relative"),
        }
    }
}

impl FromStr for ErrorType {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "abs" | "absolute" => Ok(Self::Absolute),
            "2" | "rel" | "relative" => Ok(Self::Relative),
            other => Err(MathError::invalid_input(format!("unknown error type '{other}'"))),
        }
    }
}

impl fmt::Display for PrecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecimalPlaces => f.write_str("decimal-places"),
            Self::SignificantDigits => f.write_str("significant-digits"),
        }
    }
}

impl FromStr for PrecisionType {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "dp" | "decimal" | "decimals" | "decimal-places" | "decimalplaces" => {
                Ok(Self::DecimalPlaces)
            }
            "sf" | "significant" | "significant-digits" | "significantdigits" => {
                Ok(Self::SignificantDigits)
            }
            other => Err(MathError::invalid_input(format!(
                "unknown precision type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infinity => f.write_str("inf"),
            Self::L1 => f.write_str("1"),
            Self::L2 => f.write_str("2"),
        }
    }
}

impl FromStr for Norm {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inf" | "infinity" | "max" => Ok(Self::Infinity),
            "1" | "l1" => Ok(Self::L1),
            "2" | "l2" | "euclidean" => Ok(Self::L2),
            other => Err(MathError::invalid_input(format!("unsupported norm '{other}'"))),
        }
    }
}

/// Stopping configuration for an iterative method.
///
/// The tolerance is positive and finite, and at least one iteration is
/// allowed; both are checked by the constructors so an invalid spec cannot
/// be built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToleranceSpec {
    error_type: ErrorType,
    precision_type: PrecisionType,
    tolerance: f64,
    max_iterations: usize,
    norm: Norm,
}

impl Default for ToleranceSpec {
    fn default() -> Self {
        Self {
            error_type: ErrorType::default(),
            precision_type: PrecisionType::default(),
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            norm: Norm::default(),
        }
    }
}

impl ToleranceSpec {
    /// Creates a new spec with absolute error, decimal places and the infinity norm.
    pub fn new(tolerance: f64, max_iterations: usize) -> MathResult<Self> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(MathError::invalid_input(format!(
                "tolerance must be positive, got {tolerance}"
            )));
        }
        if max_iterations == 0 {
            return Err(MathError::invalid_input("max iterations must be at least 1"));
        }
        Ok(Self {
            tolerance,
            max_iterations,
            ..Self::default()
        })
    }

    /// Builds a spec from a number of correct digits.
    ///
    /// Absolute errors use `0.5 * 10^-digits`, relative errors `5 * 10^-digits`.
    pub fn from_digits(
        digits: u32,
        error_type: ErrorType,
        max_iterations: usize,
    ) -> MathResult<Self> {
        if digits > MAX_DIGITS {
            return Err(MathError::invalid_input(format!(
                "digits must be at most {MAX_DIGITS}, got {digits}"
            )));
        }
        let scale = 10f64.powi(-i32::try_from(digits).unwrap_or(i32::MAX));
        let tolerance = match error_type {
            ErrorType::Absolute => 0.5 * scale,
            ErrorType::Relative => 5.0 * scale,
        };
        Ok(Self::new(tolerance, max_iterations)?.with_error_type(error_type))
    }

    /// Sets the error type.
    #[must_use]
    pub fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = error_type;
        self
    }

    /// Sets the precision type.
    #[must_use]
    pub fn with_precision_type(mut self, precision_type: PrecisionType) -> Self {
        self.precision_type = precision_type;
        self
    }

    /// Sets the vector norm.
    #[must_use]
    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    /// Returns the error type.
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Returns the precision type.
    pub fn precision_type(&self) -> PrecisionType {
        self.precision_type
    }

    /// Returns the tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the iteration bound.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the vector norm.
    pub fn norm(&self) -> Norm {
        self.norm
    }
}

/// Outcome of a single convergence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep iterating.
    Continue,
    /// The error is within tolerance.
    Converged,
    /// The iteration bound was reached first.
    MaxIterations,
}

/// Error value and verdict for one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopDecision {
    /// The measured error.
    pub error: f64,
    /// What to do next.
    pub verdict: Verdict,
}

impl StopDecision {
    /// Returns true if iteration must end.
    pub fn stop(&self) -> bool {
        self.verdict != Verdict::Continue
    }

    /// Returns true if the tolerance was satisfied.
    pub fn converged(&self) -> bool {
        self.verdict == Verdict::Converged
    }
}

/// Error between two scalar estimates.
///
/// A relative error with `current == 0` falls back to the absolute error.
pub fn step_error(previous: f64, current: f64, error_type: ErrorType) -> f64 {
    let delta = (current - previous).abs();
    match error_type {
        ErrorType::Absolute => delta,
        ErrorType::Relative if current == 0.0 => delta,
        ErrorType::Relative => delta / current.abs(),
    }
}

/// Applies the tolerance and the iteration bound to an already measured error.
pub fn decide(error: f64, iteration: usize, spec: &ToleranceSpec) -> StopDecision {
    let verdict = if error <= spec.tolerance() {
        Verdict::Converged
    } else if iteration >= spec.max_iterations() {
        Verdict::MaxIterations
    } else {
        Verdict::Continue
    };
    StopDecision { error, verdict }
}

/// Decides whether a scalar iteration should stop.
///
/// # Example
///
/// ```rust
/// use numera_math::convergence::{should_stop, ToleranceSpec, Verdict};
///
/// let spec = ToleranceSpec::new(1e-3, 10).unwrap();
/// let decision = should_stop(1.4142, 1.41421, 3, &spec);
/// assert_eq!(decision.verdict, Verdict::Converged);
/// ```
pub fn should_stop(
    previous: f64,
    current: f64,
    iteration: usize,
    spec: &ToleranceSpec,
) -> StopDecision {
    decide(step_error(previous, current, spec.error_type()), iteration, spec)
}

/// Decides whether a vector iteration should stop, measuring the delta with
/// the spec's norm.
pub fn should_stop_vector(
    previous: &DVector<f64>,
    current: &DVector<f64>,
    iteration: usize,
    spec: &ToleranceSpec,
) -> StopDecision {
    let delta = spec.norm().apply(&(current - previous));
    let error = match spec.error_type() {
        ErrorType::Absolute => delta,
        ErrorType::Relative => {
            let scale = spec.norm().apply(current);
            if scale == 0.0 {
                delta
            } else {
                delta / scale
            }
        }
    };
    decide(error, iteration, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_spec_validation() {
        assert!(ToleranceSpec::new(0.0, 10).is_err());
        assert!(ToleranceSpec::new(-1e-3, 10).is_err());
        assert!(ToleranceSpec::new(f64::NAN, 10).is_err());
        assert!(ToleranceSpec::new(1e-3, 0).is_err());

        let spec = ToleranceSpec::new(1e-3, 10)
            .unwrap()
            .with_error_type(ErrorType::Relative)
            .with_norm(Norm::L2);
        assert_eq!(spec.error_type(), ErrorType::Relative);
        assert_eq!(spec.norm(), Norm::L2);
        assert_eq!(spec.max_iterations(), 10);
    }

    #[test]
    fn test_from_digits() {
        let abs = ToleranceSpec::from_digits(4, ErrorType::Absolute, 50).unwrap();
        assert_relative_eq!(abs.tolerance(), 0.5e-4);

        let rel = ToleranceSpec::from_digits(4, ErrorType::Relative, 50).unwrap();
        assert_relative_eq!(rel.tolerance(), 5e-4);
        assert_eq!(rel.error_type(), ErrorType::Relative);
    }

    #[test]
    fn test_from_digits_rejects_out_of_range() {
        assert!(ToleranceSpec::from_digits(MAX_DIGITS, ErrorType::Absolute, 10).is_ok());
        for digits in [MAX_DIGITS + 1, 1 << 31, u32::MAX] {
            let err = ToleranceSpec::from_digits(digits, ErrorType::Absolute, 10).unwrap_err();
            assert_eq!(err.status(), Status::InvalidInput);
        }
    }

    #[test]
    fn test_relative_error_at_zero() {
        assert_relative_eq!(step_error(0.5, 0.0, ErrorType::Relative), 0.5);
        assert_relative_eq!(step_error(1.0, 2.0, ErrorType::Relative), 0.5);
        assert_relative_eq!(step_error(0.0, 0.0, ErrorType::Relative), 0.0);
    }

    #[test]
    fn test_converged_wins_over_bound() {
        let spec = ToleranceSpec::new(1e-2, 3).unwrap();
        assert_eq!(should_stop(1.0, 1.001, 3, &spec).verdict, Verdict::Converged);
        assert_eq!(should_stop(1.0, 2.0, 3, &spec).verdict, Verdict::MaxIterations);
        assert_eq!(should_stop(1.0, 2.0, 2, &spec).verdict, Verdict::Continue);
    }

    #[test]
    fn test_norms() {
        let v = DVector::from_vec(vec![3.0, -4.0, 1.0]);
        assert_relative_eq!(Norm::Infinity.apply(&v), 4.0);
        assert_relative_eq!(Norm::L1.apply(&v), 8.0);
        assert_relative_eq!(Norm::L2.apply(&v), 26.0_f64.sqrt());
    }

    #[test]
    fn test_vector_relative_error() {
        let spec = ToleranceSpec::new(1e-6, 10)
            .unwrap()
            .with_error_type(ErrorType::Relative);
        let prev = DVector::from_vec(vec![1.0, 1.0]);
        let curr = DVector::from_vec(vec![2.0, 1.0]);
        assert_relative_eq!(should_stop_vector(&prev, &curr, 1, &spec).error, 0.5);

        let zero = DVector::from_vec(vec![0.0, 0.0]);
        assert_relative_eq!(should_stop_vector(&prev, &zero, 1, &spec).error, 1.0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("inf".parse::<Norm>().unwrap(), Norm::Infinity);
        assert_eq!("2".parse::<Norm>().unwrap(), Norm::L2);
        assert_eq!("relative".parse::<ErrorType>().unwrap(), ErrorType::Relative);
        assert_eq!(
            "significant_digits".parse::<PrecisionType>().unwrap(),
            PrecisionType::SignificantDigits
        );
        assert!("3".parse::<Norm>().is_err());
    }

    proptest! {
        #[test]
        fn prop_norm_ordering(v in proptest::collection::vec(-1e6f64..1e6, 1..12)) {
            let inf = Norm::Infinity.of_slice(&v);
            let l2 = Norm::L2.of_slice(&v);
            let l1 = Norm::L1.of_slice(&v);
            prop_assert!(inf <= l2 * (1.0 + 1e-12) + 1e-12);
            prop_assert!(l2 <= l1 * (1.0 + 1e-12) + 1e-12);
        }

        #[test]
        fn prop_stop_is_monotone_in_iteration(
            prev in -1e3f64..1e3,
            curr in -1e3f64..1e3,
            iteration in 1usize..50,
        ) {
            let spec = ToleranceSpec::new(1e-4, 50).unwrap();
            let decision = should_stop(prev, curr, iteration, &spec);
            prop_assert!(decision.error >= 0.0);
            if decision.error > spec.tolerance() && iteration < spec.max_iterations() {
                prop_assert_eq!(decision.verdict, Verdict::Continue);
            }
            prop_assert!(should_stop(prev, curr, spec.max_iterations(), &spec).stop());
        }
    }
}
