//! Polynomial interpolation through a set of points.
//!
//! # Available Methods
//!
//! - [`vandermonde`]: solves the Vandermonde system `V a = y`
//! - [`newton_divided_differences`]: builds the Newton form from a
//!   divided-difference table and expands it
//!
//! Both return the coefficients of the unique interpolating polynomial of
//! degree `n - 1`, highest degree first, together with a rendered form.
//!
//! # Example
//!
//! ```rust
//! use numera_math::interpolation::newton_divided_differences;
//!
//! let result = newton_divided_differences(&[1.0, 2.0, 3.0], &[2.0, 3.0, 5.0]);
//! assert_eq!(result.coefficients, vec![0.5, -0.5, 2.0]);
//! assert_eq!(result.polynomial, "0.5x^2 - 0.5x + 2");
//! ```

mod newton;
mod vandermonde;

pub use newton::{divided_difference_table, newton_divided_differences};
pub use vandermonde::{vandermonde, vandermonde_matrix};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::status::Status;

/// Interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterpolationMethod {
    /// Solve the Vandermonde system.
    Vandermonde,
    /// Newton's divided differences.
    NewtonDividedDifferences,
}

impl InterpolationMethod {
    /// All methods, in presentation order.
    pub const ALL: [Self; 2] = [Self::Vandermonde, Self::NewtonDividedDifferences];

    /// Returns the method name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vandermonde => "Vandermonde",
            Self::NewtonDividedDifferences => "Newton Divided Differences",
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "vandermonde" => Ok(Self::Vandermonde),
            "newtondivideddifferences" | "divideddifferences" | "newton" => {
                Ok(Self::NewtonDividedDifferences)
            }
            _ => Err(MathError::invalid_input(format!(
                "unknown interpolation method '{s}'"
            ))),
        }
    }
}

/// Outcome of an interpolation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolationResult {
    /// Method that produced the result.
    pub method: InterpolationMethod,
    /// `Solved` or the failure status.
    pub status: Status,
    /// Human-readable summary.
    pub message: String,
    /// Polynomial coefficients, highest degree first. Empty on failure.
    pub coefficients: Vec<f64>,
    /// Rendered polynomial. Empty on failure.
    pub polynomial: String,
}

impl InterpolationResult {
    /// True if a polynomial was found.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Evaluates the interpolating polynomial at `x`, if there is one.
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        self.is_success()
            .then(|| evaluate_polynomial(&self.coefficients, x))
    }
}

/// Runs the given method.
pub fn interpolate(method: InterpolationMethod, x: &[f64], y: &[f64]) -> InterpolationResult {
    match method {
        InterpolationMethod::Vandermonde => vandermonde(x, y),
        InterpolationMethod::NewtonDividedDifferences => newton_divided_differences(x, y),
    }
}

/// Evaluates a polynomial (highest degree first) with Horner's scheme.
pub fn evaluate_polynomial(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Renders coefficients (highest degree first) as `2x^2 - x + 0.5`.
///
/// Zero terms are omitted and unit coefficients are written as `x`. The
/// zero polynomial renders as `0`. The output is accepted by
/// [`Expression::parse`](crate::expression::Expression::parse).
pub fn format_polynomial(coefficients: &[f64]) -> String {
    let degree = coefficients.len().saturating_sub(1);
    let mut out = String::new();

    for (i, &c) in coefficients.iter().enumerate() {
        if c == 0.0 {
            continue;
        }
        let power = degree - i;
        let magnitude = c.abs();

        if out.is_empty() {
            if c < 0.0 {
                out.push('-');
            }
        } else {
            out.push_str(if c < 0.0 { " - " } else { " + " });
        }

        if magnitude != 1.0 || power == 0 {
            out.push_str(&magnitude.to_string());
        }
        match power {
            0 => {}
            1 => out.push('x'),
            p => out.push_str(&format!("x^{p}")),
        }
    }

    if out.is_empty() {
        out.push('0');
    }
    out
}

/// Checks that `x` and `y` are non-empty, equally long, finite, and that
/// no `x` value repeats.
pub(crate) fn validate_points(x: &[f64], y: &[f64]) -> MathResult<()> {
    if x.is_empty() {
        return Err(MathError::invalid_input("at least one point is required"));
    }
    if x.len() != y.len() {
        return Err(MathError::invalid_input(format!(
            "x and y must have the same number of elements: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("the points must be finite"));
    }
    for (i, xi) in x.iter().enumerate() {
        if x[i + 1..].contains(xi) {
            return Err(MathError::invalid_input(format!(
                "x values must not repeat: {xi} appears more than once"
            )));
        }
    }
    Ok(())
}

/// Folds a coefficient computation into an [`InterpolationResult`].
pub(crate) fn finish(
    method: InterpolationMethod,
    outcome: MathResult<Vec<f64>>,
) -> InterpolationResult {
    let outcome = outcome.and_then(|coefficients| {
        if coefficients.iter().all(|c| c.is_finite()) {
            Ok(coefficients)
        } else {
            Err(MathError::NonFinite { stage: "coefficient vector" })
        }
    });
    match outcome {
        Ok(coefficients) => {
            let polynomial = format_polynomial(&coefficients);
            log::debug!("{method}: {polynomial}");
            InterpolationResult {
                method,
                status: Status::Solved,
                message: format!(
                    "The polynomial that interpolates the given points is: {polynomial}"
                ),
                coefficients,
                polynomial,
            }
        }
        Err(e) => {
            log::warn!("{method} failed: {e}");
            InterpolationResult {
                method,
                status: e.status(),
                message: e.to_string(),
                coefficients: Vec::new(),
                polynomial: String::new(),
            }
        }
    }
}
