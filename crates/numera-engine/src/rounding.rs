//! Display rounding of reported values.
//!
//! Values are rounded through [`Decimal`] so that `0.1 + 0.2` reports as
//! `0.3` rather than `0.30000000000000004`. The precision type picks
//! between decimal places ([`Decimal::round_dp`]) and significant digits
//! ([`Decimal::round_sf`]).

use numera_math::convergence::PrecisionType;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Largest digit count used for rounding.
pub const MAX_DIGITS: u32 = 15;

/// Number of digits implied by a tolerance: `ceil(-log10(tol)) + 1`,
/// clamped to `[1, MAX_DIGITS]`.
pub fn digits_for_tolerance(tolerance: f64) -> u32 {
    // The offset keeps exact powers of ten from rounding up a digit.
    let digits = (-tolerance.log10() - 1e-9).ceil() + 1.0;
    if digits.is_nan() {
        return MAX_DIGITS;
    }
    digits.clamp(1.0, f64::from(MAX_DIGITS)) as u32
}

/// Rounding rule applied to every reported real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rounding {
    precision_type: PrecisionType,
    digits: Option<u32>,
}

impl Rounding {
    /// Rounds to `digits` (clamped to `[1, MAX_DIGITS]`).
    pub fn new(precision_type: PrecisionType, digits: u32) -> Self {
        Self {
            precision_type,
            digits: Some(digits.clamp(1, MAX_DIGITS)),
        }
    }

    /// Leaves values untouched.
    pub fn exact() -> Self {
        Self {
            precision_type: PrecisionType::default(),
            digits: None,
        }
    }

    /// Uses `digits` when given, otherwise the digits implied by
    /// `tolerance`.
    pub fn for_tolerance(
        precision_type: PrecisionType,
        tolerance: f64,
        digits: Option<u32>,
    ) -> Self {
        Self::new(
            precision_type,
            digits.unwrap_or_else(|| digits_for_tolerance(tolerance)),
        )
    }

    /// Uses `digits` when given, otherwise leaves values untouched.
    pub fn optional(precision_type: PrecisionType, digits: Option<u32>) -> Self {
        digits.map_or_else(Self::exact, |d| Self::new(precision_type, d))
    }

    /// Digit count, or `None` for exact output.
    pub fn digits(&self) -> Option<u32> {
        self.digits
    }

    /// Precision type.
    pub fn precision_type(&self) -> PrecisionType {
        self.precision_type
    }

    /// Rounds one value. Non-finite values and values outside the decimal
    /// range pass through unchanged.
    pub fn apply(&self, value: f64) -> f64 {
        let Some(digits) = self.digits else {
            return value;
        };
        if !value.is_finite() {
            return value;
        }
        let Some(decimal) = Decimal::from_f64(value) else {
            return value;
        };
        let rounded = match self.precision_type {
            PrecisionType::DecimalPlaces => decimal.round_dp(digits),
            PrecisionType::SignificantDigits => decimal.round_sf(digits).unwrap_or(decimal),
        };
        rounded.to_f64().unwrap_or(value)
    }

    /// Rounds every value of a slice.
    pub fn apply_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.apply(v)).collect()
    }

    /// Rounds an optional value.
    pub fn apply_opt(&self, value: Option<f64>) -> Option<f64> {
        value.map(|v| self.apply(v))
    }
}

impl Default for Rounding {
    fn default() -> Self {
        Self::exact()
    }
}
