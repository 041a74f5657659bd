//! Direct solvers for `Ax = b`.
//!
//! - [`doolittle`]: `A = LU` with a unit-diagonal `L`
//! - [`crout`]: `A = LU` with a unit-diagonal `U`
//! - [`cholesky`]: `A = LLᵗ` for symmetric positive definite `A`
//! - [`simple_gaussian_elimination`]: elimination without row exchanges
//! - [`pivot_gaussian_elimination`]: elimination with partial pivoting
//! - [`lu_gaussian_elimination`]: `PA = LU` with partial pivoting
//!
//! Each entry point validates the system, works on private copies and
//! returns a [`FactorizationResult`]; the `*_factors` functions expose the
//! bare factorizations.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::{DMatrix, DVector};
//! use numera_math::linear_algebra::doolittle;
//! use numera_math::Status;
//!
//! let a = DMatrix::from_row_slice(2, 2, &[4.0, 3.0, 6.0, 3.0]);
//! let b = DVector::from_vec(vec![10.0, 12.0]);
//!
//! let result = doolittle(&a, &b);
//! assert_eq!(result.status, Status::Solved);
//! let x = result.solution.unwrap();
//! assert!((x[0] - 1.0).abs() < 1e-12 && (x[1] - 2.0).abs() < 1e-12);
//! ```

mod cholesky;
mod gaussian;
mod lu;

pub use cholesky::{cholesky, cholesky_factor};
pub use gaussian::{pivot_gaussian_elimination, simple_gaussian_elimination};
pub use lu::{
    crout, crout_factors, doolittle, doolittle_factors, lu_gaussian_elimination, lu_partial_pivot,
};

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::linear_algebra::validate_system;
use crate::status::Status;

/// Direct linear-system method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectMethod {
    /// LU with unit lower diagonal.
    Doolittle,
    /// LU with unit upper diagonal.
    Crout,
    /// `LLᵗ` factorization.
    Cholesky,
    /// Gaussian elimination without pivoting.
    SimpleGaussianElimination,
    /// Gaussian elimination with partial pivoting.
    PivotGaussianElimination,
    /// `PA = LU` followed by two triangular solves.
    LuGaussianElimination,
}

impl DirectMethod {
    /// All methods, in presentation order.
    pub const ALL: [Self; 6] = [
        Self::Doolittle,
        Self::Crout,
        Self::Cholesky,
        Self::SimpleGaussianElimination,
        Self::PivotGaussianElimination,
        Self::LuGaussianElimination,
    ];

    /// Returns the method name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Doolittle => "Doolittle",
            Self::Crout => "Crout",
            Self::Cholesky => "Cholesky",
            Self::SimpleGaussianElimination => "Simple Gaussian Elimination",
            Self::PivotGaussianElimination => "Pivot Gaussian Elimination",
            Self::LuGaussianElimination => "LU Gaussian Elimination",
        }
    }
}

impl fmt::Display for DirectMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DirectMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "doolittle" => Ok(Self::Doolittle),
            "crout" => Ok(Self::Crout),
            "cholesky" => Ok(Self::Cholesky),
            "simplegaussianelimination" | "simplegaussian" | "gaussian" => {
                Ok(Self::SimpleGaussianElimination)
            }
            "pivotgaussianelimination" | "pivotgaussian" | "pivot" => {
                Ok(Self::PivotGaussianElimination)
            }
            "lugaussianelimination" | "lugaussian" | "lu" | "ludecomposition" => {
                Ok(Self::LuGaussianElimination)
            }
            _ => Err(MathError::invalid_input(format!(
                "unknown direct method '{s}'"
            ))),
        }
    }
}

/// Outcome of a direct solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorizationResult {
    /// Method that produced the result.
    pub method: DirectMethod,
    /// `Solved` or the failure status.
    pub status: Status,
    /// Human-readable summary.
    pub message: String,
    /// Lower factor, for the LU family and Cholesky.
    pub lower: Option<DMatrix<f64>>,
    /// Upper factor, or the reduced matrix for Gaussian elimination.
    pub upper: Option<DMatrix<f64>>,
    /// Row order after pivoting: row `i` of `PA` is row `permutation[i]` of `A`.
    pub permutation: Option<Vec<usize>>,
    /// The solution vector.
    pub solution: Option<DVector<f64>>,
}

impl FactorizationResult {
    /// True if the system was solved.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// What a successful solve hands back to [`run_direct`].
#[derive(Debug, Clone)]
pub(crate) struct Factorization {
    pub lower: Option<DMatrix<f64>>,
    pub upper: Option<DMatrix<f64>>,
    pub permutation: Option<Vec<usize>>,
    pub solution: DVector<f64>,
}

impl Factorization {
    /// Rejects factors or a solution that overflowed.
    fn ensure_finite(self) -> MathResult<Self> {
        let finite = |m: &Option<DMatrix<f64>>| m.iter().flatten().all(|v| v.is_finite());
        if !finite(&self.lower) {
            return Err(MathError::NonFinite { stage: "lower factor" });
        }
        if !finite(&self.upper) {
            return Err(MathError::NonFinite { stage: "upper factor" });
        }
        if !self.solution.iter().all(|v| v.is_finite()) {
            return Err(MathError::NonFinite { stage: "solution" });
        }
        Ok(self)
    }
}

/// Validates the system, runs `solve` and folds the outcome into a result.
pub(crate) fn run_direct<S>(
    method: DirectMethod,
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    solve: S,
) -> FactorizationResult
where
    S: FnOnce(&DMatrix<f64>, &DVector<f64>) -> MathResult<Factorization>,
{
    log::debug!("{} on a {}x{} system", method, a.nrows(), a.ncols());
    match validate_system(a, b)
        .and_then(|()| solve(a, b))
        .and_then(Factorization::ensure_finite)
    {
        Ok(f) => FactorizationResult {
            method,
            status: Status::Solved,
            message: "Success".to_string(),
            lower: f.lower,
            upper: f.upper,
            permutation: f.permutation,
            solution: Some(f.solution),
        },
        Err(e) => {
            log::warn!("{} failed: {}", method, e);
            FactorizationResult {
                method,
                status: e.status(),
                message: format!("Error: {e}"),
                lower: None,
                upper: None,
                permutation: None,
                solution: None,
            }
        }
    }
}

/// Solves `Ax = b` with the given method.
pub fn solve_direct(
    method: DirectMethod,
    a: &DMatrix<f64>,
    b: &DVector<f64>,
) -> FactorizationResult {
    match method {
        DirectMethod::Doolittle => doolittle(a, b),
        DirectMethod::Crout => crout(a, b),
        DirectMethod::Cholesky => cholesky(a, b),
        DirectMethod::SimpleGaussianElimination => simple_gaussian_elimination(a, b),
        DirectMethod::PivotGaussianElimination => pivot_gaussian_elimination(a, b),
        DirectMethod::LuGaussianElimination => lu_gaussian_elimination(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spd_system() -> (DMatrix<f64>, DVector<f64>) {
        let a = DMatrix::from_row_slice(
            3,
            3,
            &[4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0],
        );
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        (a, b)
    }

    #[test]
    fn test_all_methods_agree() {
        let (a, b) = spd_system();
        let reference = solve_direct(DirectMethod::PivotGaussianElimination, &a, &b)
            .solution
            .unwrap();
        for method in DirectMethod::ALL {
            let result = solve_direct(method, &a, &b);
            assert_eq!(result.status, Status::Solved, "{method}");
            let x = result.solution.unwrap();
            for i in 0..3 {
                assert_relative_eq!(x[i], reference[i], epsilon = 1e-9);
            }
            let residual = &a * &x - &b;
            assert!(residual.amax() < 1e-9, "{method}");
        }
    }

    #[test]
    fn test_dimension_mismatch_is_invalid_input() {
        let (a, _) = spd_system();
        let b = DVector::from_vec(vec![1.0, 2.0]);
        for method in DirectMethod::ALL {
            let result = solve_direct(method, &a, &b);
            assert_eq!(result.status, Status::InvalidInput);
            assert!(result.solution.is_none());
        }
    }

    #[test]
    fn test_method_names() {
        for method in DirectMethod::ALL {
            assert_eq!(method.name().parse::<DirectMethod>().unwrap(), method);
        }
        assert!("qr".parse::<DirectMethod>().is_err());
    }
}
