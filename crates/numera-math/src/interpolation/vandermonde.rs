//! Interpolation by solving the Vandermonde system.

use nalgebra::{DMatrix, DVector};

use super::{finish, validate_points, InterpolationMethod, InterpolationResult};
use crate::error::MathResult;
use crate::linear_algebra::{back_substitution, forward_substitution, lu_partial_pivot};

/// Builds `V` with `V[i][j] = x_i^(n - j - 1)`.
pub fn vandermonde_matrix(x: &[f64]) -> DMatrix<f64> {
    let n = x.len();
    DMatrix::from_fn(n, n, |i, j| x[i].powi((n - j - 1) as i32))
}

/// Interpolates the points by solving `V a = y` with pivoted LU.
///
/// # Example
///
/// ```rust
/// use numera_math::interpolation::vandermonde;
///
/// let result = vandermonde(&[0.0, 1.0], &[1.0, 3.0]);
/// assert!(result.is_success());
/// assert!((result.evaluate(2.0).unwrap() - 5.0).abs() < 1e-12);
/// ```
pub fn vandermonde(x: &[f64], y: &[f64]) -> InterpolationResult {
    let outcome = validate_points(x, y).and_then(|()| solve(x, y));
    finish(InterpolationMethod::Vandermonde, outcome)
}

fn solve(x: &[f64], y: &[f64]) -> MathResult<Vec<f64>> {
    let (l, u, permutation) = lu_partial_pivot(&vandermonde_matrix(x))?;
    let pb = DVector::from_iterator(y.len(), permutation.iter().map(|&i| y[i]));
    let z = forward_substitution(&l, &pb)?;
    let a = back_substitution(&u, &z)?;
    Ok(a.iter().copied().collect())
}
