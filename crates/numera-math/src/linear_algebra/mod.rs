//! Linear-system solvers.
//!
//! [`direct`] factors or eliminates the coefficient matrix and solves in a
//! fixed number of steps; [`iterative`] refines an initial guess until the
//! convergence policy is satisfied. Both take `&DMatrix`/`&DVector` and work
//! on private copies, and both fold failures into their result records.
//!
//! The helpers in this module are shared by both families.

pub mod direct;
pub mod iterative;

pub use direct::{
    cholesky, cholesky_factor, crout, crout_factors, doolittle, doolittle_factors,
    lu_gaussian_elimination, lu_partial_pivot, pivot_gaussian_elimination,
    simple_gaussian_elimination, solve_direct, DirectMethod, FactorizationResult,
};
pub use iterative::{
    gauss_seidel, iteration_matrix, jacobi, solve_iterative, sor, spectral_radius,
    IterativeLinearResult, IterativeMethod, IterativeStep, DIVERGENCE_WINDOW,
};

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Pivots with a magnitude below this are treated as zero.
pub const PIVOT_EPSILON: f64 = 1e-12;

/// Checks that `a` is square, non-empty and matches `b` in length, and that
/// every entry is finite.
pub fn validate_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<()> {
    let n = a.nrows();
    if n == 0 {
        return Err(MathError::invalid_input("the coefficient matrix is empty"));
    }
    if n != a.ncols() {
        return Err(MathError::invalid_input(format!(
            "the coefficient matrix must be square, got {}x{}",
            n,
            a.ncols()
        )));
    }
    if n != b.len() {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: n,
            rows2: b.len(),
            cols2: 1,
        });
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("the system contains non-finite values"));
    }
    Ok(())
}

/// Solves `Lx = b` for lower-triangular `L`.
pub fn forward_substitution(l: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let n = l.nrows();
    let mut x = DVector::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[(i, j)] * x[j];
        }
        let pivot = l[(i, i)];
        if pivot.abs() < PIVOT_EPSILON {
            return Err(MathError::SingularMatrix { row: i, value: pivot });
        }
        x[i] = sum / pivot;
    }
    Ok(x)
}

/// Solves `Ux = y` for upper-triangular `U`.
pub fn back_substitution(u: &DMatrix<f64>, y: &DVector<f64>) -> MathResult<DVector<f64>> {
    let n = u.nrows();
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in i + 1..n {
            sum -= u[(i, j)] * x[j];
        }
        let pivot = u[(i, i)];
        if pivot.abs() < PIVOT_EPSILON {
            return Err(MathError::SingularMatrix { row: i, value: pivot });
        }
        x[i] = sum / pivot;
    }
    Ok(x)
}

/// Returns true if `|a_ii| >= sum_{j != i} |a_ij|` for every row.
pub fn is_diagonally_dominant(a: &DMatrix<f64>) -> bool {
    a.row_iter().enumerate().all(|(i, row)| {
        let off_diagonal: f64 = row
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, v)| v.abs())
            .sum();
        row[i].abs() >= off_diagonal
    })
}
