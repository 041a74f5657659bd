//! Gaussian elimination, with and without partial pivoting.

use nalgebra::{DMatrix, DVector};

use super::{run_direct, DirectMethod, Factorization, FactorizationResult};
use crate::error::{MathError, MathResult};
use crate::linear_algebra::{back_substitution, PIVOT_EPSILON};

/// Reduces `[A | b]` to upper-triangular form.
///
/// With `pivot`, the row with the largest entry in column `k` is swapped
/// into position `k` first. Returns the reduced matrix, the reduced
/// right-hand side and the row order.
fn eliminate(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    pivot: bool,
) -> MathResult<(DMatrix<f64>, DVector<f64>, Vec<usize>)> {
    let n = a.nrows();
    let mut u = a.clone();
    let mut rhs = b.clone();
    let mut rows: Vec<usize> = (0..n).collect();

    for k in 0..n {
        if pivot {
            let p = (k..n)
                .max_by(|&i, &j| u[(i, k)].abs().total_cmp(&u[(j, k)].abs()))
                .unwrap_or(k);
            if p != k {
                u.swap_rows(k, p);
                rhs.swap_rows(k, p);
                rows.swap(k, p);
            }
        }

        let diagonal = u[(k, k)];
        if diagonal.abs() < PIVOT_EPSILON {
            return Err(MathError::SingularMatrix { row: k, value: diagonal });
        }

        for i in k + 1..n {
            let factor = u[(i, k)] / diagonal;
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                u[(i, j)] -= factor * u[(k, j)];
            }
            u[(i, k)] = 0.0;
            rhs[i] -= factor * rhs[k];
        }
        log::trace!("elimination stage {k} complete");
    }

    Ok((u, rhs, rows))
}

/// Solves `Ax = b` by Gaussian elimination without row exchanges.
pub fn simple_gaussian_elimination(a: &DMatrix<f64>, b: &DVector<f64>) -> FactorizationResult {
    run_direct(DirectMethod::SimpleGaussianElimination, a, b, |a, b| {
        let (u, rhs, _) = eliminate(a, b, false)?;
        let solution = back_substitution(&u, &rhs)?;
        Ok(Factorization {
            lower: None,
            upper: Some(u),
            permutation: None,
            solution,
        })
    })
}

/// Solves `Ax = b` by Gaussian elimination with partial pivoting.
///
/// Row swaps are applied to the right-hand side as well and reported as a
/// permutation.
pub fn pivot_gaussian_elimination(a: &DMatrix<f64>, b: &DVector<f64>) -> FactorizationResult {
    run_direct(DirectMethod::PivotGaussianElimination, a, b, |a, b| {
        let (u, rhs, rows) = eliminate(a, b, true)?;
        let solution = back_substitution(&u, &rhs)?;
        Ok(Factorization {
            lower: None,
            upper: Some(u),
            permutation: Some(rows),
            solution,
        })
    })
}
