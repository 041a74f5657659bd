//! LU factorizations: Doolittle, Crout, and partial pivoting.

use nalgebra::{DMatrix, DVector};

use super::{run_direct, DirectMethod, Factorization, FactorizationResult};
use crate::error::{MathError, MathResult};
use crate::linear_algebra::{back_substitution, forward_substitution, PIVOT_EPSILON};

/// Doolittle factorization `A = LU` with `diag(L) = 1`.
///
/// No pivoting: fails at the first step `k` whose pivot `u_kk` vanishes.
pub fn doolittle_factors(a: &DMatrix<f64>) -> MathResult<(DMatrix<f64>, DMatrix<f64>)> {
    let n = a.nrows();
    let mut l = DMatrix::identity(n, n);
    let mut u = DMatrix::zeros(n, n);

    for k in 0..n {
        for j in k..n {
            let sum: f64 = (0..k).map(|p| l[(k, p)] * u[(p, j)]).sum();
            u[(k, j)] = a[(k, j)] - sum;
        }
        let pivot = u[(k, k)];
        if pivot.abs() < PIVOT_EPSILON {
            return Err(MathError::SingularMatrix { row: k, value: pivot });
        }
        for i in k + 1..n {
            let sum: f64 = (0..k).map(|p| l[(i, p)] * u[(p, k)]).sum();
            l[(i, k)] = (a[(i, k)] - sum) / pivot;
        }
    }

    Ok((l, u))
}

/// Crout factorization `A = LU` with `diag(U) = 1`.
pub fn crout_factors(a: &DMatrix<f64>) -> MathResult<(DMatrix<f64>, DMatrix<f64>)> {
    let n = a.nrows();
    let mut l = DMatrix::zeros(n, n);
    let mut u = DMatrix::identity(n, n);

    for k in 0..n {
        for i in k..n {
            let sum: f64 = (0..k).map(|p| l[(i, p)] * u[(p, k)]).sum();
            l[(i, k)] = a[(i, k)] - sum;
        }
        let pivot = l[(k, k)];
        if pivot.abs() < PIVOT_EPSILON {
            return Err(MathError::SingularMatrix { row: k, value: pivot });
        }
        for j in k + 1..n {
            let sum: f64 = (0..k).map(|p| l[(k, p)] * u[(p, j)]).sum();
            u[(k, j)] = (a[(k, j)] - sum) / pivot;
        }
    }

    Ok((l, u))
}

/// Partially pivoted factorization `PA = LU`.
///
/// Returns `(L, U, permutation)` where row `i` of `PA` is row
/// `permutation[i]` of `A`.
pub fn lu_partial_pivot(
    a: &DMatrix<f64>,
) -> MathResult<(DMatrix<f64>, DMatrix<f64>, Vec<usize>)> {
    let n = a.nrows();
    let mut l = DMatrix::identity(n, n);
    let mut u = a.clone();
    let mut permutation: Vec<usize> = (0..n).collect();

    for k in 0..n {
        let (offset, pivot) = u
            .view((k, k), (n - k, 1))
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0.0_f64), |best, (i, v)| {
                if v.abs() > best.1.abs() {
                    (i, v)
                } else {
                    best
                }
            });
        if pivot.abs() < PIVOT_EPSILON {
            return Err(MathError::SingularMatrix { row: k, value: pivot });
        }

        let p = k + offset;
        if p != k {
            u.swap_rows(k, p);
            permutation.swap(k, p);
            for j in 0..k {
                l.swap((k, j), (p, j));
            }
        }

        for i in k + 1..n {
            let factor = u[(i, k)] / u[(k, k)];
            l[(i, k)] = factor;
            for j in k..n {
                u[(i, j)] -= factor * u[(k, j)];
            }
            u[(i, k)] = 0.0;
        }
    }

    Ok((l, u, permutation))
}

fn solve_lu(l: &DMatrix<f64>, u: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let y = forward_substitution(l, b)?;
    back_substitution(u, &y)
}

/// Solves `Ax = b` by Doolittle factorization.
pub fn doolittle(a: &DMatrix<f64>, b: &DVector<f64>) -> FactorizationResult {
    run_direct(DirectMethod::Doolittle, a, b, |a, b| {
        let (l, u) = doolittle_factors(a)?;
        let solution = solve_lu(&l, &u, b)?;
        Ok(Factorization {
            lower: Some(l),
            upper: Some(u),
            permutation: None,
            solution,
        })
    })
}

/// Solves `Ax = b` by Crout factorization.
pub fn crout(a: &DMatrix<f64>, b: &DVector<f64>) -> FactorizationResult {
    run_direct(DirectMethod::Crout, a, b, |a, b| {
        let (l, u) = crout_factors(a)?;
        let solution = solve_lu(&l, &u, b)?;
        Ok(Factorization {
            lower: Some(l),
            upper: Some(u),
            permutation: None,
            solution,
        })
    })
}

/// Solves `Ax = b` through `PA = LU`: `Ly = Pb`, then `Ux = y`.
pub fn lu_gaussian_elimination(a: &DMatrix<f64>, b: &DVector<f64>) -> FactorizationResult {
    run_direct(DirectMethod::LuGaussianElimination, a, b, |a, b| {
        let (l, u, permutation) = lu_partial_pivot(a)?;
        let pb = DVector::from_iterator(b.len(), permutation.iter().map(|&i| b[i]));
        let solution = solve_lu(&l, &u, &pb)?;
        Ok(Factorization {
            lower: Some(l),
            upper: Some(u),
            permutation: Some(permutation),
            solution,
        })
    })
}
