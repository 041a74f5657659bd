//! Cholesky factorization.

use nalgebra::{DMatrix, DVector};

use super::{run_direct, DirectMethod, Factorization, FactorizationResult};
use crate::error::{MathError, MathResult};
use crate::linear_algebra::{back_substitution, forward_substitution, PIVOT_EPSILON};

/// Factors a symmetric positive definite matrix as `A = LLᵗ`.
///
/// Fails if `A` is not symmetric, or if some `a_jj - sum_k l_jk^2` is not
/// positive.
pub fn cholesky_factor(a: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    let n = a.nrows();
    for i in 0..n {
        for j in i + 1..n {
            let scale = a[(i, j)].abs().max(a[(j, i)].abs()).max(1.0);
            if (a[(i, j)] - a[(j, i)]).abs() > PIVOT_EPSILON * scale {
                return Err(MathError::NotSymmetric { row: i, col: j });
            }
        }
    }

    let mut l = DMatrix::zeros(n, n);
    for j in 0..n {
        let sum: f64 = (0..j).map(|k| l[(j, k)] * l[(j, k)]).sum();
        let d = a[(j, j)] - sum;
        if d <= 0.0 {
            return Err(MathError::NotPositiveDefinite { row: j, value: d });
        }
        let diagonal = d.sqrt();
        l[(j, j)] = diagonal;

        for i in j + 1..n {
            let sum: f64 = (0..j).map(|k| l[(i, k)] * l[(j, k)]).sum();
            l[(i, j)] = (a[(i, j)] - sum) / diagonal;
        }
    }

    Ok(l)
}

/// Solves `Ax = b` by Cholesky factorization; reports `U = Lᵗ`.
pub fn cholesky(a: &DMatrix<f64>, b: &DVector<f64>) -> FactorizationResult {
    run_direct(DirectMethod::Cholesky, a, b, |a, b| {
        let l = cholesky_factor(a)?;
        let u = l.transpose();
        let y = forward_substitution(&l, b)?;
        let solution = back_substitution(&u, &y)?;
        Ok(Factorization {
            lower: Some(l),
            upper: Some(u),
            permutation: None,
            solution,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_factor() {
        let a = DMatrix::from_row_slice(
            3,
            3,
            &[4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0],
        );
        let l = cholesky_factor(&a).unwrap();
        let expected = DMatrix::from_row_slice(
            3,
            3,
            &[2.0, 0.0, 0.0, 6.0, 1.0, 0.0, -8.0, 5.0, 3.0],
        );
        for (x, y) in l.iter().zip(expected.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
        let product = &l * l.transpose();
        for (x, y) in product.iter().zip(a.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_upper_is_transpose() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 2.0, 2.0, 3.0]);
        let b = DVector::from_vec(vec![6.0, 5.0]);
        let result = cholesky(&a, &b);

        assert_eq!(result.status, Status::Solved);
        let (l, u) = (result.lower.unwrap(), result.upper.unwrap());
        assert_eq!(u, l.transpose());
        assert!(l[(0, 0)] > 0.0 && l[(1, 1)] > 0.0);
        let x = result.solution.unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_not_positive_definite() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        let result = cholesky(&a, &b);
        assert_eq!(result.status, Status::DomainError);
        assert!(result.message.contains("not positive definite"));
    }

    #[test]
    fn test_not_symmetric() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 2.0, 3.0]);
        assert_eq!(
            cholesky_factor(&a).unwrap_err(),
            MathError::NotSymmetric { row: 0, col: 1 }
        );
    }
}
