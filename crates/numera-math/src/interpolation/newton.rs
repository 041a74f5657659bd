//! Newton's divided differences.

use super::{finish, validate_points, InterpolationMethod, InterpolationResult};

/// Divided-difference table.
///
/// Row `i` holds `f[x_i]`, `f[x_{i-1}, x_i]`, ..., `f[x_0, ..., x_i]`, so
/// the Newton coefficients are the last entry of each row.
pub fn divided_difference_table(x: &[f64], y: &[f64]) -> Vec<Vec<f64>> {
    let n = x.len().min(y.len());
    let mut table: Vec<Vec<f64>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut row = Vec::with_capacity(i + 1);
        row.push(y[i]);
        for j in 1..=i {
            let above = &table[i - 1];
            row.push((row[j - 1] - above[j - 1]) / (x[i] - x[i - j]));
        }
        table.push(row);
    }
    table
}

/// Expands `c_0 + c_1 (x - x_0) + c_2 (x - x_0)(x - x_1) + ...` into
/// monomial coefficients, highest degree first.
fn expand_newton_form(x: &[f64], newton: &[f64]) -> Vec<f64> {
    let Some((&last, rest)) = newton.split_last() else {
        return Vec::new();
    };
    // Lowest degree first while expanding.
    let mut poly = vec![last];
    for (k, &c) in rest.iter().enumerate().rev() {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, &p) in poly.iter().enumerate() {
            next[i + 1] += p;
            next[i] -= x[k] * p;
        }
        next[0] += c;
        poly = next;
    }
    poly.reverse();
    poly
}

/// Interpolates the points with Newton's divided differences.
///
/// # Example
///
/// ```rust
/// use numera_math::interpolation::newton_divided_differences;
///
/// let result = newton_divided_differences(&[1.0, 2.0, 3.0], &[1.0, 4.0, 9.0]);
/// assert_eq!(result.polynomial, "x^2");
/// ```
pub fn newton_divided_differences(x: &[f64], y: &[f64]) -> InterpolationResult {
    let outcome = validate_points(x, y).map(|()| {
        let table = divided_difference_table(x, y);
        let newton: Vec<f64> = table.iter().filter_map(|row| row.last().copied()).collect();
        expand_newton_form(x, &newton)
    });
    finish(InterpolationMethod::NewtonDividedDifferences, outcome)
}
