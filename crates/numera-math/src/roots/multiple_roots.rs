//! Modified Newton method for roots of multiplicity greater than one.

use crate::convergence::{should_stop, ToleranceSpec};
use crate::error::{EvalResult, MathError, MathResult};
use crate::roots::{
    eval_at, finite_iterate, IterationStep, RootMethod, RootResult, RootRun, NEAR_ZERO,
};

/// Modified Newton iteration:
/// `x_{n+1} = x_n - f f' / (f'^2 - f f'')`
///
/// Applies Newton's method to `f / f'`, which has only simple roots, so
/// convergence stays quadratic at multiple roots of `f` where plain Newton
/// slows to linear. `f'` and `f''` must be evaluable at `x0`. Fails with a
/// domain error when `f'^2` and `f f''` cancel to within rounding.
///
/// # Example
///
/// ```rust
/// use numera_math::convergence::ToleranceSpec;
/// use numera_math::roots::multiple_roots;
///
/// // (x - 1)^2 has a double root at 1
/// let spec = ToleranceSpec::new(1e-10, 50).unwrap();
/// let result = multiple_roots(
///     |x| Ok((x - 1.0) * (x - 1.0)),
///     |x| Ok(2.0 * (x - 1.0)),
///     |_| Ok(2.0),
///     3.0,
///     &spec,
/// );
/// assert!((result.final_estimate.unwrap() - 1.0).abs() < 1e-10);
/// ```
pub fn multiple_roots<F, DF, D2F>(
    f: F,
    df: DF,
    d2f: D2F,
    x0: f64,
    spec: &ToleranceSpec,
) -> RootResult
where
    F: Fn(f64) -> EvalResult,
    DF: Fn(f64) -> EvalResult,
    D2F: Fn(f64) -> EvalResult,
{
    let mut run = RootRun::new(RootMethod::MultipleRoots, spec);
    let evaluate = |x: f64| -> MathResult<(f64, f64, f64)> {
        Ok((eval_at(&f, x)?, eval_at(&df, x)?, eval_at(&d2f, x)?))
    };

    let (mut fx, mut dfx, mut d2fx) = match evaluate(x0) {
        Ok(values) => values,
        Err(e) => return run.fail(e),
    };
    if fx == 0.0 {
        return run.exact_root(x0);
    }

    let mut x = x0;
    for iteration in 1..=spec.max_iterations() {
        // Both terms vanish together at a multiple root, so the test is
        // relative to their size.
        let denominator = dfx * dfx - fx * d2fx;
        if denominator.abs() <= NEAR_ZERO * (dfx * dfx + (fx * d2fx).abs()) {
            return run.fail(MathError::DivisionByZero { value: denominator });
        }
        let next = match finite_iterate(x - fx * dfx / denominator, iteration) {
            Ok(v) => v,
            Err(e) => return run.fail(e),
        };
        (fx, dfx, d2fx) = match evaluate(next) {
            Ok(values) => values,
            Err(e) => return run.fail(e),
        };

        let decision = should_stop(x, next, iteration, spec);
        run.record(IterationStep {
            derivative: Some(dfx),
            second_derivative: Some(d2fx),
            ..IterationStep::new(iteration, next, fx, decision.error)
        });

        if fx == 0.0 {
            return run.exact_root(next);
        }
        if decision.converged() {
            return run.converged(next);
        }
        x = next;
    }

    run.exhausted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roots::newton_raphson;
    use crate::status::Status;
    use approx::assert_relative_eq;

    // (x - 2)^3 (x + 1): triple root at 2
    fn f(x: f64) -> EvalResult {
        Ok((x - 2.0).powi(3) * (x + 1.0))
    }

    fn df(x: f64) -> EvalResult {
        Ok(3.0 * (x - 2.0).powi(2) * (x + 1.0) + (x - 2.0).powi(3))
    }

    fn d2f(x: f64) -> EvalResult {
        Ok(6.0 * (x - 2.0) * (x + 1.0) + 6.0 * (x - 2.0).powi(2))
    }

    #[test]
    fn test_triple_root() {
        let spec = ToleranceSpec::new(1e-8, 100).unwrap();
        let result = multiple_roots(f, df, d2f, 3.0, &spec);

        assert_eq!(result.status, Status::Converged);
        assert_relative_eq!(result.final_estimate.unwrap(), 2.0, epsilon = 1e-6);
        assert!(result
            .steps
            .iter()
            .all(|s| s.derivative.is_some() && s.second_derivative.is_some()));
    }

    #[test]
    fn test_faster_than_newton_at_multiple_root() {
        let spec = ToleranceSpec::new(1e-8, 200).unwrap();
        let modified = multiple_roots(f, df, d2f, 3.0, &spec);
        let plain = newton_raphson(f, df, 3.0, &spec);
        assert!(modified.iterations() < plain.iterations());
    }

    #[test]
    fn test_derivative_not_evaluable() {
        let spec = ToleranceSpec::default();
        let result = multiple_roots(
            |x| Ok(x - 5.0),
            |_| Ok(1.0),
            |_| Err(crate::error::ExprError::DivisionByZero),
            1.0,
            &spec,
        );
        assert_eq!(result.status, Status::DomainError);
        assert!(result.steps.is_empty());
    }
}
