//! Newton-Raphson root-finding algorithm.

use crate::convergence::{should_stop, ToleranceSpec};
use crate::error::{EvalResult, MathError};
use crate::roots::{
    eval_at, finite_iterate, IterationStep, RootMethod, RootResult, RootRun, NEAR_ZERO,
};

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// Quadratic convergence near a simple root. Fails with a domain error as
/// soon as `|f'(x_n)| < 1e-15`. Each step reports `f` and `f'` at the new
/// estimate.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `x0` - Starting point for the iteration
/// * `spec` - Stopping configuration
///
/// # Example
///
/// ```rust
/// use numera_math::convergence::ToleranceSpec;
/// use numera_math::roots::newton_raphson;
///
/// let spec = ToleranceSpec::new(1e-10, 50).unwrap();
/// let result = newton_raphson(|x| Ok(x * x - 2.0), |x| Ok(2.0 * x), 1.5, &spec);
/// assert!((result.final_estimate.unwrap() - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(f: F, df: DF, x0: f64, spec: &ToleranceSpec) -> RootResult
where
    F: Fn(f64) -> EvalResult,
    DF: Fn(f64) -> EvalResult,
{
    let mut run = RootRun::new(RootMethod::NewtonRaphson, spec);

    let (mut fx, mut dfx) = match eval_at(&f, x0).and_then(|fx| Ok((fx, eval_at(&df, x0)?))) {
        Ok(values) => values,
        Err(e) => return run.fail(e),
    };
    if fx == 0.0 {
        return run.exact_root(x0);
    }

    let mut x = x0;
    for iteration in 1..=spec.max_iterations() {
        if dfx.abs() < NEAR_ZERO {
            return run.fail(MathError::ZeroDerivative { x, value: dfx });
        }
        let next = match finite_iterate(x - fx / dfx, iteration) {
            Ok(v) => v,
            Err(e) => return run.fail(e),
        };
        (fx, dfx) = match eval_at(&f, next).and_then(|fx| Ok((fx, eval_at(&df, next)?))) {
            Ok(values) => values,
            Err(e) => return run.fail(e),
        };

        let decision = should_stop(x, next, iteration, spec);
        run.record(IterationStep {
            derivative: Some(dfx),
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
    use crate::status::Status;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let spec = ToleranceSpec::new(1e-6, 50).unwrap();
        let result = newton_raphson(|x| Ok(x * x - 2.0), |x| Ok(2.0 * x), 1.4, &spec);

        assert_eq!(result.status, Status::Converged);
        assert_relative_eq!(
            result.final_estimate.unwrap(),
            std::f64::consts::SQRT_2,
            epsilon = 1e-10
        );
        assert!(result.iterations() < 6);
        for pair in result.steps.windows(2) {
            assert!(pair[1].error < pair[0].error);
        }
        assert!(result.steps.iter().all(|s| s.derivative.is_some()));
    }

    #[test]
    fn test_cube_root() {
        let spec = ToleranceSpec::new(1e-12, 50).unwrap();
        let result = newton_raphson(|x| Ok(x * x * x - 27.0), |x| Ok(3.0 * x * x), 2.0, &spec);
        assert_relative_eq!(result.final_estimate.unwrap(), 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_derivative() {
        let spec = ToleranceSpec::default();
        let result = newton_raphson(|x| Ok(x * x + 1.0), |x| Ok(2.0 * x), 0.0, &spec);

        assert_eq!(result.status, Status::DomainError);
        assert!(result.steps.is_empty());
        assert!(result.message.contains("Derivative is zero"));
    }

    #[test]
    fn test_starting_point_is_root() {
        let spec = ToleranceSpec::default();
        let result = newton_raphson(|x| Ok(x - 3.0), |_| Ok(1.0), 3.0, &spec);
        assert_eq!(result.status, Status::Converged);
        assert_eq!(result.message, "3 is a root of f(x)");
    }

    #[test]
    fn test_idempotent() {
        let spec = ToleranceSpec::new(1e-9, 50).unwrap();
        let run = || newton_raphson(|x| Ok(x.cos() - x), |x| Ok(-x.sin() - 1.0), 1.0, &spec);
        assert_eq!(run(), run());
    }
}
