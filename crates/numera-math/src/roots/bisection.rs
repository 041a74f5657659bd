//! Bisection root-finding algorithm.

use crate::convergence::{should_stop, ToleranceSpec};
use crate::error::EvalResult;
use crate::roots::{check_bracket, eval_at, IterationStep, RootMethod, RootResult, RootRun};

/// Bisection root-finding algorithm.
///
/// Repeatedly halves `[a, b]`, keeping the half whose endpoints differ in
/// sign. The endpoints may be given in either order.
///
/// Requires: `f(a) * f(b) < 0`. If either endpoint is an exact root it is
/// returned immediately with an empty history. The first error is measured
/// against the lower bound, so the errors are the halving bracket widths.
///
/// # Example
///
/// ```rust
/// use numera_math::convergence::ToleranceSpec;
/// use numera_math::roots::bisection;
///
/// let spec = ToleranceSpec::new(1e-8, 100).unwrap();
/// let result = bisection(|x| Ok(x * x - 2.0), 1.0, 2.0, &spec);
/// assert!((result.final_estimate.unwrap() - std::f64::consts::SQRT_2).abs() < 1e-7);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, spec: &ToleranceSpec) -> RootResult
where
    F: Fn(f64) -> EvalResult,
{
    let mut run = RootRun::new(RootMethod::Bisection, spec);

    let mut bracket = match check_bracket(&f, a, b) {
        Ok(Ok(bracket)) => bracket,
        Ok(Err(root)) => return run.exact_root(root),
        Err(e) => return run.fail(e),
    };

    let mut previous = bracket.lo;
    for iteration in 1..=spec.max_iterations() {
        let mid = (bracket.lo + bracket.hi) / 2.0;
        let f_mid = match eval_at(&f, mid) {
            Ok(v) => v,
            Err(e) => return run.fail(e),
        };

        let decision = should_stop(previous, mid, iteration, spec);
        run.record(IterationStep::new(iteration, mid, f_mid, decision.error));

        if f_mid == 0.0 {
            return run.exact_root(mid);
        }
        if decision.converged() {
            return run.converged(mid);
        }

        bracket.narrow(mid, f_mid);
        previous = mid;
    }

    run.exhausted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convergence::ErrorType;
    use crate::status::Status;
    use approx::assert_relative_eq;

    fn cubic(x: f64) -> EvalResult {
        Ok(x * x * x - x - 2.0)
    }

    #[test]
    fn test_cubic() {
        let spec = ToleranceSpec::new(1e-4, 50).unwrap();
        let result = bisection(cubic, 1.0, 2.0, &spec);

        assert_eq!(result.status, Status::Converged);
        assert_relative_eq!(result.final_estimate.unwrap(), 1.5214, epsilon = 1e-4);
        assert!(result.message.starts_with("The approximate solution is:"));
    }

    #[test]
    fn test_errors_halve() {
        let spec = ToleranceSpec::new(1e-6, 100).unwrap();
        let result = bisection(cubic, 1.0, 2.0, &spec);

        assert_relative_eq!(result.steps[0].error, 0.5);
        for pair in result.steps.windows(2) {
            assert_relative_eq!(pair[1].error, pair[0].error / 2.0, epsilon = 1e-15);
            assert_eq!(pair[1].index, pair[0].index + 1);
        }
        assert!(result.steps.last().unwrap().error <= 1e-6);
    }

    #[test]
    fn test_swapped_endpoints() {
        let spec = ToleranceSpec::new(1e-4, 50).unwrap();
        let forward = bisection(cubic, 1.0, 2.0, &spec);
        let backward = bisection(cubic, 2.0, 1.0, &spec);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_invalid_bracket() {
        let spec = ToleranceSpec::default();
        let result = bisection(|x| Ok(x * x + 1.0), -1.0, 1.0, &spec);

        assert_eq!(result.status, Status::InvalidBracket);
        assert!(result.message.starts_with("The interval is inadequate"));
        assert!(result.steps.is_empty());
        assert!(result.final_estimate.is_none());
    }

    #[test]
    fn test_endpoint_root() {
        let spec = ToleranceSpec::default();
        let result = bisection(|x| Ok(x - 2.0), 2.0, 5.0, &spec);

        assert_eq!(result.status, Status::Converged);
        assert_eq!(result.final_estimate, Some(2.0));
        assert_eq!(result.message, "2 is a root of f(x)");
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_exact_midpoint() {
        let spec = ToleranceSpec::default();
        let result = bisection(|x| Ok(x - 1.5), 1.0, 2.0, &spec);
        assert_eq!(result.status, Status::Converged);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.message, "1.5 is a root of f(x)");
    }

    #[test]
    fn test_single_iteration() {
        let spec = ToleranceSpec::new(1e-6, 1).unwrap();
        let result = bisection(cubic, 1.0, 2.0, &spec);
        assert_eq!(result.status, Status::MaxIterationsReached);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.message, "Failed in 1 iterations");
        assert_eq!(result.final_estimate, Some(1.5));
    }

    #[test]
    fn test_relative_error() {
        let spec = ToleranceSpec::new(1e-6, 100)
            .unwrap()
            .with_error_type(ErrorType::Relative);
        let result = bisection(cubic, 1.0, 2.0, &spec);
        assert_eq!(result.status, Status::Converged);
        assert_relative_eq!(result.steps[0].error, 0.5 / 1.5);
    }

    #[test]
    fn test_domain_error_keeps_history() {
        let spec = ToleranceSpec::new(1e-10, 100).unwrap();
        // Undefined exactly at the second midpoint.
        let f = |x: f64| {
            if x == 1.25 {
                Err(crate::error::ExprError::DivisionByZero)
            } else {
                Ok(x - 1.1)
            }
        };
        let result = bisection(f, 1.0, 2.0, &spec);
        assert_eq!(result.status, Status::DomainError);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.final_estimate, Some(1.5));
    }
}
