//! Secant root-finding algorithm.

use crate::convergence::{should_stop, ToleranceSpec};
use crate::error::{EvalResult, MathError};
use crate::roots::{
    eval_at, finite_iterate, IterationStep, RootMethod, RootResult, RootRun, NEAR_ZERO,
};

/// Secant root-finding algorithm.
///
/// Replaces the derivative in Newton's method with the slope through the
/// last two estimates:
/// `x_{n+1} = x_n - f(x_n) (x_n - x_{n-1}) / (f(x_n) - f(x_{n-1}))`
///
/// Requires `x0 != x1`. Fails with a domain error when the two function
/// values coincide.
pub fn secant<F>(f: F, x0: f64, x1: f64, spec: &ToleranceSpec) -> RootResult
where
    F: Fn(f64) -> EvalResult,
{
    let mut run = RootRun::new(RootMethod::Secant, spec);

    if x0 == x1 {
        return run.fail(MathError::invalid_input(format!(
            "the two starting points must differ, got x0 = x1 = {x0}"
        )));
    }

    let (mut x_prev, mut x) = (x0, x1);
    let mut f_prev = match eval_at(&f, x_prev) {
        Ok(v) => v,
        Err(e) => return run.fail(e),
    };
    if f_prev == 0.0 {
        return run.exact_root(x_prev);
    }
    let mut fx = match eval_at(&f, x) {
        Ok(v) => v,
        Err(e) => return run.fail(e),
    };
    if fx == 0.0 {
        return run.exact_root(x);
    }

    for iteration in 1..=spec.max_iterations() {
        let denominator = fx - f_prev;
        if denominator.abs() < NEAR_ZERO {
            return run.fail(MathError::DivisionByZero { value: denominator });
        }
        let next = match finite_iterate(x - fx * (x - x_prev) / denominator, iteration) {
            Ok(v) => v,
            Err(e) => return run.fail(e),
        };
        let f_next = match eval_at(&f, next) {
            Ok(v) => v,
            Err(e) => return run.fail(e),
        };

        let decision = should_stop(x, next, iteration, spec);
        run.record(IterationStep::new(iteration, next, f_next, decision.error));

        if f_next == 0.0 {
            return run.exact_root(next);
        }
        if decision.converged() {
            return run.converged(next);
        }

        (x_prev, f_prev) = (x, fx);
        (x, fx) = (next, f_next);
    }

    run.exhausted()
}
