//! False position (regula falsi) root-finding algorithm.

use crate::convergence::{should_stop, ToleranceSpec};
use crate::error::{EvalResult, MathError};
use crate::roots::{
    check_bracket, eval_at, IterationStep, RootMethod, RootResult, RootRun, NEAR_ZERO,
};

/// False position root-finding algorithm.
///
/// Like bisection, but the new point is where the chord through
/// `(a, f(a))` and `(b, f(b))` crosses zero:
/// `c = b - f(b) (b - a) / (f(b) - f(a))`.
///
/// Requires: `f(a) * f(b) < 0`. Fails with a domain error if the chord is
/// horizontal.
pub fn false_position<F>(f: F, a: f64, b: f64, spec: &ToleranceSpec) -> RootResult
where
    F: Fn(f64) -> EvalResult,
{
    let mut run = RootRun::new(RootMethod::FalsePosition, spec);

    let mut bracket = match check_bracket(&f, a, b) {
        Ok(Ok(bracket)) => bracket,
        Ok(Err(root)) => return run.exact_root(root),
        Err(e) => return run.fail(e),
    };

    let mut previous = bracket.lo;
    for iteration in 1..=spec.max_iterations() {
        let denominator = bracket.f_hi - bracket.f_lo;
        if denominator.abs() < NEAR_ZERO {
            return run.fail(MathError::DivisionByZero { value: denominator });
        }
        let c = bracket.hi - bracket.f_hi * (bracket.hi - bracket.lo) / denominator;
        let fc = match eval_at(&f, c) {
            Ok(v) => v,
            Err(e) => return run.fail(e),
        };

        let decision = should_stop(previous, c, iteration, spec);
        run.record(IterationStep::new(iteration, c, fc, decision.error));

        if fc == 0.0 {
            return run.exact_root(c);
        }
        if decision.converged() {
            return run.converged(c);
        }

        bracket.narrow(c, fc);
        previous = c;
    }

    run.exhausted()
}
