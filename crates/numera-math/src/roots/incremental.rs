//! Incremental search for a sign change.

use crate::convergence::{step_error, ToleranceSpec};
use crate::error::{EvalResult, MathError};
use crate::roots::{eval_at, IterationStep, RootMethod, RootResult, RootRun};
use crate::status::Status;

/// Scans `x0, x0 + h, x0 + 2h, ...` for the first interval on which `f`
/// changes sign.
///
/// Points are computed as `x0 + i * h` rather than by repeated addition so
/// rounding does not accumulate. On success the result carries the interval
/// in [`RootResult::bracket`] (ordered low to high) and its midpoint as the
/// final estimate. Only the iteration bound of `spec` is used.
pub fn incremental_search<F>(f: F, x0: f64, h: f64, spec: &ToleranceSpec) -> RootResult
where
    F: Fn(f64) -> EvalResult,
{
    let mut run = RootRun::new(RootMethod::IncrementalSearch, spec);

    if h == 0.0 || !h.is_finite() || !x0.is_finite() {
        return run.fail(MathError::invalid_input(format!(
            "the step must be finite and non-zero, got h = {h}"
        )));
    }

    let mut previous = x0;
    let mut f_previous = match eval_at(&f, x0) {
        Ok(v) => v,
        Err(e) => return run.fail(e),
    };
    if f_previous == 0.0 {
        return run.exact_root(x0);
    }

    for iteration in 1..=spec.max_iterations() {
        let x = x0 + iteration as f64 * h;
        let fx = match eval_at(&f, x) {
            Ok(v) => v,
            Err(e) => return run.fail(e),
        };
        let error = step_error(previous, x, spec.error_type());
        run.record(IterationStep::new(iteration, x, fx, error));

        if fx == 0.0 {
            return run.exact_root(x);
        }
        if f_previous * fx < 0.0 {
            let (lo, hi) = (previous.min(x), previous.max(x));
            let message = format!("There is a root of f(x) between {lo} and {hi}");
            return run.finish(
                Status::Converged,
                message,
                Some((lo + hi) / 2.0),
                Some((lo, hi)),
            );
        }

        previous = x;
        f_previous = fx;
    }

    let steps = spec.max_iterations();
    run.finish(
        Status::MaxIterationsReached,
        format!("No sign change found in {steps} steps"),
        Some(previous),
        None,
    )
}
