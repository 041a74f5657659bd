//! Fixed-point iteration.

use crate::convergence::{should_stop, ToleranceSpec};
use crate::error::{EvalResult, MathError};
use crate::roots::{
    eval_at, finite_iterate, IterationStep, RootMethod, RootResult, RootRun, DIVERGENCE_BOUND,
};

/// Fixed-point iteration `x_{n+1} = g(x_n)`.
///
/// `g` is usually obtained by rewriting `f(x) = 0` as `x = g(x)`; `f` is
/// only evaluated to report `f(x_n)` and to detect an exact root. The
/// iteration is reported as diverged once an iterate leaves
/// `[-1e15, 1e15]`.
///
/// # Example
///
/// ```rust
/// use numera_math::convergence::ToleranceSpec;
/// use numera_math::roots::fixed_point;
///
/// let spec = ToleranceSpec::new(1e-10, 100).unwrap();
/// let result = fixed_point(|x| Ok(x - x.cos()), |x| Ok(x.cos()), 1.0, &spec);
/// assert!((result.final_estimate.unwrap() - 0.7390851332).abs() < 1e-9);
/// ```
pub fn fixed_point<F, G>(f: F, g: G, x0: f64, spec: &ToleranceSpec) -> RootResult
where
    F: Fn(f64) -> EvalResult,
    G: Fn(f64) -> EvalResult,
{
    let mut run = RootRun::new(RootMethod::FixedPoint, spec);

    match eval_at(&f, x0) {
        Ok(v) if v == 0.0 => return run.exact_root(x0),
        Ok(_) => {}
        Err(e) => return run.fail(e),
    }

    let mut x = x0;
    for iteration in 1..=spec.max_iterations() {
        let next = match g(x).map_err(MathError::from).and_then(|v| finite_iterate(v, iteration)) {
            Ok(v) if v.abs() > DIVERGENCE_BOUND => {
                return run.fail(MathError::diverged(
                    iteration,
                    format!("|x| = {:e} exceeds {DIVERGENCE_BOUND:e}", v.abs()),
                ))
            }
            Ok(v) => v,
            Err(e) => return run.fail(e),
        };
        let fx = match eval_at(&f, next) {
            Ok(v) => v,
            Err(e) => return run.fail(e),
        };

        let decision = should_stop(x, next, iteration, spec);
        run.record(IterationStep::new(iteration, next, fx, decision.error));

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
