//! Integration tests for the root-finding methods driven by parsed
//! expressions.

use approx::assert_relative_eq;
use numera_math::prelude::*;

// =============================================================================
// HELPERS
// =============================================================================

fn parse(text: &str) -> Expression {
    Expression::parse(text).unwrap()
}

fn spec(tolerance: f64, max_iterations: usize) -> ToleranceSpec {
    ToleranceSpec::new(tolerance, max_iterations).unwrap()
}

fn assert_strictly_decreasing(result: &RootResult) {
    for pair in result.steps.windows(2) {
        assert!(
            pair[1].error < pair[0].error,
            "{}: error grew from {} to {}",
            result.method,
            pair[0].error,
            pair[1].error
        );
    }
}

// =============================================================================
// BRACKETING METHODS
// =============================================================================

#[test]
fn test_bisection_cubic() {
    let f = parse("x^3 - x - 2");
    let result = bisection(|x| f.evaluate(x), 1.0, 2.0, &spec(1e-4, 50));

    assert_eq!(result.status, Status::Converged);
    assert_relative_eq!(result.final_estimate.unwrap(), 1.5214, epsilon = 1e-3);
    assert!(result.steps.last().unwrap().error <= 1e-4);
    assert!(result.message.starts_with("The approximate solution is:"));
}

#[test]
fn test_bisection_errors_halve() {
    let f = parse("x^3 - x - 2");
    let result = bisection(|x| f.evaluate(x), 1.0, 2.0, &spec(1e-6, 100));

    assert_relative_eq!(result.steps[0].error, 0.5);
    for pair in result.steps.windows(2) {
        assert_relative_eq!(pair[1].error, pair[0].error / 2.0);
    }
}

#[test]
fn test_bracketing_methods_agree() {
    let f = parse("exp(-x) - x");
    let tol = spec(1e-10, 200);
    let b = bisection(|x| f.evaluate(x), 0.0, 1.0, &tol);
    let fp = false_position(|x| f.evaluate(x), 0.0, 1.0, &tol);

    assert!(b.is_success() && fp.is_success());
    assert_relative_eq!(
        b.final_estimate.unwrap(),
        fp.final_estimate.unwrap(),
        epsilon = 1e-8
    );
    assert!(fp.iterations() < b.iterations());
}

#[test]
fn test_inadequate_interval() {
    let f = parse("x^2 + 1");
    let result = bisection(|x| f.evaluate(x), -1.0, 1.0, &spec(1e-6, 50));
    assert_eq!(result.status, Status::InvalidBracket);
    assert!(result.message.contains("The interval is inadequate"));
    assert!(result.steps.is_empty());
}

#[test]
fn test_incremental_search_then_bisection() {
    let f = parse("sin(x) - 0.5");
    let scan = incremental_search(|x| f.evaluate(x), 0.0, 0.1, &spec(1e-7, 100));

    assert_eq!(scan.status, Status::Converged);
    let (lo, hi) = scan.bracket.unwrap();
    assert!(lo < std::f64::consts::FRAC_PI_6 && std::f64::consts::FRAC_PI_6 < hi);

    let refined = bisection(|x| f.evaluate(x), lo, hi, &spec(1e-12, 100));
    assert_relative_eq!(
        refined.final_estimate.unwrap(),
        std::f64::consts::FRAC_PI_6,
        epsilon = 1e-10
    );
}

// =============================================================================
// OPEN METHODS
// =============================================================================

#[test]
fn test_newton_and_secant_sqrt2() {
    let f = parse("x^2 - 2");
    let df = f.derivative(1);
    let tol = spec(1e-6, 50);

    let newton = newton_raphson(|x| f.evaluate(x), |x| df.evaluate(x), 1.4, &tol);
    let sec = secant(|x| f.evaluate(x), 1.4, 1.5, &tol);

    for result in [&newton, &sec] {
        assert_eq!(result.status, Status::Converged, "{}", result.method);
        assert_relative_eq!(
            result.final_estimate.unwrap(),
            std::f64::consts::SQRT_2,
            epsilon = 1e-6
        );
        assert_strictly_decreasing(result);
    }
    assert!(newton.steps.iter().all(|s| s.derivative.is_some()));
}

#[test]
fn test_fixed_point_cosine() {
    let f = parse("x - cos(x)");
    let g = parse("cos(x)");
    let result = fixed_point(|x| f.evaluate(x), |x| g.evaluate(x), 1.0, &spec(1e-8, 200));

    assert_eq!(result.status, Status::Converged);
    assert_relative_eq!(result.final_estimate.unwrap(), 0.739_085_133_2, epsilon = 1e-7);
}

#[test]
fn test_multiple_roots_beats_newton_on_double_root() {
    let f = parse("(x - 1)^2 * (x + 2)");
    let df = f.derivative(1);
    let d2f = f.derivative(2);
    let tol = spec(1e-10, 100);

    let modified = multiple_roots(
        |x| f.evaluate(x),
        |x| df.evaluate(x),
        |x| d2f.evaluate(x),
        2.0,
        &tol,
    );
    let plain = newton_raphson(|x| f.evaluate(x), |x| df.evaluate(x), 2.0, &tol);

    assert!(modified.is_success());
    assert_relative_eq!(modified.final_estimate.unwrap(), 1.0, epsilon = 1e-6);
    assert!(modified.iterations() < plain.iterations());
    assert!(modified.steps.iter().all(|s| s.second_derivative.is_some()));
}

#[test]
fn test_domain_error_keeps_history() {
    // g(16) = 1, then g(1) = -2, where f is undefined.
    let f = parse("x - sqrt(x) + 3");
    let g = parse("sqrt(x) - 3");
    let result = fixed_point(|x| f.evaluate(x), |x| g.evaluate(x), 16.0, &spec(1e-12, 50));

    assert_eq!(result.status, Status::DomainError);
    assert_eq!(result.iterations(), 1);
    assert_relative_eq!(result.steps[0].estimate, 1.0);
    assert!(result.message.contains("sqrt"));
}

// =============================================================================
// SHARED PROPERTIES
// =============================================================================

#[test]
fn test_single_iteration_budget() {
    let f = parse("x^3 - x - 2");
    let df = f.derivative(1);
    let tol = spec(1e-12, 1);

    let results = [
        bisection(|x| f.evaluate(x), 1.0, 2.0, &tol),
        false_position(|x| f.evaluate(x), 1.0, 2.0, &tol),
        newton_raphson(|x| f.evaluate(x), |x| df.evaluate(x), 1.0, &tol),
        secant(|x| f.evaluate(x), 1.0, 2.0, &tol),
    ];
    for result in results {
        assert_eq!(result.iterations(), 1, "{}", result.method);
        assert_eq!(result.status, Status::MaxIterationsReached, "{}", result.method);
        assert!(result.message.starts_with("Failed in 1 iterations"));
    }
}

#[test]
fn test_identical_inputs_identical_results() {
    let f = parse("x^3 - 2x - 5");
    let df = f.derivative(1);
    let tol = spec(1e-9, 100);

    let first = newton_raphson(|x| f.evaluate(x), |x| df.evaluate(x), 2.0, &tol);
    let second = newton_raphson(|x| f.evaluate(x), |x| df.evaluate(x), 2.0, &tol);
    assert_eq!(first, second);
}

#[test]
fn test_symbolic_and_numerical_derivatives_agree() {
    let f = parse("x * exp(x) - 1");
    let symbolic = f.derivative(1);
    let numerical = f.numerical_derivative(1);
    assert!(symbolic.is_symbolic());
    assert!(!numerical.is_symbolic());

    let tol = spec(1e-10, 50);
    let a = newton_raphson(|x| f.evaluate(x), |x| symbolic.evaluate(x), 1.0, &tol);
    let b = newton_raphson(|x| f.evaluate(x), |x| numerical.evaluate(x), 1.0, &tol);
    assert_relative_eq!(
        a.final_estimate.unwrap(),
        b.final_estimate.unwrap(),
        epsilon = 1e-8
    );
}
