//! Turns requests into solver calls and solver results into responses.

use nalgebra::DMatrix;
use numera_math::convergence::ToleranceSpec;
use numera_math::expression::{Derivative, Expression};
use numera_math::interpolation::{interpolate, InterpolationResult};
use numera_math::linear_algebra::{
    solve_direct, solve_iterative, FactorizationResult, IterativeLinearResult,
};
use numera_math::roots::{
    bisection, false_position, fixed_point, incremental_search, multiple_roots, newton_raphson,
    secant, IterationStep, RootMethod, RootResult,
};
use tracing::{debug, warn};

use crate::dto::{
    DirectRequest, DirectResponse, InterpolationRequest, InterpolationResponse, IterativeRequest,
    IterativeResponse, RootRequest, RootResponse,
};
use crate::error::{EngineError, EngineResult};
use crate::input::{matrix_rows, parse_matrix, parse_vector};
use crate::rounding::Rounding;

/// How derivatives of a parsed function are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DerivativeMode {
    /// Symbolic, falling back to finite differences where no rule exists.
    Symbolic,
    /// Finite differences only.
    FiniteDifference,
}

impl DerivativeMode {
    fn derivative(self, f: &Expression, order: u32) -> Derivative {
        match self {
            Self::Symbolic => f.derivative(order),
            Self::FiniteDifference => f.numerical_derivative(order),
        }
    }
}

fn parse_function(text: &str, field: &'static str) -> EngineResult<Expression> {
    Expression::parse(text).map_err(|source| EngineError::Expression { field, source })
}

fn require(value: Option<f64>, field: &'static str) -> EngineResult<f64> {
    value.ok_or(EngineError::MissingField(field))
}

// =============================================================================
// ROOT FINDING
// =============================================================================

pub(crate) fn run_root(request: &RootRequest, mode: DerivativeMode) -> RootResponse {
    match try_root(request, mode) {
        Ok(result) => {
            let rounding =
                Rounding::for_tolerance(request.precision_type, request.tolerance, request.digits);
            root_response(result, rounding)
        }
        Err(e) => {
            warn!(method = %request.method, error = %e, "root request rejected");
            RootResponse::rejected(request.method, e.status(), e.to_string())
        }
    }
}

fn try_root(request: &RootRequest, mode: DerivativeMode) -> EngineResult<RootResult> {
    let f = parse_function(&request.function, "function")?;
    let spec = ToleranceSpec::new(request.tolerance, request.max_iterations)?
        .with_error_type(request.error_type)
        .with_precision_type(request.precision_type);
    let eval = |x: f64| f.evaluate(x);

    debug!(method = %request.method, function = %f, "running root finder");
    let result = match request.method {
        RootMethod::Bisection => {
            bisection(eval, require(request.a, "a")?, require(request.b, "b")?, &spec)
        }
        RootMethod::FalsePosition => {
            false_position(eval, require(request.a, "a")?, require(request.b, "b")?, &spec)
        }
        RootMethod::IncrementalSearch => {
            incremental_search(eval, require(request.x0, "x0")?, require(request.h, "h")?, &spec)
        }
        RootMethod::FixedPoint => {
            let text = request
                .g_function
                .as_deref()
                .ok_or(EngineError::MissingField("gFunction"))?;
            let g = parse_function(text, "gFunction")?;
            fixed_point(eval, |x| g.evaluate(x), require(request.x0, "x0")?, &spec)
        }
        RootMethod::NewtonRaphson => {
            let df = mode.derivative(&f, 1);
            newton_raphson(eval, |x| df.evaluate(x), require(request.x0, "x0")?, &spec)
        }
        RootMethod::Secant => {
            secant(eval, require(request.x0, "x0")?, require(request.x1, "x1")?, &spec)
        }
        RootMethod::MultipleRoots => {
            let df = mode.derivative(&f, 1);
            let d2f = mode.derivative(&f, 2);
            multiple_roots(
                eval,
                |x| df.evaluate(x),
                |x| d2f.evaluate(x),
                require(request.x0, "x0")?,
                &spec,
            )
        }
    };
    Ok(result)
}

fn root_response(result: RootResult, rounding: Rounding) -> RootResponse {
    let column = |pick: fn(&IterationStep) -> f64| -> Vec<f64> {
        result.steps.iter().map(|s| rounding.apply(pick(s))).collect()
    };
    let optional_column =
        |pick: fn(&IterationStep) -> Option<f64>| -> Option<Vec<f64>> {
            if result.steps.is_empty() || result.steps.iter().any(|s| pick(s).is_none()) {
                return None;
            }
            Some(
                result
                    .steps
                    .iter()
                    .filter_map(|s| pick(s).map(|v| rounding.apply(v)))
                    .collect(),
            )
        };

    RootResponse {
        method: result.method,
        status: result.status,
        message: result.message.clone(),
        iterations: result.steps.iter().map(|s| s.index).collect(),
        estimates: column(|s| s.estimate),
        function_values: column(|s| s.function_value),
        errors: column(|s| s.error),
        derivatives: optional_column(|s| s.derivative),
        second_derivatives: optional_column(|s| s.second_derivative),
        final_estimate: rounding.apply_opt(result.final_estimate),
        bracket: result
            .bracket
            .map(|(lo, hi)| (rounding.apply(lo), rounding.apply(hi))),
    }
}

// =============================================================================
// DIRECT LINEAR SYSTEMS
// =============================================================================

pub(crate) fn run_direct(request: &DirectRequest) -> DirectResponse {
    let parsed =
        parse_matrix(&request.matrix).and_then(|a| Ok((a, parse_vector(&request.vector)?)));
    match parsed {
        Ok((a, b)) => {
            debug!(method = %request.method, n = a.nrows(), "running direct solver");
            let rounding = Rounding::optional(request.precision_type, request.digits);
            direct_response(solve_direct(request.method, &a, &b), rounding)
        }
        Err(e) => {
            warn!(method = %request.method, error = %e, "direct request rejected");
            DirectResponse::rejected(request.method, e.status(), e.to_string())
        }
    }
}

fn direct_response(result: FactorizationResult, rounding: Rounding) -> DirectResponse {
    let round_matrix = |m: &DMatrix<f64>| -> Vec<Vec<f64>> {
        matrix_rows(m)
            .into_iter()
            .map(|row| rounding.apply_all(&row))
            .collect()
    };
    DirectResponse {
        method: result.method,
        status: result.status,
        message: result.message,
        solution: result.solution.map(|x| rounding.apply_all(x.as_slice())),
        lower: result.lower.as_ref().map(round_matrix),
        upper: result.upper.as_ref().map(round_matrix),
        permutation: result.permutation,
    }
}

// =============================================================================
// ITERATIVE LINEAR SYSTEMS
// =============================================================================

pub(crate) fn run_iterative(request: &IterativeRequest) -> IterativeResponse {
    match try_iterative(request) {
        Ok(result) => {
            let rounding =
                Rounding::for_tolerance(request.precision_type, request.tolerance, request.digits);
            iterative_response(result, rounding)
        }
        Err(e) => {
            warn!(method = %request.method, error = %e, "iterative request rejected");
            IterativeResponse::rejected(request.method, e.status(), e.to_string())
        }
    }
}

fn try_iterative(request: &IterativeRequest) -> EngineResult<IterativeLinearResult> {
    let a = parse_matrix(&request.matrix)?;
    let b = parse_vector(&request.vector)?;
    let x0 = parse_vector(&request.initial_guess)?;
    let spec = ToleranceSpec::new(request.tolerance, request.max_iterations)?
        .with_error_type(request.error_type)
        .with_precision_type(request.precision_type)
        .with_norm(request.norm);

    debug!(
        method = %request.method,
        n = a.nrows(),
        norm = %request.norm,
        "running iterative solver"
    );
    Ok(solve_iterative(
        request.method,
        &a,
        &b,
        &x0,
        request.relaxation,
        &spec,
    ))
}

fn iterative_response(result: IterativeLinearResult, rounding: Rounding) -> IterativeResponse {
    IterativeResponse {
        method: result.method,
        status: result.status,
        message: result.message,
        iterations: result.steps.iter().map(|s| s.index).collect(),
        errors: result.steps.iter().map(|s| rounding.apply(s.error)).collect(),
        iterates: result
            .steps
            .iter()
            .map(|s| rounding.apply_all(s.iterate.as_slice()))
            .collect(),
        solution: result
            .final_iterate
            .map(|x| rounding.apply_all(x.as_slice())),
        spectral_radius: rounding.apply_opt(result.spectral_radius),
    }
}

// =============================================================================
// INTERPOLATION
// =============================================================================

pub(crate) fn run_interpolation(request: &InterpolationRequest) -> InterpolationResponse {
    let parsed = parse_vector(&request.x).and_then(|x| Ok((x, parse_vector(&request.y)?)));
    match parsed {
        Ok((x, y)) => {
            debug!(method = %request.method, points = x.len(), "running interpolation");
            let rounding = Rounding::optional(request.precision_type, request.digits);
            let result = interpolate(request.method, x.as_slice(), y.as_slice());
            interpolation_response(result, rounding)
        }
        Err(e) => {
            warn!(method = %request.method, error = %e, "interpolation request rejected");
            InterpolationResponse::rejected(request.method, e.status(), e.to_string())
        }
    }
}

fn interpolation_response(
    result: InterpolationResult,
    rounding: Rounding,
) -> InterpolationResponse {
    InterpolationResponse {
        method: result.method,
        status: result.status,
        message: result.message,
        coefficients: rounding.apply_all(&result.coefficients),
        polynomial: result.polynomial,
    }
}
