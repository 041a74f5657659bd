//! Integration tests for numera-engine.
//!
//! Requests go in through the public API (or JSON) and every backend is
//! checked for the same response shape.

use numera_engine::{
    Backend, DirectRequest, EngineRegistry, InterpolationRequest, IterativeRequest, Request,
    Response, RootRequest,
};
use numera_math::convergence::PrecisionType;
use numera_math::interpolation::InterpolationMethod;
use numera_math::linear_algebra::{DirectMethod, IterativeMethod};
use numera_math::roots::RootMethod;
use numera_math::Status;

// =============================================================================
// TEST FIXTURES
// =============================================================================

/// Diagonally dominant 4x4 system with solution (1, 2, -1, 1).
const MATRIX: &str = "10 -1 2 0; -1 11 -1 3; 2 -1 10 -1; 0 3 -1 8";
const VECTOR: &str = "6 25 -11 15";

fn run_everywhere(request: &Request) -> Vec<Response> {
    let registry = EngineRegistry::new();
    Backend::ALL
        .iter()
        .map(|&backend| registry.execute(backend, request).unwrap())
        .collect()
}

fn root(response: &Response) -> &numera_engine::RootResponse {
    match response {
        Response::Root(r) => r,
        other => panic!("expected a root response, got {other:?}"),
    }
}

// =============================================================================
// BACKEND AGREEMENT
// =============================================================================

#[test]
fn test_backends_agree_on_newton() {
    let request =
        Request::from(RootRequest::new(RootMethod::NewtonRaphson, "x^2 - 2").with_x0(1.0));
    let responses = run_everywhere(&request);

    for response in &responses {
        let r = root(response);
        assert_eq!(r.status, Status::Converged, "{}", r.message);
        assert!((r.final_estimate.unwrap() - 2f64.sqrt()).abs() < 1e-6);
        assert_eq!(r.estimates.len(), r.iterations.len());
        assert_eq!(r.errors.len(), r.iterations.len());
        assert!(r.derivatives.is_some());
        assert!(r.second_derivatives.is_none());
    }
}

#[test]
fn test_backends_agree_on_multiple_roots() {
    let request =
        Request::from(
            RootRequest::new(RootMethod::MultipleRoots, "(x - 1)^2 * (x + 2)").with_x0(0.5),
        );
    for response in run_everywhere(&request) {
        let r = root(&response);
        assert_eq!(r.status, Status::Converged, "{}", r.message);
        assert!((r.final_estimate.unwrap() - 1.0).abs() < 1e-4);
        assert!(r.second_derivatives.is_some());
    }
}

#[test]
fn test_methods_without_derivatives_ignore_the_backend() {
    let request = Request::from(
        RootRequest::new(RootMethod::Bisection, "x^3 - x - 2")
            .with_bracket(1.0, 2.0)
            .with_tolerance(1e-4, 100),
    );
    let responses = run_everywhere(&request);
    assert_eq!(responses[0], responses[1]);
    assert!(root(&responses[0]).derivatives.is_none());
}

// =============================================================================
// REJECTED REQUESTS
// =============================================================================

#[test]
fn test_malformed_matrix_is_a_parse_error() {
    let request = Request::from(DirectRequest::new(DirectMethod::Doolittle, "1 2; 3", "1 2"));
    for response in run_everywhere(&request) {
        let Response::Direct(r) = response else {
            panic!("expected a direct response");
        };
        assert_eq!(r.status, Status::ParseError);
        assert!(r.message.contains("row 2"), "{}", r.message);
        assert!(r.solution.is_none());
        assert!(r.lower.is_none());
    }
}

#[test]
fn test_missing_fields_are_invalid_input() {
    let cases = [
        (RootRequest::new(RootMethod::Bisection, "x").with_x0(1.0), "'a'"),
        (RootRequest::new(RootMethod::FixedPoint, "x - cos(x)").with_x0(1.0), "gFunction"),
        (RootRequest::new(RootMethod::IncrementalSearch, "x").with_x0(1.0), "'h'"),
    ];
    for (request, field) in cases {
        let response = EngineRegistry::new()
            .default_engine()
            .unwrap()
            .execute(&Request::from(request));
        assert_eq!(response.status(), Status::InvalidInput);
        assert!(response.message().contains(field), "{}", response.message());
    }
}

#[test]
fn test_bad_function_text_is_a_parse_error() {
    let request = Request::from(RootRequest::new(RootMethod::NewtonRaphson, "sin(x").with_x0(1.0));
    for response in run_everywhere(&request) {
        assert_eq!(response.status(), Status::ParseError);
        assert!(response.message().contains("function"));
        assert!(root(&response).iterations.is_empty());
    }
}

#[test]
fn test_invalid_tolerance_is_rejected() {
    let request = Request::from(
        RootRequest::new(RootMethod::Secant, "x^2 - 4")
            .with_x0(1.0)
            .with_x1(3.0)
            .with_tolerance(-1.0, 10),
    );
    let response = EngineRegistry::new().execute(Backend::Symbolic, &request).unwrap();
    assert_eq!(response.status(), Status::InvalidInput);
}

// =============================================================================
// LINEAR SYSTEMS
// =============================================================================

#[test]
fn test_direct_methods_solve_the_same_system() {
    for method in DirectMethod::ALL {
        let request = Request::from(DirectRequest {
            digits: Some(8),
            ..DirectRequest::new(method, MATRIX, VECTOR)
        });
        let response = EngineRegistry::new().execute(Backend::Symbolic, &request).unwrap();
        let Response::Direct(r) = response else {
            panic!("expected a direct response");
        };
        assert_eq!(r.status, Status::Solved, "{method}: {}", r.message);
        assert_eq!(r.solution, Some(vec![1.0, 2.0, -1.0, 1.0]), "{method}");
    }
}

#[test]
fn test_iterative_reports_spectral_radius() {
    let request = Request::from(
        IterativeRequest::new(IterativeMethod::GaussSeidel, MATRIX, VECTOR, "0 0 0 0")
            .with_tolerance(1e-6, 100),
    );
    let response = EngineRegistry::new().execute(Backend::Symbolic, &request).unwrap();
    let Response::Iterative(r) = response else {
        panic!("expected an iterative response");
    };
    assert_eq!(r.status, Status::Converged, "{}", r.message);
    assert_eq!(r.iterates.len(), r.iterations.len());
    assert!(r.spectral_radius.unwrap() < 1.0);
    let solution = r.solution.unwrap();
    for (got, want) in solution.iter().zip([1.0, 2.0, -1.0, 1.0]) {
        assert!((got - want).abs() < 1e-5);
    }
}

#[test]
fn test_sor_needs_a_relaxation_factor() {
    let request =
        Request::from(IterativeRequest::new(IterativeMethod::Sor, MATRIX, VECTOR, "0 0 0 0"));
    let response = EngineRegistry::new().execute(Backend::Symbolic, &request).unwrap();
    assert_eq!(response.status(), Status::InvalidInput);

    let request = Request::from(
        IterativeRequest::new(IterativeMethod::Sor, MATRIX, VECTOR, "0 0 0 0").with_relaxation(1.1),
    );
    let response = EngineRegistry::new().execute(Backend::Symbolic, &request).unwrap();
    assert_eq!(response.status(), Status::Converged);
}

// =============================================================================
// INTERPOLATION
// =============================================================================

#[test]
fn test_interpolation_methods_agree() {
    let mut polynomials = Vec::new();
    for method in [
        InterpolationMethod::Vandermonde,
        InterpolationMethod::NewtonDividedDifferences,
    ] {
        let request = Request::from(InterpolationRequest {
            digits: Some(6),
            precision_type: PrecisionType::DecimalPlaces,
            ..InterpolationRequest::new(method, "-1 0 3 4", "15.5 3 8 1")
        });
        let response = EngineRegistry::new().execute(Backend::Symbolic, &request).unwrap();
        let Response::Interpolation(r) = response else {
            panic!("expected an interpolation response");
        };
        assert_eq!(r.status, Status::Solved, "{}", r.message);
        assert_eq!(r.coefficients.len(), 4);
        polynomials.push(r.coefficients);
    }
    assert_eq!(polynomials[0], polynomials[1]);
}

#[test]
fn test_repeated_nodes_are_rejected() {
    let request = Request::from(InterpolationRequest::new(
        InterpolationMethod::NewtonDividedDifferences,
        "1 2 1",
        "1 2 3",
    ));
    let response = EngineRegistry::new().execute(Backend::Symbolic, &request).unwrap();
    assert_eq!(response.status(), Status::InvalidInput);
}

// =============================================================================
// JSON
// =============================================================================

#[test]
fn test_json_request_and_response() {
    let json = r#"{
        "kind": "root",
        "method": "newtonRaphson",
        "function": "exp(x) - 2",
        "x0": 1.0,
        "tolerance": 1e-6,
        "precisionType": "significantDigits",
        "digits": 6
    }"#;
    let request = Request::from_json(json).unwrap();
    assert_eq!(request.method_name(), "Newton-Raphson");

    let response = EngineRegistry::new().execute(Backend::Symbolic, &request).unwrap();
    assert_eq!(response.status(), Status::Converged);
    assert!((root(&response).final_estimate.unwrap() - 0.693_147).abs() < 1e-9);

    let text = response.to_json().unwrap();
    assert!(text.contains("\"kind\": \"root\""));
    assert!(text.contains("\"functionValues\""));

    let back: Response = serde_json::from_str(&text).unwrap();
    assert_eq!(back.status(), response.status());
    assert_eq!(back.message(), response.message());
    assert_eq!(root(&back).iterations, root(&response).iterations);
}

#[test]
fn test_unknown_kind_is_a_json_error() {
    let err = Request::from_json(r#"{"kind": "integrate", "method": "simpson"}"#).unwrap_err();
    assert_eq!(err.status(), Status::ParseError);
}
