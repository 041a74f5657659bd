//! Request and response shapes.
//!
//! Field names are camelCase on the wire. Matrices, vectors and point lists
//! travel as text (see [`crate::input`]); results come back as numbers,
//! rounded according to the request's precision settings.

use numera_math::convergence::{
    ErrorType, Norm, PrecisionType, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
use numera_math::interpolation::InterpolationMethod;
use numera_math::linear_algebra::{DirectMethod, IterativeMethod};
use numera_math::roots::RootMethod;
use numera_math::Status;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

// =============================================================================
// ROOT FINDING
// =============================================================================

/// Root-finding request. Which of `a`, `b`, `x0`, `x1`, `h` and
/// `gFunction` are required depends on the method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootRequest {
    /// Method to run.
    pub method: RootMethod,
    /// `f(x)` as text.
    pub function: String,
    /// `g(x)` for fixed-point iteration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g_function: Option<String>,
    /// Lower bracket end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    /// Upper bracket end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    /// Initial guess.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x0: Option<f64>,
    /// Second initial guess (secant).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1: Option<f64>,
    /// Step (incremental search).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    /// Stopping tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration budget.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Absolute or relative error.
    #[serde(default)]
    pub error_type: ErrorType,
    /// Rounding of reported values.
    #[serde(default)]
    pub precision_type: PrecisionType,
    /// Digits for rounding; derived from the tolerance when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digits: Option<u32>,
}

impl RootRequest {
    /// Creates a request with default tolerance settings and no starting
    /// values.
    pub fn new(method: RootMethod, function: impl Into<String>) -> Self {
        Self {
            method,
            function: function.into(),
            g_function: None,
            a: None,
            b: None,
            x0: None,
            x1: None,
            h: None,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            error_type: ErrorType::default(),
            precision_type: PrecisionType::default(),
            digits: None,
        }
    }

    /// Sets the bracket `[a, b]`.
    #[must_use]
    pub fn with_bracket(mut self, a: f64, b: f64) -> Self {
        self.a = Some(a);
        self.b = Some(b);
        self
    }

    /// Sets the initial guess.
    #[must_use]
    pub fn with_x0(mut self, x0: f64) -> Self {
        self.x0 = Some(x0);
        self
    }

    /// Sets the second initial guess.
    #[must_use]
    pub fn with_x1(mut self, x1: f64) -> Self {
        self.x1 = Some(x1);
        self
    }

    /// Sets the incremental-search step.
    #[must_use]
    pub fn with_step(mut self, h: f64) -> Self {
        self.h = Some(h);
        self
    }

    /// Sets `g(x)`.
    #[must_use]
    pub fn with_g_function(mut self, g: impl Into<String>) -> Self {
        self.g_function = Some(g.into());
        self
    }

    /// Sets tolerance and iteration budget.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64, max_iterations: usize) -> Self {
        self.tolerance = tolerance;
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the error type.
    #[must_use]
    pub fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = error_type;
        self
    }

    /// Sets the precision type and, optionally, the digit count.
    #[must_use]
    pub fn with_precision(mut self, precision_type: PrecisionType, digits: Option<u32>) -> Self {
        self.precision_type = precision_type;
        self.digits = digits;
        self
    }
}

/// Root-finding response: the iteration table as parallel columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootResponse {
    /// Method that ran.
    pub method: RootMethod,
    /// Terminal status.
    pub status: Status,
    /// Human-readable summary.
    pub message: String,
    /// Iteration indices.
    pub iterations: Vec<usize>,
    /// Estimates.
    pub estimates: Vec<f64>,
    /// `f` at each estimate.
    pub function_values: Vec<f64>,
    /// Errors.
    pub errors: Vec<f64>,
    /// `f'` at each estimate (Newton-Raphson, multiple roots).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivatives: Option<Vec<f64>>,
    /// `f''` at each estimate (multiple roots).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_derivatives: Option<Vec<f64>>,
    /// Last estimate.
    pub final_estimate: Option<f64>,
    /// Sign-change interval (incremental search).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket: Option<(f64, f64)>,
}

impl RootResponse {
    /// A response for a request that failed before any computation.
    pub fn rejected(method: RootMethod, status: Status, message: impl Into<String>) -> Self {
        Self {
            method,
            status,
            message: message.into(),
            iterations: Vec::new(),
            estimates: Vec::new(),
            function_values: Vec::new(),
            errors: Vec::new(),
            derivatives: None,
            second_derivatives: None,
            final_estimate: None,
            bracket: None,
        }
    }
}

// =============================================================================
// DIRECT LINEAR SYSTEMS
// =============================================================================

/// Direct linear-system request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectRequest {
    /// Method to run.
    pub method: DirectMethod,
    /// Coefficient matrix text.
    pub matrix: String,
    /// Right-hand side text.
    pub vector: String,
    /// Rounding of reported values.
    #[serde(default)]
    pub precision_type: PrecisionType,
    /// Digits for rounding; values are reported exactly when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digits: Option<u32>,
}

impl DirectRequest {
    /// Creates a request with exact output.
    pub fn new(method: DirectMethod, matrix: impl Into<String>, vector: impl Into<String>) -> Self {
        Self {
            method,
            matrix: matrix.into(),
            vector: vector.into(),
            precision_type: PrecisionType::default(),
            digits: None,
        }
    }
}

/// Direct linear-system response. Matrices are row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectResponse {
    /// Method that ran.
    pub method: DirectMethod,
    /// `Solved` or the failure status.
    pub status: Status,
    /// Human-readable summary.
    pub message: String,
    /// Solution vector.
    pub solution: Option<Vec<f64>>,
    /// Lower factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<Vec<Vec<f64>>>,
    /// Upper factor or reduced matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Vec<Vec<f64>>>,
    /// Row order after pivoting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permutation: Option<Vec<usize>>,
}

impl DirectResponse {
    /// A response for a request that failed before any computation.
    pub fn rejected(method: DirectMethod, status: Status, message: impl Into<String>) -> Self {
        Self {
            method,
            status,
            message: message.into(),
            solution: None,
            lower: None,
            upper: None,
            permutation: None,
        }
    }
}

// =============================================================================
// ITERATIVE LINEAR SYSTEMS
// =============================================================================

/// Iterative linear-system request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterativeRequest {
    /// Method to run.
    pub method: IterativeMethod,
    /// Coefficient matrix text.
    pub matrix: String,
    /// Right-hand side text.
    pub vector: String,
    /// Initial guess text.
    pub initial_guess: String,
    /// Stopping tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration budget.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Absolute or relative error.
    #[serde(default)]
    pub error_type: ErrorType,
    /// Rounding of reported values.
    #[serde(default)]
    pub precision_type: PrecisionType,
    /// Norm of the iterate delta.
    #[serde(default)]
    pub norm: Norm,
    /// SOR relaxation factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relaxation: Option<f64>,
    /// Digits for rounding; derived from the tolerance when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digits: Option<u32>,
}

impl IterativeRequest {
    /// Creates a request with default tolerance settings.
    pub fn new(
        method: IterativeMethod,
        matrix: impl Into<String>,
        vector: impl Into<String>,
        initial_guess: impl Into<String>,
    ) -> Self {
        Self {
            method,
            matrix: matrix.into(),
            vector: vector.into(),
            initial_guess: initial_guess.into(),
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            error_type: ErrorType::default(),
            precision_type: PrecisionType::default(),
            norm: Norm::default(),
            relaxation: None,
            digits: None,
        }
    }

    /// Sets tolerance and iteration budget.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64, max_iterations: usize) -> Self {
        self.tolerance = tolerance;
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the norm.
    #[must_use]
    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    /// Sets the SOR relaxation factor.
    #[must_use]
    pub fn with_relaxation(mut self, w: f64) -> Self {
        self.relaxation = Some(w);
        self
    }
}

/// Iterative linear-system response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterativeResponse {
    /// Method that ran.
    pub method: IterativeMethod,
    /// Terminal status.
    pub status: Status,
    /// Human-readable summary.
    pub message: String,
    /// Iteration indices.
    pub iterations: Vec<usize>,
    /// Errors.
    pub errors: Vec<f64>,
    /// Iterates, one per iteration.
    pub iterates: Vec<Vec<f64>>,
    /// Last finite iterate.
    pub solution: Option<Vec<f64>>,
    /// Spectral radius of the iteration matrix.
    pub spectral_radius: Option<f64>,
}

impl IterativeResponse {
    /// A response for a request that failed before any computation.
    pub fn rejected(method: IterativeMethod, status: Status, message: impl Into<String>) -> Self {
        Self {
            method,
            status,
            message: message.into(),
            iterations: Vec::new(),
            errors: Vec::new(),
            iterates: Vec::new(),
            solution: None,
            spectral_radius: None,
        }
    }
}

// =============================================================================
// INTERPOLATION
// =============================================================================

/// Interpolation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolationRequest {
    /// Method to run.
    pub method: InterpolationMethod,
    /// x values text.
    pub x: String,
    /// y values text.
    pub y: String,
    /// Rounding of reported coefficients.
    #[serde(default)]
    pub precision_type: PrecisionType,
    /// Digits for rounding; coefficients are reported exactly when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digits: Option<u32>,
}

impl InterpolationRequest {
    /// Creates a request with exact output.
    pub fn new(method: InterpolationMethod, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            method,
            x: x.into(),
            y: y.into(),
            precision_type: PrecisionType::default(),
            digits: None,
        }
    }
}

/// Interpolation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolationResponse {
    /// Method that ran.
    pub method: InterpolationMethod,
    /// `Solved` or the failure status.
    pub status: Status,
    /// Human-readable summary.
    pub message: String,
    /// Coefficients, highest degree first.
    pub coefficients: Vec<f64>,
    /// Rendered polynomial.
    pub polynomial: String,
}

impl InterpolationResponse {
    /// A response for a request that failed before any computation.
    pub fn rejected(
        method: InterpolationMethod,
        status: Status,
        message: impl Into<String>,
    ) -> Self {
        Self {
            method,
            status,
            message: message.into(),
            coefficients: Vec::new(),
            polynomial: String::new(),
        }
    }
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// Any request the engine accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Request {
    /// Root finding.
    Root(RootRequest),
    /// Direct linear system.
    Direct(DirectRequest),
    /// Iterative linear system.
    Iterative(IterativeRequest),
    /// Interpolation.
    Interpolation(InterpolationRequest),
}

impl Request {
    /// Parses a request from JSON.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Name of the requested method.
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::Root(r) => r.method.name(),
            Self::Direct(r) => r.method.name(),
            Self::Iterative(r) => r.method.name(),
            Self::Interpolation(r) => r.method.name(),
        }
    }
}

impl From<RootRequest> for Request {
    fn from(r: RootRequest) -> Self {
        Self::Root(r)
    }
}

impl From<DirectRequest> for Request {
    fn from(r: DirectRequest) -> Self {
        Self::Direct(r)
    }
}

impl From<IterativeRequest> for Request {
    fn from(r: IterativeRequest) -> Self {
        Self::Iterative(r)
    }
}

impl From<InterpolationRequest> for Request {
    fn from(r: InterpolationRequest) -> Self {
        Self::Interpolation(r)
    }
}

/// Any response the engine produces; mirrors [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Response {
    /// Root finding.
    Root(RootResponse),
    /// Direct linear system.
    Direct(DirectResponse),
    /// Iterative linear system.
    Iterative(IterativeResponse),
    /// Interpolation.
    Interpolation(InterpolationResponse),
}

impl Response {
    /// Terminal status.
    pub fn status(&self) -> Status {
        match self {
            Self::Root(r) => r.status,
            Self::Direct(r) => r.status,
            Self::Iterative(r) => r.status,
            Self::Interpolation(r) => r.status,
        }
    }

    /// Human-readable summary.
    pub fn message(&self) -> &str {
        match self {
            Self::Root(r) => &r.message,
            Self::Direct(r) => &r.message,
            Self::Iterative(r) => &r.message,
            Self::Interpolation(r) => &r.message,
        }
    }

    /// Serializes the response as pretty-printed JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
