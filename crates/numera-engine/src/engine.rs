//! Compute engines and backend selection.
//!
//! Every backend answers the same [`Request`] with the same [`Response`]
//! shape; they differ only in how derivatives are obtained.
//!
//! ```rust
//! use numera_engine::{Backend, EngineRegistry, Request, RootRequest};
//! use numera_math::roots::RootMethod;
//! use numera_math::Status;
//!
//! let registry = EngineRegistry::new();
//! let engine = registry.engine(Backend::Symbolic).unwrap();
//!
//! let request = RootRequest::new(RootMethod::NewtonRaphson, "x^2 - 2").with_x0(1.0);
//! let response = engine.execute(&Request::from(request));
//! assert_eq!(response.status(), Status::Converged);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dispatch::{run_direct, run_interpolation, run_iterative, run_root, DerivativeMode};
use crate::dto::{Request, Response};
use crate::error::EngineError;

/// A request/response compute backend.
///
/// Implementations hold only immutable configuration, so one engine can
/// serve concurrent callers.
pub trait ComputeEngine: Send + Sync {
    /// Backend name, for logs and output.
    fn name(&self) -> &'static str;

    /// Runs a request to completion. Failures are reported in the
    /// response's status and message.
    fn execute(&self, request: &Request) -> Response;
}

fn execute_with(mode: DerivativeMode, request: &Request) -> Response {
    match request {
        Request::Root(r) => Response::Root(run_root(r, mode)),
        Request::Direct(r) => Response::Direct(run_direct(r)),
        Request::Iterative(r) => Response::Iterative(run_iterative(r)),
        Request::Interpolation(r) => Response::Interpolation(run_interpolation(r)),
    }
}

/// Differentiates symbolically; falls back to finite differences for
/// functions without a symbolic rule (`floor`, `ceil`, `sign`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolicEngine;

impl ComputeEngine for SymbolicEngine {
    fn name(&self) -> &'static str {
        "symbolic"
    }

    fn execute(&self, request: &Request) -> Response {
        debug!(engine = self.name(), method = request.method_name(), "executing");
        execute_with(DerivativeMode::Symbolic, request)
    }
}

/// Uses centered finite differences for every derivative.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteDifferenceEngine;

impl ComputeEngine for FiniteDifferenceEngine {
    fn name(&self) -> &'static str {
        "finite-difference"
    }

    fn execute(&self, request: &Request) -> Response {
        debug!(engine = self.name(), method = request.method_name(), "executing");
        execute_with(DerivativeMode::FiniteDifference, request)
    }
}

/// Available backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// [`SymbolicEngine`].
    #[default]
    Symbolic,
    /// [`FiniteDifferenceEngine`].
    FiniteDifference,
}

impl Backend {
    /// All backends.
    pub const ALL: [Self; 2] = [Self::Symbolic, Self::FiniteDifference];

    /// Backend name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Symbolic => "symbolic",
            Self::FiniteDifference => "finite-difference",
        }
    }

    /// A fresh engine for this backend.
    pub fn engine(self) -> Arc<dyn ComputeEngine> {
        match self {
            Self::Symbolic => Arc::new(SymbolicEngine),
            Self::FiniteDifference => Arc::new(FiniteDifferenceEngine),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "symbolic" => Ok(Self::Symbolic),
            "finite-difference" | "finite-differences" | "numerical" | "fd" => {
                Ok(Self::FiniteDifference)
            }
            _ => Err(EngineError::UnknownBackend(s.to_string())),
        }
    }
}

/// Maps backends to engines.
pub struct EngineRegistry {
    engines: HashMap<Backend, Arc<dyn ComputeEngine>>,
    default_backend: Backend,
}

impl EngineRegistry {
    /// A registry with every built-in backend, defaulting to symbolic.
    pub fn new() -> Self {
        let engines = Backend::ALL.iter().map(|&b| (b, b.engine())).collect();
        Self {
            engines,
            default_backend: Backend::default(),
        }
    }

    /// Replaces the engine serving `backend`.
    pub fn register(&mut self, backend: Backend, engine: Arc<dyn ComputeEngine>) {
        info!(backend = %backend, engine = engine.name(), "registering engine");
        self.engines.insert(backend, engine);
    }

    /// Sets the backend used by [`EngineRegistry::default_engine`].
    #[must_use]
    pub fn with_default(mut self, backend: Backend) -> Self {
        self.default_backend = backend;
        self
    }

    /// The engine serving `backend`.
    pub fn engine(&self, backend: Backend) -> Option<Arc<dyn ComputeEngine>> {
        self.engines.get(&backend).cloned()
    }

    /// The default engine.
    pub fn default_engine(&self) -> Result<Arc<dyn ComputeEngine>, EngineError> {
        self.engine(self.default_backend)
            .ok_or_else(|| EngineError::UnknownBackend(self.default_backend.to_string()))
    }

    /// The default backend.
    pub fn default_backend(&self) -> Backend {
        self.default_backend
    }

    /// Runs a request on the given backend.
    pub fn execute(&self, backend: Backend, request: &Request) -> Result<Response, EngineError> {
        let engine = self
            .engine(backend)
            .ok_or_else(|| EngineError::UnknownBackend(backend.to_string()))?;
        Ok(engine.execute(request))
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut backends: Vec<_> = self.engines.keys().map(|b| b.name()).collect();
        backends.sort_unstable();
        f.debug_struct("EngineRegistry")
            .field("backends", &backends)
            .field("default_backend", &self.default_backend)
            .finish()
    }
}
