//! Engine error types.

use numera_math::error::{ExprError, MathError};
use numera_math::Status;
use thiserror::Error;

/// Engine error type.
///
/// Raised while turning a request into solver inputs; the engine folds it
/// into a response whose status is given by [`EngineError::status`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Matrix text could not be read
    #[error("malformed matrix: {0}")]
    MalformedMatrix(String),

    /// Vector text could not be read
    #[error("malformed vector: {0}")]
    MalformedVector(String),

    /// A token is not a finite number
    #[error("'{token}' is not a finite number")]
    InvalidNumber {
        /// The offending token.
        token: String,
    },

    /// Function text could not be parsed
    #[error("could not parse {field}: {source}")]
    Expression {
        /// Request field holding the function.
        field: &'static str,
        /// Parser error.
        #[source]
        source: ExprError,
    },

    /// A field the method needs was not supplied
    #[error("missing field '{0}' for this method")]
    MissingField(&'static str),

    /// The request is well formed but unusable
    #[error("{0}")]
    Invalid(#[from] MathError),

    /// No engine is registered for the backend
    #[error("unknown backend '{0}'")]
    UnknownBackend(String),

    /// JSON (de)serialization failed
    #[error("json error: {0}")]
    Json(String),
}

impl EngineError {
    /// Maps the error to the status reported in a response.
    pub fn status(&self) -> Status {
        match self {
            Self::MalformedMatrix(_)
            | Self::MalformedVector(_)
            | Self::InvalidNumber { .. }
            | Self::Expression { .. }
            | Self::Json(_) => Status::ParseError,
            Self::MissingField(_) | Self::UnknownBackend(_) => Status::InvalidInput,
            Self::Invalid(e) => e.status(),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Json(e.to_string())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
