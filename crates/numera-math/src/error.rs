//! Error types for numerical operations.

use thiserror::Error;

use crate::status::Status;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// A specialized Result type for expression parsing and evaluation.
pub type EvalResult = Result<f64, ExprError>;

/// Errors raised while parsing or evaluating an [`Expression`](crate::expression::Expression).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Malformed expression text.
    #[error("Parse error at offset {offset} near '{fragment}': {reason}")]
    Parse {
        /// The offending substring.
        fragment: String,
        /// Byte offset of the fragment in the source text.
        offset: usize,
        /// What was wrong.
        reason: String,
    },

    /// Division by an exact zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Function applied outside its domain.
    #[error("{function}({argument}) is undefined")]
    Domain {
        /// Name of the function or operator.
        function: &'static str,
        /// The rejected argument.
        argument: f64,
    },

    /// Evaluation produced NaN or an infinity.
    #[error("Expression is not finite at {at}")]
    NonFinite {
        /// The point at which the expression was evaluated.
        at: f64,
    },
}

impl ExprError {
    /// Creates a parse error.
    #[must_use]
    pub fn parse(fragment: impl Into<String>, offset: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            fragment: fragment.into(),
            offset,
            reason: reason.into(),
        }
    }

    /// Returns true for syntax errors, false for evaluation errors.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Invalid bracket for root-finding.
    #[error(
        "The interval is inadequate: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have the same sign"
    )]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// Division by zero or near-zero value.
    #[error("Division by zero or near-zero value: {value:.2e}")]
    DivisionByZero {
        /// The near-zero value.
        value: f64,
    },

    /// Derivative vanished at the current iterate.
    #[error("Derivative is zero at x = {x}: f'(x) = {value:.2e}")]
    ZeroDerivative {
        /// The iterate.
        x: f64,
        /// The derivative value.
        value: f64,
    },

    /// Matrix is singular (zero or negligible pivot).
    #[error("Singular matrix: pivot {value:.2e} at row {row}")]
    SingularMatrix {
        /// Elimination step at which the pivot vanished.
        row: usize,
        /// The pivot value.
        value: f64,
    },

    /// Matrix is not positive definite.
    #[error("Matrix is not positive definite: non-positive value {value:.2e} at row {row}")]
    NotPositiveDefinite {
        /// Row whose diagonal term failed.
        row: usize,
        /// The value under the square root.
        value: f64,
    },

    /// Matrix is not symmetric.
    #[error("Matrix is not symmetric at ({row}, {col})")]
    NotSymmetric {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },

    /// Zero entry on the diagonal of an iterative system.
    #[error("Zero diagonal entry at row {row}, the method fails")]
    ZeroDiagonal {
        /// Row index.
        row: usize,
    },

    /// Matrix dimensions are incompatible.
    #[error("Incompatible matrix dimensions: ({rows1}x{cols1}) and ({rows2}x{cols2})")]
    DimensionMismatch {
        /// Rows in first matrix.
        rows1: usize,
        /// Columns in first matrix.
        cols1: usize,
        /// Rows in second matrix.
        rows2: usize,
        /// Columns in second matrix.
        cols2: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Iteration left the range of representable values or kept growing.
    #[error("Diverged at iteration {iteration}: {reason}")]
    Diverged {
        /// Iteration at which divergence was detected.
        iteration: usize,
        /// Description of the divergence.
        reason: String,
    },

    /// A computed quantity overflowed to an infinity or NaN.
    #[error("The {stage} is not finite (overflow)")]
    NonFinite {
        /// What was being computed, e.g. "solution".
        stage: &'static str,
    },

    /// Expression parsing or evaluation failed.
    #[error(transparent)]
    Expression(#[from] ExprError),
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a divergence error.
    #[must_use]
    pub fn diverged(iteration: usize, reason: impl Into<String>) -> Self {
        Self::Diverged {
            iteration,
            reason: reason.into(),
        }
    }

    /// Maps the error onto the status reported in result records.
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidBracket { .. } => Status::InvalidBracket,
            Self::DivisionByZero { .. }
            | Self::ZeroDerivative { .. }
            | Self::SingularMatrix { .. }
            | Self::NotPositiveDefinite { .. }
            | Self::NotSymmetric { .. }
            | Self::ZeroDiagonal { .. } => Status::DomainError,
            Self::DimensionMismatch { .. } | Self::InvalidInput { .. } => Status::InvalidInput,
            Self::Diverged { .. } | Self::NonFinite { .. } => Status::Diverged,
            Self::Expression(e) if e.is_parse() => Status::ParseError,
            Self::Expression(_) => Status::DomainError,
        }
    }
}
