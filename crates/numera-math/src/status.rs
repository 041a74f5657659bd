//! Terminal status shared by every result record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a solver call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    /// The stopping criterion was satisfied (or an exact root was hit).
    Converged,
    /// A direct method produced a solution.
    Solved,
    /// The iteration bound was hit without satisfying the tolerance.
    MaxIterationsReached,
    /// The iteration blew up or kept moving away from a solution.
    Diverged,
    /// The interval does not bracket a root.
    InvalidBracket,
    /// Division by zero, zero pivot, zero derivative, out-of-domain evaluation.
    DomainError,
    /// The configuration violates a method precondition.
    InvalidInput,
    /// Malformed expression, matrix or vector text.
    ParseError,
}

impl Status {
    /// Returns true if the call produced an answer.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Converged | Self::Solved)
    }

    /// Returns the status name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::Solved => "solved",
            Self::MaxIterationsReached => "max iterations reached",
            Self::Diverged => "diverged",
            Self::InvalidBracket => "invalid bracket",
            Self::DomainError => "domain error",
            Self::InvalidInput => "invalid input",
            Self::ParseError => "parse error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
