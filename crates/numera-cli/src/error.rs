//! CLI error types.

use std::path::PathBuf;

use numera_engine::EngineError;
use numera_math::Status;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// The config file could not be parsed.
    #[error("Invalid config file {path}: {reason}")]
    InvalidConfig {
        /// Offending file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// Refused to overwrite an existing file.
    #[error("{0} already exists; pass --force to overwrite")]
    AlreadyExists(PathBuf),

    /// Input could not be read.
    #[error("Invalid input: {0}")]
    Input(String),

    /// Engine-level failure outside a response.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The solver ran but did not produce an answer.
    #[error("{method} finished with status '{status}'")]
    Unsuccessful {
        /// Method that ran.
        method: &'static str,
        /// Terminal status.
        status: Status,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
