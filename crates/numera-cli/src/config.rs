//! CLI configuration.
//!
//! Settings come from a TOML file and are overridden by command-line flags.
//! The file is looked up in order: the `--config` path (which must exist),
//! `./numera.toml`, then `numera/numera.toml` under the user config
//! directory. Missing files fall back to defaults.
//!
//! ```toml
//! backend = "symbolic"
//! format = "table"
//! tolerance = 1e-7
//! max_iterations = 100
//! error_type = "absolute"
//! precision_type = "decimalPlaces"
//! norm = "infinity"
//! log_filter = "warn"
//! ```

use std::path::{Path, PathBuf};

use numera_engine::Backend;
use numera_math::convergence::{
    ErrorType, Norm, PrecisionType, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Config file name.
pub const CONFIG_FILE: &str = "numera.toml";

/// Log filter used when neither `RUST_LOG`, `-v` nor the file set one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Compute backend
    #[serde(default)]
    pub backend: Backend,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Stopping tolerance for iterative methods
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Iteration budget
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Absolute or relative error
    #[serde(default)]
    pub error_type: ErrorType,

    /// Decimal places or significant digits
    #[serde(default)]
    pub precision_type: PrecisionType,

    /// Norm for the iterative linear solvers
    #[serde(default)]
    pub norm: Norm,

    /// Rounding digits; derived from the tolerance when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digits: Option<u32>,

    /// `EnvFilter` directives for logging
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            format: OutputFormat::default(),
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            error_type: ErrorType::default(),
            precision_type: PrecisionType::default(),
            norm: Norm::default(),
            digits: None,
            log_filter: default_log_filter(),
        }
    }
}

impl CliConfig {
    /// Parses a config from TOML text.
    pub fn from_toml(text: &str, path: &Path) -> CliResult<Self> {
        toml::from_str(text).map_err(|e| CliError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Loads a config file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text, path)
    }

    /// Loads the config, returning it with the file it came from.
    pub fn load(explicit: Option<&Path>) -> CliResult<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::ConfigNotFound(path.to_path_buf()));
            }
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }
        for path in search_paths() {
            if path.is_file() {
                return Ok((Self::from_file(&path)?, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    /// Renders the config as TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Input(e.to_string()))
    }
}

/// Candidate config files when no `--config` is given, in lookup order.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("numera").join(CONFIG_FILE));
    }
    paths
}
