//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use numera_engine::Backend;
use serde::{Deserialize, Serialize};

use crate::commands::{
    ConfigArgs, DirectArgs, InterpolateArgs, IterativeArgs, RootArgs, RunArgs,
};

/// Numera - root finding, linear systems and interpolation with full
/// iteration history
#[derive(Parser, Debug)]
#[command(name = "numera")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format [default: table, or the config file's `format`]
    #[arg(short, long, value_enum, global = true, env = "NUMERA_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Compute backend: symbolic or finite-difference
    #[arg(long, global = true, env = "NUMERA_BACKEND")]
    pub backend: Option<Backend>,

    /// Config file [default: ./numera.toml, then the user config directory]
    #[arg(short, long, global = true, env = "NUMERA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print only the result, without the iteration table
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find a root of f(x)
    Root(RootArgs),

    /// Solve Ax = b with a direct method
    Direct(DirectArgs),

    /// Solve Ax = b with Jacobi, Gauss-Seidel or SOR
    Iterative(IterativeArgs),

    /// Fit the polynomial through a set of points
    Interpolate(InterpolateArgs),

    /// Run a JSON request file (or '-' for stdin)
    Run(RunArgs),

    /// Inspect or create the config file
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// The engine response as JSON
    Json,
    /// The iteration history (or solution) as CSV
    Csv,
}

impl OutputFormat {
    /// Format name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}
