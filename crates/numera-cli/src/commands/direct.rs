//! Direct command implementation.
//!
//! Solves a square system with a factorization or an elimination method.

use std::path::PathBuf;

use clap::Args;
use numera_engine::{DirectRequest, Request};
use numera_math::linear_algebra::DirectMethod;

use crate::commands::{read_matrix_csv, Context, RoundingArgs};
use crate::error::{CliError, CliResult};

/// Arguments for the direct command.
#[derive(Args, Debug)]
pub struct DirectArgs {
    /// Method: doolittle, crout, cholesky, simple-gaussian-elimination,
    /// pivot-gaussian-elimination or lu-gaussian-elimination
    pub method: DirectMethod,

    /// Coefficient matrix, rows separated by ';' (e.g. "4 -1; -1 4")
    #[arg(short, long, allow_hyphen_values = true, required_unless_present = "matrix_file")]
    pub matrix: Option<String>,

    /// Read the coefficient matrix from a headerless CSV file
    #[arg(long, conflicts_with = "matrix")]
    pub matrix_file: Option<PathBuf>,

    /// Right-hand side (e.g. "3 3")
    #[arg(long, visible_alias = "rhs", allow_hyphen_values = true)]
    pub vector: String,

    #[command(flatten)]
    pub rounding: RoundingArgs,
}

/// Execute the direct command.
pub fn execute(args: DirectArgs, ctx: &Context) -> CliResult<()> {
    let matrix = match (args.matrix, args.matrix_file) {
        (Some(text), _) => text,
        (None, Some(path)) => read_matrix_csv(&path)?,
        (None, None) => {
            return Err(CliError::Input(
                "one of --matrix or --matrix-file is required".to_string(),
            ))
        }
    };
    let (precision_type, digits) = ctx.rounding(&args.rounding);
    let request = DirectRequest {
        precision_type,
        digits,
        ..DirectRequest::new(args.method, matrix, args.vector)
    };
    ctx.execute(Request::from(request))
}
