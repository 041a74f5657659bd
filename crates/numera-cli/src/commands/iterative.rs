//! Iterative command implementation.
//!
//! Solves a square system with Jacobi, Gauss-Seidel or SOR.

use std::path::PathBuf;

use clap::Args;
use numera_engine::{IterativeRequest, Request};
use numera_math::convergence::Norm;
use numera_math::linear_algebra::IterativeMethod;

use crate::commands::{read_matrix_csv, Context, ToleranceArgs};
use crate::error::{CliError, CliResult};

/// Arguments for the iterative command.
#[derive(Args, Debug)]
pub struct IterativeArgs {
    /// Method: jacobi, gauss-seidel or sor
    pub method: IterativeMethod,

    /// Coefficient matrix, rows separated by ';'
    #[arg(short, long, allow_hyphen_values = true, required_unless_present = "matrix_file")]
    pub matrix: Option<String>,

    /// Read the coefficient matrix from a headerless CSV file
    #[arg(long, conflicts_with = "matrix")]
    pub matrix_file: Option<PathBuf>,

    /// Right-hand side
    #[arg(long, visible_alias = "rhs", allow_hyphen_values = true)]
    pub vector: String,

    /// Initial guess [default: zero vector]
    #[arg(long, allow_hyphen_values = true)]
    pub x0: Option<String>,

    /// Relaxation factor for SOR, in (0, 2)
    #[arg(short = 'w', long)]
    pub relaxation: Option<f64>,

    /// Norm of the iterate delta: inf, 1 or 2
    #[arg(long)]
    pub norm: Option<Norm>,

    #[command(flatten)]
    pub stopping: ToleranceArgs,
}

/// A zero initial guess sized to the right-hand side.
fn zero_guess(vector: &str) -> String {
    let n = vector
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .count();
    vec!["0"; n].join(" ")
}

/// Execute the iterative command.
pub fn execute(args: IterativeArgs, ctx: &Context) -> CliResult<()> {
    let matrix = match (args.matrix, args.matrix_file) {
        (Some(text), _) => text,
        (None, Some(path)) => read_matrix_csv(&path)?,
        (None, None) => {
            return Err(CliError::Input(
                "one of --matrix or --matrix-file is required".to_string(),
            ))
        }
    };
    let stopping = ctx.stopping(&args.stopping);
    let initial_guess = args.x0.unwrap_or_else(|| zero_guess(&args.vector));

    let request = IterativeRequest {
        error_type: stopping.error_type,
        precision_type: stopping.precision_type,
        digits: stopping.digits,
        relaxation: args.relaxation,
        ..IterativeRequest::new(args.method, matrix, args.vector, initial_guess)
            .with_tolerance(stopping.tolerance, stopping.max_iterations)
            .with_norm(args.norm.unwrap_or(ctx.config.norm))
    };
    ctx.execute(Request::from(request))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_guess() {
        assert_eq!(zero_guess("1 2, 3"), "0 0 0");
        assert_eq!(zero_guess(""), "");
    }
}
