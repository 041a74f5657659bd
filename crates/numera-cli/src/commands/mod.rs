//! CLI command implementations.

pub mod config;
pub mod direct;
pub mod interpolate;
pub mod iterative;
pub mod root;
pub mod run;

// Re-export submodules for convenience
pub use config::ConfigArgs;
pub use direct::DirectArgs;
pub use interpolate::InterpolateArgs;
pub use iterative::IterativeArgs;
pub use root::RootArgs;
pub use run::RunArgs;

use std::path::{Path, PathBuf};

use clap::Args;
use numera_engine::{Backend, EngineRegistry, Request};
use numera_math::convergence::{ErrorType, PrecisionType};
use tracing::info;

use crate::cli::{Cli, OutputFormat};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::print_response;

/// Rounding flags shared by every command.
#[derive(Args, Debug, Default)]
pub struct RoundingArgs {
    /// Round to decimal places or significant digits
    #[arg(long)]
    pub precision_type: Option<PrecisionType>,

    /// Digits to round to
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=15))]
    pub digits: Option<u32>,
}

/// Stopping-criterion flags shared by the iterative commands.
#[derive(Args, Debug, Default)]
pub struct ToleranceArgs {
    /// Stopping tolerance
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// Iteration budget
    #[arg(short = 'n', long)]
    pub max_iterations: Option<usize>,

    /// Absolute or relative error
    #[arg(short, long)]
    pub error_type: Option<ErrorType>,

    #[command(flatten)]
    pub rounding: RoundingArgs,
}

/// Stopping criterion after merging flags over the config file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stopping {
    pub tolerance: f64,
    pub max_iterations: usize,
    pub error_type: ErrorType,
    pub precision_type: PrecisionType,
    pub digits: Option<u32>,
}

/// Settings every command runs with: the config file overridden by the
/// global flags.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: CliConfig,
    pub config_path: Option<PathBuf>,
    pub backend: Backend,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Merges the global flags over a loaded config.
    pub fn new(cli: &Cli, config: CliConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            backend: cli.backend.unwrap_or(config.backend),
            format: cli.format.unwrap_or(config.format),
            quiet: cli.quiet,
            config,
            config_path,
        }
    }

    /// Precision type and digits, flags first.
    pub fn rounding(&self, args: &RoundingArgs) -> (PrecisionType, Option<u32>) {
        (
            args.precision_type.unwrap_or(self.config.precision_type),
            args.digits.or(self.config.digits),
        )
    }

    /// Full stopping criterion, flags first.
    pub fn stopping(&self, args: &ToleranceArgs) -> Stopping {
        let (precision_type, digits) = self.rounding(&args.rounding);
        Stopping {
            tolerance: args.tolerance.unwrap_or(self.config.tolerance),
            max_iterations: args.max_iterations.unwrap_or(self.config.max_iterations),
            error_type: args.error_type.unwrap_or(self.config.error_type),
            precision_type,
            digits,
        }
    }

    /// Runs a request on the selected backend and prints the response.
    ///
    /// A response without an answer is printed first and then reported as
    /// [`CliError::Unsuccessful`], so the process exits non-zero.
    pub fn execute(&self, request: Request) -> CliResult<()> {
        let registry = EngineRegistry::new().with_default(self.backend);
        let engine = registry.default_engine()?;
        info!(backend = engine.name(), method = request.method_name(), "executing request");

        let response = engine.execute(&request);
        print_response(&response, self.format, self.quiet)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CliError::Unsuccessful {
                method: request.method_name(),
                status,
            })
        }
    }
}

/// Reads a headerless CSV of numbers into matrix text, one row per line.
pub fn read_matrix_csv(path: &Path) -> CliResult<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<&str> = record.iter().filter(|cell| !cell.is_empty()).collect();
        if !row.is_empty() {
            rows.push(row.join(" "));
        }
    }
    if rows.is_empty() {
        return Err(CliError::Input(format!("{} has no rows", path.display())));
    }
    Ok(rows.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "numera", "--format", "json", "root", "secant", "x^2 - 2", "--x0", "1", "--x1", "2",
            "-t", "1e-3",
        ])
        .unwrap();
        let config = CliConfig {
            tolerance: 1e-9,
            max_iterations: 7,
            digits: Some(3),
            ..CliConfig::default()
        };
        let ctx = Context::new(&cli, config, None);
        assert_eq!(ctx.format, OutputFormat::Json);
        assert_eq!(ctx.backend, Backend::Symbolic);

        let crate::cli::Commands::Root(args) = &cli.command else {
            panic!("expected root");
        };
        let stopping = ctx.stopping(&args.stopping);
        assert_eq!(stopping.tolerance, 1e-3);
        assert_eq!(stopping.max_iterations, 7);
        assert_eq!(stopping.digits, Some(3));
    }

    #[test]
    fn test_read_matrix_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "4, -1, 0").unwrap();
        writeln!(file, "-1, 4, -1").unwrap();
        writeln!(file, "0, -1, 4").unwrap();
        let text = read_matrix_csv(file.path()).unwrap();
        assert_eq!(text, "4 -1 0\n-1 4 -1\n0 -1 4");
    }

    #[test]
    fn test_read_empty_csv() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(read_matrix_csv(file.path()).is_err());
    }
}
