//! Numera CLI - root finding, linear systems and interpolation.
//!
//! # Usage
//!
//! ```bash
//! # Bisection on [1, 2]
//! numera root bisection "x^3 - x - 2" -a 1 -b 2 --tolerance 1e-4
//!
//! # Newton-Raphson with finite-difference derivatives, as JSON
//! numera --backend finite-difference --format json root newton "x^2 - 2" --x0 1
//!
//! # LU with partial pivoting
//! numera direct lu-gaussian-elimination -m "2 1; 1 3" --vector "3 4"
//!
//! # SOR with w = 1.1
//! numera iterative sor -m "4 -1 0; -1 4 -1; 0 -1 4" --vector "3 2 3" -w 1.1
//!
//! # Newton divided differences
//! numera interpolate newton -x "-1 0 3 4" -y "15.5 3 8 1"
//!
//! # A JSON request from stdin
//! echo '{"kind":"root","method":"secant","function":"cos(x) - x","x0":0,"x1":1}' | numera run -
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::Context;
use config::CliConfig;

/// Installs the stderr log subscriber. `RUST_LOG` wins over `-v`, which
/// wins over the config file.
fn init_logging(verbose: u8, config: &CliConfig) {
    let fallback = match verbose {
        0 => config.log_filter.clone(),
        1 => "numera_cli=debug,numera_engine=debug,numera_math=debug".to_string(),
        _ => "numera_cli=trace,numera_engine=trace,numera_math=trace".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_path) = CliConfig::load(cli.config.as_deref())?;
    init_logging(cli.verbose, &config);
    if let Some(path) = &config_path {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let ctx = Context::new(&cli, config, config_path);

    // Execute command
    match cli.command {
        Commands::Root(args) => commands::root::execute(args, &ctx)?,
        Commands::Direct(args) => commands::direct::execute(args, &ctx)?,
        Commands::Iterative(args) => commands::iterative::execute(args, &ctx)?,
        Commands::Interpolate(args) => commands::interpolate::execute(args, &ctx)?,
        Commands::Run(args) => commands::run::execute(args, &ctx)?,
        Commands::Config(args) => commands::config::execute(args, &ctx)?,
    }

    Ok(())
}
