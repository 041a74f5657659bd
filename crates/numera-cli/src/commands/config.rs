//! Config command implementation.
//!
//! Shows the effective configuration and writes a starter file.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::config::{search_paths, CliConfig, CONFIG_FILE};
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_info, print_output, print_success, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration (file values with flags applied)
    Show,

    /// Show which config file is in use and where files are looked up
    Path,

    /// Write a config file with the default settings
    Init(InitArgs),
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Target file
    #[arg(default_value = CONFIG_FILE)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> CliResult<()> {
    match args.command {
        ConfigCommand::Show => execute_show(ctx),
        ConfigCommand::Path => execute_path(ctx),
        ConfigCommand::Init(init_args) => execute_init(init_args),
    }
}

/// The config with the global flags applied.
fn effective(ctx: &Context) -> CliConfig {
    CliConfig {
        backend: ctx.backend,
        format: ctx.format,
        ..ctx.config.clone()
    }
}

fn rows(config: &CliConfig) -> Vec<KeyValue> {
    vec![
        KeyValue::new("backend", config.backend.to_string()),
        KeyValue::new("format", config.format.as_str()),
        KeyValue::new("tolerance", config.tolerance.to_string()),
        KeyValue::new("max_iterations", config.max_iterations.to_string()),
        KeyValue::new("error_type", config.error_type.to_string()),
        KeyValue::new("precision_type", config.precision_type.to_string()),
        KeyValue::new("norm", config.norm.to_string()),
        KeyValue::new(
            "digits",
            config
                .digits
                .map_or_else(|| "from tolerance".to_string(), |d| d.to_string()),
        ),
        KeyValue::new("log_filter", config.log_filter.clone()),
    ]
}

/// Show the effective configuration.
fn execute_show(ctx: &Context) -> CliResult<()> {
    let config = effective(ctx);
    match ctx.format {
        OutputFormat::Table => {
            print_header("Current Configuration");
            print_output(&rows(&config))?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)
                .map_err(|e| CliError::Input(e.to_string()))?;
            println!("{json}");
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["key", "value"])?;
            for row in rows(&config) {
                wtr.write_record([row.key, row.value])?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

/// Show the config file in use and the lookup order.
fn execute_path(ctx: &Context) -> CliResult<()> {
    match &ctx.config_path {
        Some(path) => print_info(&format!("Config file: {}", path.display())),
        None => print_info("No config file found (using defaults)"),
    }
    for path in search_paths() {
        let state = if path.is_file() { "exists" } else { "missing" };
        print_info(&format!("Searched: {} ({state})", path.display()));
    }
    Ok(())
}

/// Write a default config file.
fn execute_init(args: InitArgs) -> CliResult<()> {
    if args.path.exists() && !args.force {
        return Err(CliError::AlreadyExists(args.path));
    }
    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.path, CliConfig::default().to_toml()?)?;
    print_success(&format!("Wrote {}", args.path.display()));
    Ok(())
}
