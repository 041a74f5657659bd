//! Run command implementation.
//!
//! Executes a JSON request in the engine's wire format, e.g.
//!
//! ```json
//! {"kind": "root", "method": "bisection", "function": "x^3 - x - 2", "a": 1, "b": 2}
//! ```

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use numera_engine::Request;
use tracing::debug;

use crate::commands::Context;
use crate::error::CliResult;

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Request file, or '-' to read standard input
    pub request: PathBuf,
}

/// Execute the run command.
pub fn execute(args: RunArgs, ctx: &Context) -> CliResult<()> {
    let text = if args.request.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(&args.request)?
    };
    debug!(bytes = text.len(), "read request");

    let request = Request::from_json(&text)?;
    ctx.execute(request)
}
