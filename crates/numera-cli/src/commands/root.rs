//! Root command implementation.
//!
//! Runs one of the root-finding methods on a function of `x`.

use clap::Args;
use numera_engine::{Request, RootRequest};
use numera_math::roots::RootMethod;

use crate::commands::{Context, ToleranceArgs};
use crate::error::CliResult;

/// Arguments for the root command.
#[derive(Args, Debug)]
pub struct RootArgs {
    /// Method: bisection, false-position, incremental-search, fixed-point,
    /// newton, secant or multiple-roots
    pub method: RootMethod,

    /// f(x), e.g. "x^3 - x - 2" or "exp(-x) - ln(x)"
    #[arg(allow_hyphen_values = true)]
    pub function: String,

    /// g(x) for fixed-point iteration
    #[arg(short, long = "g-function", allow_hyphen_values = true)]
    pub g: Option<String>,

    /// Lower bracket end (bisection, false position)
    #[arg(short, allow_negative_numbers = true)]
    pub a: Option<f64>,

    /// Upper bracket end (bisection, false position)
    #[arg(short, allow_negative_numbers = true)]
    pub b: Option<f64>,

    /// Initial guess
    #[arg(long, allow_negative_numbers = true)]
    pub x0: Option<f64>,

    /// Second initial guess (secant)
    #[arg(long, allow_negative_numbers = true)]
    pub x1: Option<f64>,

    /// Step size (incremental search)
    #[arg(long, visible_alias = "h", allow_negative_numbers = true)]
    pub step: Option<f64>,

    #[command(flatten)]
    pub stopping: ToleranceArgs,
}

/// Execute the root command.
pub fn execute(args: RootArgs, ctx: &Context) -> CliResult<()> {
    let stopping = ctx.stopping(&args.stopping);
    let request = RootRequest {
        g_function: args.g,
        a: args.a,
        b: args.b,
        x0: args.x0,
        x1: args.x1,
        h: args.step,
        ..RootRequest::new(args.method, args.function)
            .with_tolerance(stopping.tolerance, stopping.max_iterations)
            .with_error_type(stopping.error_type)
            .with_precision(stopping.precision_type, stopping.digits)
    };
    ctx.execute(Request::from(request))
}
