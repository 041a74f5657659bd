//! Interpolate command implementation.
//!
//! Fits the polynomial through a set of points, given inline or as a CSV
//! file with `x` and `y` columns.

use std::path::{Path, PathBuf};

use clap::Args;
use numera_engine::{InterpolationRequest, Request};
use numera_math::interpolation::InterpolationMethod;
use serde::Deserialize;

use crate::commands::{Context, RoundingArgs};
use crate::error::{CliError, CliResult};

/// Arguments for the interpolate command.
#[derive(Args, Debug)]
pub struct InterpolateArgs {
    /// Method: vandermonde or newton
    pub method: InterpolationMethod,

    /// x values (e.g. "-1 0 3 4")
    #[arg(short, allow_hyphen_values = true, required_unless_present = "points")]
    pub x: Option<String>,

    /// y values (e.g. "15.5 3 8 1")
    #[arg(short, allow_hyphen_values = true, required_unless_present = "points")]
    pub y: Option<String>,

    /// CSV file with an `x,y` header
    #[arg(long, conflicts_with_all = ["x", "y"])]
    pub points: Option<PathBuf>,

    #[command(flatten)]
    pub rounding: RoundingArgs,
}

#[derive(Debug, Deserialize)]
struct Point {
    x: f64,
    y: f64,
}

/// Reads `x,y` rows into the two value lists.
fn read_points(path: &Path) -> CliResult<(String, String)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for row in reader.deserialize() {
        let point: Point = row?;
        xs.push(point.x.to_string());
        ys.push(point.y.to_string());
    }
    if xs.is_empty() {
        return Err(CliError::Input(format!("{} has no points", path.display())));
    }
    Ok((xs.join(" "), ys.join(" ")))
}

/// Execute the interpolate command.
pub fn execute(args: InterpolateArgs, ctx: &Context) -> CliResult<()> {
    let (x, y) = match (args.points, args.x, args.y) {
        (Some(path), _, _) => read_points(&path)?,
        (None, Some(x), Some(y)) => (x, y),
        _ => {
            return Err(CliError::Input(
                "give both -x and -y, or --points".to_string(),
            ))
        }
    };
    let (precision_type, digits) = ctx.rounding(&args.rounding);
    let request = InterpolationRequest {
        precision_type,
        digits,
        ..InterpolationRequest::new(args.method, x, y)
    };
    ctx.execute(Request::from(request))
}
