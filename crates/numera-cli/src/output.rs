//! Output formatting utilities.
//!
//! Responses are flattened into [`Grid`]s (a header plus string rows) that
//! render either as a table or as CSV. JSON output is the engine response
//! itself.

use std::io::Write;

use colored::Colorize;
use numera_engine::{
    DirectResponse, InterpolationResponse, IterativeResponse, Response, RootResponse,
};
use numera_math::Status;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;
use crate::error::CliResult;

/// A header plus rows of cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    /// Column titles.
    pub header: Vec<String>,
    /// Cells, one vector per row.
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    /// Creates an empty grid with the given titles.
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// True if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders as a rounded table, numbers right-aligned.
    pub fn to_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.header.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .with(Modify::new(Columns::first()).with(Alignment::left()));
        table.to_string()
    }

    /// Writes as CSV with a header record.
    pub fn write_csv<W: Write>(&self, writer: W) -> CliResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.header)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Formats a reported value.
pub fn format_value(value: f64) -> String {
    value.to_string()
}

fn format_vector(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|&v| format_value(v)).collect();
    format!("[{}]", items.join(", "))
}

fn matrix_grid(rows: &[Vec<f64>]) -> Grid {
    let cols = rows.first().map_or(0, Vec::len);
    let header = std::iter::once("row".to_string()).chain((1..=cols).map(|j| format!("c{j}")));
    let mut grid = Grid::new(header);
    for (i, row) in rows.iter().enumerate() {
        let mut cells = vec![(i + 1).to_string()];
        cells.extend(row.iter().map(|&v| format_value(v)));
        grid.push(cells);
    }
    grid
}

// =============================================================================
// HISTORY GRIDS
// =============================================================================

/// Iteration table of a root-finding response.
pub fn root_grid(r: &RootResponse) -> Grid {
    let mut header = vec!["iter", "x", "f(x)"];
    if r.derivatives.is_some() {
        header.push("f'(x)");
    }
    if r.second_derivatives.is_some() {
        header.push("f''(x)");
    }
    header.push("error");

    let mut grid = Grid::new(header);
    for (k, &index) in r.iterations.iter().enumerate() {
        let mut row = vec![
            index.to_string(),
            format_value(r.estimates[k]),
            format_value(r.function_values[k]),
        ];
        if let Some(d) = &r.derivatives {
            row.push(format_value(d[k]));
        }
        if let Some(d2) = &r.second_derivatives {
            row.push(format_value(d2[k]));
        }
        row.push(format_value(r.errors[k]));
        grid.push(row);
    }
    grid
}

/// Iteration table of an iterative linear response.
pub fn iterative_grid(r: &IterativeResponse) -> Grid {
    let n = r.iterates.first().map_or(0, Vec::len);
    let header = std::iter::once("iter".to_string())
        .chain((1..=n).map(|i| format!("x{i}")))
        .chain(std::iter::once("error".to_string()));

    let mut grid = Grid::new(header);
    for ((index, iterate), error) in r.iterations.iter().zip(&r.iterates).zip(&r.errors) {
        let mut row = vec![index.to_string()];
        row.extend(iterate.iter().map(|&v| format_value(v)));
        row.push(format_value(*error));
        grid.push(row);
    }
    grid
}

/// Solution vector of a direct response.
pub fn direct_grid(r: &DirectResponse) -> Grid {
    let mut grid = Grid::new(["i", "x"]);
    for (i, &v) in r.solution.iter().flatten().enumerate() {
        grid.push(vec![(i + 1).to_string(), format_value(v)]);
    }
    grid
}

/// Coefficients of an interpolation response, highest power first.
pub fn interpolation_grid(r: &InterpolationResponse) -> Grid {
    let mut grid = Grid::new(["power", "coefficient"]);
    let degree = r.coefficients.len().saturating_sub(1);
    for (i, &c) in r.coefficients.iter().enumerate() {
        grid.push(vec![(degree - i).to_string(), format_value(c)]);
    }
    grid
}

/// The grid written for CSV output.
pub fn history_grid(response: &Response) -> Grid {
    match response {
        Response::Root(r) => root_grid(r),
        Response::Direct(r) => direct_grid(r),
        Response::Iterative(r) => iterative_grid(r),
        Response::Interpolation(r) => interpolation_grid(r),
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

fn colored_status(status: Status) -> String {
    let text = status.to_string();
    match status {
        Status::Converged | Status::Solved => text.green().bold().to_string(),
        Status::MaxIterationsReached => text.yellow().bold().to_string(),
        _ => text.red().bold().to_string(),
    }
}

/// Key facts shown under the iteration table.
fn summary(response: &Response) -> Vec<KeyValue> {
    let mut out = Vec::new();
    match response {
        Response::Root(r) => {
            out.push(KeyValue::new("Iterations", r.iterations.len().to_string()));
            if let Some(x) = r.final_estimate {
                out.push(KeyValue::new("Estimate", format_value(x)));
            }
            if let Some((lo, hi)) = r.bracket {
                out.push(KeyValue::new(
                    "Bracket",
                    format!("[{}, {}]", format_value(lo), format_value(hi)),
                ));
            }
        }
        Response::Direct(r) => {
            if let Some(p) = &r.permutation {
                let rows: Vec<String> = p.iter().map(|i| (i + 1).to_string()).collect();
                out.push(KeyValue::new("Row order", rows.join(" ")));
            }
        }
        Response::Iterative(r) => {
            out.push(KeyValue::new("Iterations", r.iterations.len().to_string()));
            if let Some(x) = &r.solution {
                out.push(KeyValue::new("Solution", format_vector(x)));
            }
            if let Some(rho) = r.spectral_radius {
                out.push(KeyValue::new("Spectral radius", format_value(rho)));
            }
        }
        Response::Interpolation(r) => {
            if r.status.is_success() {
                out.push(KeyValue::new("Polynomial", r.polynomial.clone()));
            }
        }
    }
    out
}

fn print_response_table(response: &Response, quiet: bool) -> CliResult<()> {
    let method = match response {
        Response::Root(r) => r.method.name(),
        Response::Direct(r) => r.method.name(),
        Response::Iterative(r) => r.method.name(),
        Response::Interpolation(r) => r.method.name(),
    };
    print_header(&format!("{method}: {}", colored_status(response.status())));

    if !quiet {
        if let Response::Direct(r) = response {
            if let Some(lower) = &r.lower {
                println!("L =\n{}", matrix_grid(lower).to_table());
            }
            if let Some(upper) = &r.upper {
                println!("U =\n{}", matrix_grid(upper).to_table());
            }
        }
        let grid = history_grid(response);
        if !grid.is_empty() {
            println!("{}", grid.to_table());
        }
    }

    let facts = summary(response);
    if !facts.is_empty() {
        print_output(&facts)?;
    }

    if response.status().is_success() {
        print_success(response.message());
    } else {
        print_error(response.message());
    }
    Ok(())
}

/// Prints a response in the requested format.
pub fn print_response(response: &Response, format: OutputFormat, quiet: bool) -> CliResult<()> {
    match format {
        OutputFormat::Table => print_response_table(response, quiet),
        OutputFormat::Json => {
            println!("{}", response.to_json()?);
            Ok(())
        }
        OutputFormat::Csv => history_grid(response).write_csv(std::io::stdout()),
    }
}

// =============================================================================
// GENERAL HELPERS
// =============================================================================

/// Prints key-value rows as a table.
pub fn print_output<T: Tabled>(data: &[T]) -> CliResult<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

#[cfg(test)]
mod tests {
    use super::*;
    use numera_math::roots::RootMethod;

    fn newton_response() -> RootResponse {
        RootResponse {
            iterations: vec![1, 2],
            estimates: vec![1.5, 1.416_667],
            function_values: vec![0.25, 0.006_944],
            errors: vec![0.5, 0.083_333],
            derivatives: Some(vec![3.0, 2.833_333]),
            final_estimate: Some(1.416_667),
            ..RootResponse::rejected(RootMethod::NewtonRaphson, Status::MaxIterationsReached, "")
        }
    }

    #[test]
    fn test_root_grid_columns() {
        let grid = root_grid(&newton_response());
        assert_eq!(grid.header, vec!["iter", "x", "f(x)", "f'(x)", "error"]);
        assert_eq!(grid.rows[1], vec!["2", "1.416667", "0.006944", "2.833333", "0.083333"]);
    }

    #[test]
    fn test_csv_output() {
        let mut buffer = Vec::new();
        root_grid(&newton_response()).write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("iter,x,f(x),f'(x),error"));
        assert_eq!(lines.next(), Some("1,1.5,0.25,3,0.5"));
    }

    #[test]
    fn test_table_contains_cells() {
        let table = root_grid(&newton_response()).to_table();
        assert!(table.contains("f'(x)"));
        assert!(table.contains("1.416667"));
    }

    #[test]
    fn test_matrix_grid() {
        let grid = matrix_grid(&[vec![1.0, 0.0], vec![0.5, 1.0]]);
        assert_eq!(grid.header, vec!["row", "c1", "c2"]);
        assert_eq!(grid.rows[1], vec!["2", "0.5", "1"]);
    }

    #[test]
    fn test_format_vector() {
        assert_eq!(format_vector(&[1.0, -2.5]), "[1, -2.5]");
    }
}
