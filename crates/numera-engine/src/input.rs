//! Matrix and vector text parsing.
//!
//! Matrix rows are separated by `;` or newlines and entries by whitespace
//! or commas, so `"4 -1; -1 4"`, `"4,-1\n-1,4"` and `"4, -1; -1, 4"` all read
//! as the same 2x2 matrix. Blank rows are ignored. Vectors use the entry
//! separators only.

use nalgebra::{DMatrix, DVector};

use crate::error::{EngineError, EngineResult};

fn is_entry_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn parse_entries(row: &str) -> EngineResult<Vec<f64>> {
    row.split(is_entry_separator)
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(EngineError::InvalidNumber {
                token: token.to_string(),
            }),
        })
        .collect()
}

/// Parses a list of numbers.
pub fn parse_vector(text: &str) -> EngineResult<DVector<f64>> {
    if text.contains(';') {
        return Err(EngineError::MalformedVector(
            "';' separates matrix rows, not vector entries".to_string(),
        ));
    }
    let entries = parse_entries(text)?;
    if entries.is_empty() {
        return Err(EngineError::MalformedVector("no entries".to_string()));
    }
    Ok(DVector::from_vec(entries))
}

/// Parses a row-major matrix. Every row must have the same length.
pub fn parse_matrix(text: &str) -> EngineResult<DMatrix<f64>> {
    let rows: Vec<Vec<f64>> = text
        .split([';', '\n'])
        .filter(|row| !row.trim().is_empty())
        .map(parse_entries)
        .collect::<EngineResult<_>>()?;

    let Some(first) = rows.first() else {
        return Err(EngineError::MalformedMatrix("no rows".to_string()));
    };
    let cols = first.len();
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
        return Err(EngineError::MalformedMatrix(format!(
            "row {} has {} entries, expected {}",
            i + 1,
            row.len(),
            cols
        )));
    }

    Ok(DMatrix::from_row_iterator(
        rows.len(),
        cols,
        rows.into_iter().flatten(),
    ))
}

/// Renders a matrix back to the text form, one row per line.
pub fn format_matrix(m: &DMatrix<f64>) -> String {
    m.row_iter()
        .map(|row| {
            row.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a matrix into row-major nested vectors.
pub fn matrix_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|row| row.iter().copied().collect()).collect()
}
