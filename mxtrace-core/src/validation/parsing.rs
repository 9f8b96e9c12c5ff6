//! Parsing of textual matrix literals
//!
//! Accepted forms: rows separated by `;` or newlines, cells by whitespace or
//! commas, with optional brackets, so `1 2; 3 4`, `[1, 2; 3, 4]` and
//! `[[1,2],[3,4]]` all describe the same matrix. Cells may be decimals or
//! `n/d` fractions.

use crate::{Matrix, MxError, Result};

/// Parse a matrix literal
pub fn parse_matrix(text: &str) -> Result<Matrix> {
    let normalized: String = text
        .chars()
        .map(|c| match c {
            ']' | '\n' => ';',
            '[' => ' ',
            '\u{2212}' => '-',
            other => other,
        })
        .collect();

    let mut rows = Vec::new();
    for line in normalized.split(';') {
        let tokens: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            continue;
        }

        let row_index = rows.len();
        let row = tokens
            .iter()
            .enumerate()
            .map(|(col, token)| parse_cell(token, row_index, col))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Matrix::new(rows)
}

/// Parse one cell token; `row` and `col` only label errors
pub fn parse_cell(token: &str, row: usize, col: usize) -> Result<f64> {
    let invalid = || MxError::InvalidCell {
        row,
        col,
        token: token.to_string(),
    };

    let value = match token.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().map_err(|_| invalid())?;
            let den: f64 = den.trim().parse().map_err(|_| invalid())?;
            if den == 0.0 {
                return Err(invalid());
            }
            num / den
        }
        None => token.parse().map_err(|_| invalid())?,
    };

    if !value.is_finite() {
        return Err(MxError::NonFinite { row, col });
    }
    Ok(value)
}
