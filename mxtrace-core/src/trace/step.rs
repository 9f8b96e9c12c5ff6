//! Renderable step types
//!
//! Every scalar in a step is already display text produced by the rational
//! approximator; nothing here is parsed back into numbers.

use core::fmt;

/// A grid of display strings, one per matrix cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct TextMatrix {
    cells: Vec<Vec<String>>,
}

impl TextMatrix {
    pub fn from_cells(cells: Vec<Vec<String>>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn nrows(&self) -> usize {
        self.cells.len()
    }

    pub fn ncols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col).map(String::as_str)
    }

    /// Tab-separated cells, one line per row
    pub fn to_tsv(&self) -> String {
        self.cells
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Bracketed rows with right-aligned columns
    pub fn lines(&self) -> Vec<String> {
        if self.cells.is_empty() {
            return vec!["[ ]".to_string()];
        }

        let widths: Vec<usize> = (0..self.ncols())
            .map(|j| {
                self.cells
                    .iter()
                    .map(|row| row[j].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        self.cells
            .iter()
            .map(|row| {
                let body: Vec<String> = row
                    .iter()
                    .zip(&widths)
                    .map(|(cell, &width)| format!("{cell:>width$}"))
                    .collect();
                format!("[ {} ]", body.join("  "))
            })
            .collect()
    }
}

impl fmt::Display for TextMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// One entry of a derivation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Step {
    /// `left symbol right = expression = result`, where each expression cell
    /// spells out the arithmetic for that cell
    Expression {
        left: TextMatrix,
        symbol: String,
        right: TextMatrix,
        expression: TextMatrix,
        result: TextMatrix,
    },
    /// Row `row` of A dotted with column `column` of B (zero-based)
    DotProduct {
        row: usize,
        column: usize,
        left: Vec<String>,
        right: Vec<String>,
        value: String,
    },
    /// One elementary row operation and the matrix right after it
    RowOperation {
        description: String,
        matrix: TextMatrix,
    },
}

impl Step {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Step::Expression {
                left,
                symbol,
                right,
                expression,
                result,
            } => side_by_side(&[
                left.lines(),
                vec![symbol.clone()],
                right.lines(),
                vec!["=".to_string()],
                expression.lines(),
                vec!["=".to_string()],
                result.lines(),
            ]),
            Step::DotProduct {
                row,
                column,
                left,
                right,
                value,
            } => {
                let row_vector = TextMatrix::from_cells(vec![left.clone()]);
                let column_vector =
                    TextMatrix::from_cells(right.iter().map(|v| vec![v.clone()]).collect());
                side_by_side(&[
                    vec![format!("({},{}):", row + 1, column + 1)],
                    row_vector.lines(),
                    vec!["·".to_string()],
                    column_vector.lines(),
                    vec!["=".to_string()],
                    vec![value.clone()],
                ])
            }
            Step::RowOperation {
                description,
                matrix,
            } => side_by_side(&[
                vec![description.clone()],
                vec!["⇒".to_string()],
                matrix.lines(),
            ]),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Place text blocks next to each other, each vertically centred
pub(crate) fn side_by_side(blocks: &[Vec<String>]) -> Vec<String> {
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = blocks
        .iter()
        .map(|b| b.iter().map(|l| l.chars().count()).max().unwrap_or(0))
        .collect();

    (0..height)
        .map(|line| {
            let parts: Vec<String> = blocks
                .iter()
                .zip(&widths)
                .map(|(block, &width)| {
                    let offset = (height - block.len()) / 2;
                    let text = line
                        .checked_sub(offset)
                        .and_then(|i| block.get(i))
                        .map_or("", String::as_str);
                    format!("{text:<width$}")
                })
                .collect();
            parts.join(" ").trim_end().to_string()
        })
        .collect()
}
