//! Builds [`Trace`]s from numeric inputs and outputs

use crate::fraction::FractionConfig;
use crate::reduction::Reduction;
use crate::trace::{Step, TextMatrix, Trace};
use crate::{Matrix, MxError, Operation, Result};

/// Formats computations into step traces
///
/// The renderer never changes numeric values; every scalar goes through
/// the configured [`FractionConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TraceRenderer {
    fractions: FractionConfig,
}

impl TraceRenderer {
    pub fn new(fractions: FractionConfig) -> Self {
        Self { fractions }
    }

    pub fn fractions(&self) -> &FractionConfig {
        &self.fractions
    }

    /// Display form of a matrix
    pub fn text(&self, m: &Matrix) -> TextMatrix {
        TextMatrix::from_cells(
            m.rows()
                .iter()
                .map(|row| row.iter().map(|&v| self.fractions.format(v)).collect())
                .collect(),
        )
    }

    /// Trace for add, subtract or multiply given operands and result
    ///
    /// Fails without producing a trace when the operand shapes are
    /// incompatible or `result` has the wrong shape.
    pub fn binary(&self, op: Operation, a: &Matrix, b: &Matrix, result: &Matrix) -> Result<Trace> {
        if op == Operation::ReduceToRref {
            return Err(MxError::NotBinary(op));
        }
        let expected = op.check(a.dimensions(), Some(b.dimensions()))?;
        if result.dimensions() != expected {
            return Err(MxError::ResultShape {
                expected,
                actual: result.dimensions(),
            });
        }

        let expression = match op {
            Operation::Multiply => self.product_expression(a, b),
            _ => self.elementwise_expression(op, a, b),
        };
        let mut steps = vec![Step::Expression {
            left: self.text(a),
            symbol: op.symbol().unwrap_or_default().to_string(),
            right: self.text(b),
            expression,
            result: self.text(result),
        }];
        if op == Operation::Multiply {
            steps.extend(self.dot_products(a, b, result));
        }

        let note = format!("A is {}, B is {}", a.dimensions(), b.dimensions());
        Ok(Trace::new(op, note, vec![self.text(a), self.text(b)], steps))
    }

    /// Trace for a reduction: one step per recorded row operation
    pub fn reduction(&self, a: &Matrix, reduction: &Reduction) -> Trace {
        let steps = reduction
            .log()
            .iter()
            .map(|op| Step::RowOperation {
                description: op.kind().describe(&self.fractions),
                matrix: self.text(op.snapshot()),
            })
            .collect();

        Trace::new(
            Operation::ReduceToRref,
            "Gauss–Jordan elimination to RREF".to_string(),
            vec![self.text(a)],
            steps,
        )
    }

    fn elementwise_expression(&self, op: Operation, a: &Matrix, b: &Matrix) -> TextMatrix {
        let symbol = op.symbol().unwrap_or("+");
        TextMatrix::from_cells(
            a.rows()
                .iter()
                .zip(b.rows())
                .map(|(ra, rb)| {
                    ra.iter()
                        .zip(rb)
                        .map(|(&x, &y)| {
                            format!("{} {symbol} {}", self.fractions.format(x), self.operand(y))
                        })
                        .collect()
                })
                .collect(),
        )
    }

    fn product_expression(&self, a: &Matrix, b: &Matrix) -> TextMatrix {
        let inner = a.ncols();
        TextMatrix::from_cells(
            (0..a.nrows())
                .map(|i| {
                    (0..b.ncols())
                        .map(|j| {
                            if inner == 0 {
                                return "0".to_string();
                            }
                            (0..inner)
                                .map(|k| {
                                    format!(
                                        "{}×{}",
                                        self.fractions.format(a[(i, k)]),
                                        self.operand(b[(k, j)])
                                    )
                                })
                                .collect::<Vec<_>>()
                                .join(" + ")
                        })
                        .collect()
                })
                .collect(),
        )
    }

    fn dot_products(&self, a: &Matrix, b: &Matrix, result: &Matrix) -> Vec<Step> {
        let mut steps = Vec::with_capacity(result.nrows() * result.ncols());
        for (i, row) in a.rows().iter().enumerate() {
            for j in 0..b.ncols() {
                let column = b.rows().iter().map(|r| self.fractions.format(r[j])).collect();
                steps.push(Step::DotProduct {
                    row: i,
                    column: j,
                    left: row.iter().map(|&v| self.fractions.format(v)).collect(),
                    right: column,
                    value: self.fractions.format(result[(i, j)]),
                });
            }
        }
        steps
    }

    /// Right-hand operand text, parenthesized when negative
    fn operand(&self, v: f64) -> String {
        let text = self.fractions.format(v);
        if v < 0.0 {
            format!("({text})")
        } else {
            text
        }
    }
}
