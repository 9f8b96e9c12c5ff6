//! Operand shape validation
//!
//! Each check returns the dimension of the result the operation would
//! produce, so callers validate and size their output in one step.

use crate::{Dimension, MxError, Operation, Result};

/// Validate that nested rows form a rectangular grid of finite numbers
pub fn validate_rectangular(rows: &[Vec<f64>]) -> Result<Dimension> {
    let Some(first) = rows.first() else {
        return Ok(Dimension::default());
    };
    let expected = first.len();

    for (i, row) in rows.iter().enumerate() {
        if row.len() != expected {
            return Err(MxError::RaggedRows {
                row: i,
                len: row.len(),
                expected,
            });
        }
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(MxError::NonFinite { row: i, col: j });
        }
    }

    Ok(Dimension::new(rows.len(), expected))
}

/// Add/Subtract precondition: both operands have the same shape
pub fn validate_same_shape(op: Operation, a: Dimension, b: Dimension) -> Result<Dimension> {
    if a != b {
        return Err(MxError::DimensionMismatch {
            op,
            left: a,
            right: b,
        });
    }
    Ok(a)
}

/// Multiply precondition: `a.cols == b.rows`
pub fn validate_product_shape(a: Dimension, b: Dimension) -> Result<Dimension> {
    if a.cols != b.rows {
        return Err(MxError::DimensionMismatch {
            op: Operation::Multiply,
            left: a,
            right: b,
        });
    }
    Ok(Dimension::new(a.rows, b.cols))
}
