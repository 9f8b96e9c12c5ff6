//! Cellwise addition and subtraction

use crate::validation::validate_same_shape;
use crate::{Matrix, Operation, Result};

/// `A + B`; both operands must share a shape
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    zip_with(Operation::Add, a, b, |x, y| x + y)
}

/// `A − B`; both operands must share a shape
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    zip_with(Operation::Subtract, a, b, |x, y| x - y)
}

fn zip_with(op: Operation, a: &Matrix, b: &Matrix, f: impl Fn(f64, f64) -> f64) -> Result<Matrix> {
    validate_same_shape(op, a.dimensions(), b.dimensions())?;

    let rows = a
        .rows()
        .iter()
        .zip(b.rows())
        .map(|(ra, rb)| ra.iter().zip(rb).map(|(&x, &y)| f(x, y)).collect())
        .collect();

    Ok(Matrix::from_rows_unchecked(rows))
}
