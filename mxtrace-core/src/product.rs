//! Matrix multiplication

use crate::validation::validate_product_shape;
use crate::{Matrix, Result};

/// `A × B`; requires `A.cols == B.rows`
///
/// Each cell accumulates its terms in increasing `k`, so results are
/// reproducible bit for bit.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let out = validate_product_shape(a.dimensions(), b.dimensions())?;
    let inner = a.ncols();

    let rows = (0..out.rows)
        .map(|i| {
            (0..out.cols)
                .map(|j| (0..inner).fold(0.0, |acc, k| acc + a[(i, k)] * b[(k, j)]))
                .collect()
        })
        .collect();

    Ok(Matrix::from_rows_unchecked(rows))
}

/// Dot product of two equal-length vectors, accumulated left to right
pub fn dot(left: &[f64], right: &[f64]) -> f64 {
    left.iter().zip(right).fold(0.0, |acc, (x, y)| acc + x * y)
}
