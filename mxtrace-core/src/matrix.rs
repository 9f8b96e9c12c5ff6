//! Dense real-valued matrix and its derived dimension
//!
//! A [`Matrix`] is an ordered sequence of equal-length rows. Its
//! [`Dimension`] is never stored; it is recomputed from the rows whenever
//! it is needed so the two cannot drift apart.

use core::fmt;
use core::ops::Index;

use crate::validation::validate_rectangular;
use crate::Result;

/// `(rows, cols)` pair describing a matrix shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    pub rows: usize,
    pub cols: usize,
}

impl Dimension {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// True when the shape holds no cells
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.rows, self.cols)
    }
}

/// Dense matrix of `f64` cells stored row by row
///
/// A 0×0 or r×0 matrix is legal and represents "empty".
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")
)]
pub struct Matrix {
    rows: Vec<Vec<f64>>,
}

impl Matrix {
    /// Build a matrix from nested rows, rejecting ragged or non-finite input
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        validate_rectangular(&rows)?;
        Ok(Self { rows })
    }

    /// The 0×0 matrix
    pub const fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Matrix with every cell set to `value`
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows: vec![vec![value; cols]; rows],
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Ones on the main diagonal, zeros elsewhere; any shape
    pub fn identity(rows: usize, cols: usize) -> Self {
        let mut m = Self::zeros(rows, cols);
        for i in 0..rows.min(cols) {
            m.rows[i][i] = 1.0;
        }
        m
    }

    /// Integer-valued matrix with cell `(i, j)` set to `f(i, j)`
    pub fn from_integer_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> i64) -> Self {
        Self {
            rows: (0..rows)
                .map(|i| (0..cols).map(|j| f(i, j) as f64).collect())
                .collect(),
        }
    }

    /// Wrap rows whose shape the caller has already established
    pub(crate) fn from_rows_unchecked(rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { rows }
    }

    pub fn dimensions(&self) -> Dimension {
        Dimension::new(self.nrows(), self.ncols())
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions().is_empty()
    }

    /// Cell at `(row, col)`, or `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Copy of column `index`, or `None` when out of bounds
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.ncols() {
            return None;
        }
        Some(self.rows.iter().map(|r| r[index]).collect())
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Largest absolute cell difference, or `None` if the shapes differ
    pub fn max_abs_difference(&self, other: &Matrix) -> Option<f64> {
        if self.dimensions() != other.dimensions() {
            return None;
        }
        let diff = self
            .rows
            .iter()
            .zip(&other.rows)
            .flat_map(|(a, b)| a.iter().zip(b).map(|(x, y)| (x - y).abs()))
            .fold(0.0, f64::max);
        Some(diff)
    }

    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        self.rows.swap(a, b);
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> &mut [f64] {
        &mut self.rows[index]
    }

    /// Snap every cell with magnitude below `threshold` to exactly zero
    pub(crate) fn snap_noise(&mut self, threshold: f64) {
        for cell in self.rows.iter_mut().flatten() {
            if cell.abs() < threshold {
                *cell = 0.0;
            }
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.rows[row][col]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = crate::MxError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.rows
    }
}

impl<const R: usize, const C: usize> From<[[f64; C]; R]> for Matrix {
    fn from(rows: [[f64; C]; R]) -> Self {
        Self {
            rows: rows.iter().map(|r| r.to_vec()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MxError;

    #[test]
    fn test_dimensions_are_derived() {
        let m = Matrix::from([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(m.dimensions(), Dimension::new(2, 3));
        assert_eq!(m.dimensions().to_string(), "2×3");
        assert_eq!(m[(1, 2)], 6.0);
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.column(1), Some(vec![2.0, 5.0]));
        assert_eq!(m.column(3), None);
    }

    #[test]
    fn test_empty_shapes() {
        assert_eq!(Matrix::empty().dimensions(), Dimension::new(0, 0));
        let tall = Matrix::new(vec![vec![], vec![]]).unwrap();
        assert_eq!(tall.dimensions(), Dimension::new(2, 0));
        assert!(tall.is_empty());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = Matrix::new(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            MxError::RaggedRows {
                row: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = Matrix::new(vec![vec![1.0, f64::NAN]]).unwrap_err();
        assert_eq!(err, MxError::NonFinite { row: 0, col: 1 });
    }

    #[test]
    fn test_identity_non_square() {
        let m = Matrix::identity(2, 3);
        assert_eq!(m, Matrix::from([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]));
    }

    #[test]
    fn test_from_integer_fn() {
        let m = Matrix::from_integer_fn(2, 2, |i, j| (i * 2 + j) as i64 - 1);
        assert_eq!(m, Matrix::from([[-1.0, 0.0], [1.0, 2.0]]));
        assert_eq!(Matrix::from_integer_fn(0, 3, |_, _| 1), Matrix::empty());
    }

    #[test]
    fn test_max_abs_difference() {
        let a = Matrix::from([[1.0, 2.0]]);
        let b = Matrix::from([[1.5, 1.0]]);
        assert_eq!(a.max_abs_difference(&b), Some(1.0));
        assert_eq!(a.max_abs_difference(&Matrix::zeros(2, 1)), None);
    }

    #[test]
    fn test_snap_noise() {
        let mut m = Matrix::from([[1e-13, -5e-13], [1e-11, 2.0]]);
        m.snap_noise(1e-12);
        assert_eq!(m, Matrix::from([[0.0, 0.0], [1e-11, 2.0]]));
    }
}
