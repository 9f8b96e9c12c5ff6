//! Operand generators and textual operand sources

use std::ops::RangeInclusive;
use std::str::FromStr;

use rand::Rng;

use mxtrace_core::{parse_matrix, Dimension, Matrix, MxError, Result};

/// Value range of [`random`] matrices
pub const DEFAULT_RANGE: RangeInclusive<i64> = -9..=9;

pub fn zeros(rows: usize, cols: usize) -> Matrix {
    Matrix::zeros(rows, cols)
}

pub fn ones(rows: usize, cols: usize) -> Matrix {
    Matrix::filled(rows, cols, 1.0)
}

pub fn identity(rows: usize, cols: usize) -> Matrix {
    Matrix::identity(rows, cols)
}

/// Matrix of integers drawn uniformly from `range`
pub fn random_integer_matrix<R: Rng + ?Sized>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    range: RangeInclusive<i64>,
) -> Matrix {
    Matrix::from_integer_fn(rows, cols, |_, _| rng.gen_range(range.clone()))
}

/// Random matrix in [`DEFAULT_RANGE`] from the thread-local generator
pub fn random(rows: usize, cols: usize) -> Matrix {
    random_integer_matrix(&mut rand::thread_rng(), rows, cols, DEFAULT_RANGE)
}

/// Where an operand comes from
///
/// Parses `zeros:RxC`, `ones:RxC`, `identity:RxC`, `random:RxC` or a
/// matrix literal such as `1 2; 3 4`.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixSource {
    Zeros(Dimension),
    Ones(Dimension),
    Identity(Dimension),
    Random(Dimension),
    Literal(Matrix),
}

impl MatrixSource {
    /// Produce the operand, drawing from `rng` for random sources
    pub fn materialize<R: Rng + ?Sized>(&self, rng: &mut R) -> Matrix {
        match self {
            Self::Zeros(d) => zeros(d.rows, d.cols),
            Self::Ones(d) => ones(d.rows, d.cols),
            Self::Identity(d) => identity(d.rows, d.cols),
            Self::Random(d) => random_integer_matrix(rng, d.rows, d.cols, DEFAULT_RANGE),
            Self::Literal(m) => m.clone(),
        }
    }

    pub fn build(&self) -> Matrix {
        self.materialize(&mut rand::thread_rng())
    }
}

impl FromStr for MatrixSource {
    type Err = MxError;

    fn from_str(s: &str) -> Result<Self> {
        let Some((kind, shape)) = s.trim().split_once(':') else {
            return parse_matrix(s).map(Self::Literal);
        };
        let d = parse_dimension(shape)?;
        match kind.trim().to_ascii_lowercase().as_str() {
            "zeros" => Ok(Self::Zeros(d)),
            "ones" => Ok(Self::Ones(d)),
            "identity" | "eye" => Ok(Self::Identity(d)),
            "random" | "rand" => Ok(Self::Random(d)),
            _ => Err(MxError::InvalidConfig {
                key: "matrix source".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// `RxC`, also accepting `×` and `X` as separator
fn parse_dimension(text: &str) -> Result<Dimension> {
    let invalid = || MxError::InvalidConfig {
        key: "dimension".to_string(),
        value: text.to_string(),
    };
    let (rows, cols) = text
        .trim()
        .split_once(['x', 'X', '×'])
        .ok_or_else(invalid)?;
    let rows = rows.trim().parse().map_err(|_| invalid())?;
    let cols = cols.trim().parse().map_err(|_| invalid())?;
    Ok(Dimension::new(rows, cols))
}
