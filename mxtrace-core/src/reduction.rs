//! Gauss–Jordan elimination to reduced row-echelon form
//!
//! [`reduce`] performs deterministic partial-pivoting elimination and
//! records every elementary row operation, together with a snapshot of the
//! matrix right after it, in an append-only [`RowOpLog`]. Replaying the log
//! against the original matrix reproduces every intermediate state and the
//! final result exactly, because reduction and replay share
//! [`RowOpKind::apply`].

use log::{debug, trace};

use crate::fraction::FractionConfig;
use crate::Matrix;

/// Magnitude below which a value is treated as zero during elimination
pub const PIVOT_EPSILON: f64 = 1e-10;

/// Magnitude below which result cells are snapped to zero after elimination
pub const NOISE_THRESHOLD: f64 = 1e-12;

/// One elementary row operation; row indices are zero-based
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum RowOpKind {
    /// Exchange rows `row` and `with`
    Swap { row: usize, with: usize },
    /// Divide row `row` by `factor`, from `column` onward
    Scale {
        row: usize,
        factor: f64,
        column: usize,
    },
    /// Subtract `factor` times `pivot_row` from `row`, from `column` onward
    Eliminate {
        row: usize,
        pivot_row: usize,
        factor: f64,
        column: usize,
    },
}

impl RowOpKind {
    /// Apply this operation to `matrix` in place
    pub fn apply(&self, matrix: &mut Matrix) {
        match *self {
            RowOpKind::Swap { row, with } => matrix.swap_rows(row, with),
            RowOpKind::Scale {
                row,
                factor,
                column,
            } => {
                for cell in &mut matrix.row_mut(row)[column..] {
                    *cell /= factor;
                }
            }
            RowOpKind::Eliminate {
                row,
                pivot_row,
                factor,
                column,
            } => {
                let cols = matrix.ncols();
                for j in column..cols {
                    let pivot = matrix[(pivot_row, j)];
                    matrix.row_mut(row)[j] -= factor * pivot;
                }
            }
        }
    }

    /// Human-readable form with one-based row labels, e.g. `R2 ← R2 − 3·R1`
    pub fn describe(&self, fractions: &FractionConfig) -> String {
        match *self {
            RowOpKind::Swap { row, with } => format!("R{} ↔ R{}", row + 1, with + 1),
            RowOpKind::Scale { row, factor, .. } => {
                let r = row + 1;
                format!("R{r} ← (1/{}) · R{r}", fractions.format(factor))
            }
            RowOpKind::Eliminate {
                row,
                pivot_row,
                factor,
                ..
            } => {
                let r = row + 1;
                let sign = if factor < 0.0 { "+" } else { "\u{2212}" };
                format!(
                    "R{r} ← R{r} {sign} {}·R{}",
                    fractions.format(factor.abs()),
                    pivot_row + 1
                )
            }
        }
    }
}

/// A recorded row operation and the matrix state right after it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RowOp {
    kind: RowOpKind,
    snapshot: Matrix,
}

impl RowOp {
    pub fn kind(&self) -> &RowOpKind {
        &self.kind
    }

    pub fn snapshot(&self) -> &Matrix {
        &self.snapshot
    }
}

/// Append-only log of row operations in the order they were applied
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct RowOpLog {
    ops: Vec<RowOp>,
}

impl RowOpLog {
    /// Apply `kind` to `matrix` and append it with a snapshot
    fn perform(&mut self, kind: RowOpKind, matrix: &mut Matrix) {
        kind.apply(matrix);
        trace!("row op #{}: {kind:?}", self.ops.len() + 1);
        self.ops.push(RowOp {
            kind,
            snapshot: matrix.clone(),
        });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RowOp> {
        self.ops.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, RowOp> {
        self.ops.iter()
    }

    pub fn as_slice(&self) -> &[RowOp] {
        &self.ops
    }
}

impl<'a> IntoIterator for &'a RowOpLog {
    type Item = &'a RowOp;
    type IntoIter = core::slice::Iter<'a, RowOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Outcome of [`reduce`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reduction {
    result: Matrix,
    log: RowOpLog,
    pivot_columns: Vec<usize>,
}

impl Reduction {
    /// The matrix in reduced row-echelon form
    pub fn result(&self) -> &Matrix {
        &self.result
    }

    pub fn into_result(self) -> Matrix {
        self.result
    }

    pub fn log(&self) -> &RowOpLog {
        &self.log
    }

    /// Columns that received a leading 1, in row order
    pub fn pivot_columns(&self) -> &[usize] {
        &self.pivot_columns
    }

    pub fn rank(&self) -> usize {
        self.pivot_columns.len()
    }

    /// Re-apply the log to `original`, finishing with the same noise cleanup
    pub fn replay(&self, original: &Matrix) -> Matrix {
        let mut m = original.clone();
        for op in &self.log {
            op.kind.apply(&mut m);
        }
        m.snap_noise(NOISE_THRESHOLD);
        m
    }
}

/// Reduce `a` to reduced row-echelon form, recording every row operation
///
/// Columns whose best pivot candidate is below [`PIVOT_EPSILON`] are skipped
/// rather than treated as an error. Empty matrices come back unchanged with
/// an empty log.
pub fn reduce(a: &Matrix) -> Reduction {
    let mut m = a.clone();
    let mut log = RowOpLog::default();
    let mut pivot_columns = Vec::new();
    let (rows, cols) = (m.nrows(), m.ncols());
    let mut cursor = 0;

    for col in 0..cols {
        if cursor >= rows {
            break;
        }

        let mut pivot_row = cursor;
        let mut max_abs = m[(cursor, col)].abs();
        for i in cursor + 1..rows {
            let v = m[(i, col)].abs();
            if v > max_abs {
                max_abs = v;
                pivot_row = i;
            }
        }
        if max_abs < PIVOT_EPSILON {
            continue;
        }

        if pivot_row != cursor {
            log.perform(
                RowOpKind::Swap {
                    row: cursor,
                    with: pivot_row,
                },
                &mut m,
            );
        }

        let pivot = m[(cursor, col)];
        if (pivot - 1.0).abs() > PIVOT_EPSILON {
            log.perform(
                RowOpKind::Scale {
                    row: cursor,
                    factor: pivot,
                    column: col,
                },
                &mut m,
            );
        }

        for i in 0..rows {
            if i == cursor {
                continue;
            }
            let factor = m[(i, col)];
            if factor.abs() < PIVOT_EPSILON {
                continue;
            }
            log.perform(
                RowOpKind::Eliminate {
                    row: i,
                    pivot_row: cursor,
                    factor,
                    column: col,
                },
                &mut m,
            );
        }

        pivot_columns.push(col);
        cursor += 1;
    }

    m.snap_noise(NOISE_THRESHOLD);
    debug!(
        "reduced {} matrix: {} row ops, rank {}",
        a.dimensions(),
        log.len(),
        pivot_columns.len()
    );

    Reduction {
        result: m,
        log,
        pivot_columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
        let data = (0..rows)
            .map(|_| (0..cols).map(|_| rng.gen_range(-9..=9) as f64).collect())
            .collect();
        Matrix::new(data).unwrap()
    }

    #[test]
    fn test_full_rank_reduces_to_identity() {
        let a = Matrix::from([[2.0, 4.0], [1.0, 3.0]]);
        let reduction = reduce(&a);
        assert_eq!(reduction.result(), &Matrix::from([[1.0, 0.0], [0.0, 1.0]]));
        assert_eq!(reduction.rank(), 2);
        assert_eq!(reduction.pivot_columns(), &[0, 1]);
    }

    #[test]
    fn test_recorded_operations_in_order() {
        let a = Matrix::from([[1.0, 2.0], [3.0, 4.0]]);
        let reduction = reduce(&a);
        let kinds: Vec<RowOpKind> = reduction.log().iter().map(|op| *op.kind()).collect();

        assert_eq!(
            kinds[0],
            RowOpKind::Swap { row: 0, with: 1 }
        );
        assert_eq!(
            kinds[1],
            RowOpKind::Scale {
                row: 0,
                factor: 3.0,
                column: 0
            }
        );
        assert_eq!(
            kinds[2],
            RowOpKind::Eliminate {
                row: 1,
                pivot_row: 0,
                factor: 1.0,
                column: 0
            }
        );
        assert_eq!(reduction.log().get(0).unwrap().snapshot(), &Matrix::from([[3.0, 4.0], [1.0, 2.0]]));
        assert!(reduction
            .result()
            .max_abs_difference(&Matrix::identity(2, 2))
            .is_some_and(|d| d < 1e-12));
    }

    #[test]
    fn test_descriptions() {
        let fractions = FractionConfig::default();
        assert_eq!(
            RowOpKind::Swap { row: 0, with: 2 }.describe(&fractions),
            "R1 ↔ R3"
        );
        assert_eq!(
            RowOpKind::Scale {
                row: 1,
                factor: 0.5,
                column: 0
            }
            .describe(&fractions),
            "R2 ← (1/1/2) · R2"
        );
        assert_eq!(
            RowOpKind::Eliminate {
                row: 1,
                pivot_row: 0,
                factor: 1.0 / 3.0,
                column: 0
            }
            .describe(&fractions),
            "R2 ← R2 \u{2212} 1/3·R1"
        );
        assert_eq!(
            RowOpKind::Eliminate {
                row: 0,
                pivot_row: 1,
                factor: -2.0,
                column: 1
            }
            .describe(&fractions),
            "R1 ← R1 + 2·R2"
        );
    }

    #[test]
    fn test_rank_deficient_and_non_square() {
        let a = Matrix::from([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [1.0, 1.0, 1.0]]);
        let reduction = reduce(&a);
        assert_eq!(reduction.rank(), 2);
        assert_eq!(
            reduction.result(),
            &Matrix::from([[1.0, 0.0, -1.0], [0.0, 1.0, 2.0], [0.0, 0.0, 0.0]])
        );

        let wide = Matrix::from([[0.0, 2.0, 4.0, 2.0]]);
        let reduction = reduce(&wide);
        assert_eq!(reduction.result(), &Matrix::from([[0.0, 1.0, 2.0, 1.0]]));
        assert_eq!(reduction.pivot_columns(), &[1]);
    }

    #[test]
    fn test_zero_matrix_has_no_ops() {
        let reduction = reduce(&Matrix::zeros(3, 3));
        assert!(reduction.log().is_empty());
        assert_eq!(reduction.rank(), 0);
    }

    #[test]
    fn test_degenerate_inputs_unchanged() {
        for m in [Matrix::empty(), Matrix::zeros(3, 0)] {
            let reduction = reduce(&m);
            assert_eq!(reduction.result(), &m);
            assert!(reduction.log().is_empty());
        }
    }

    #[test]
    fn test_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        for (rows, cols) in [(2, 2), (3, 4), (4, 3), (5, 5)] {
            let a = random_matrix(&mut rng, rows, cols);
            let once = reduce(&a);
            let twice = reduce(once.result());
            assert_eq!(twice.result(), once.result());
        }
        assert!(reduce(&Matrix::identity(3, 3)).log().is_empty());
    }

    #[test]
    fn test_replay_reproduces_snapshots_and_result() {
        let mut rng = StdRng::seed_from_u64(42);
        for (rows, cols) in [(2, 2), (3, 3), (3, 5), (6, 4), (12, 12)] {
            let a = random_matrix(&mut rng, rows, cols);
            let reduction = reduce(&a);

            let mut state = a.clone();
            for op in reduction.log() {
                op.kind().apply(&mut state);
                assert_eq!(&state, op.snapshot());
            }
            assert_eq!(reduction.replay(&a), *reduction.result());
        }
    }
}
