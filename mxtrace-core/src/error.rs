//! Error types for matrix operations

use thiserror::Error;

use crate::{Dimension, Operation};

/// Errors that can occur while computing or explaining a matrix operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MxError {
    /// Operand shapes violate the operation's precondition
    #[error("{}", describe_mismatch(.op, .left, .right))]
    DimensionMismatch {
        op: Operation,
        left: Dimension,
        right: Dimension,
    },
    /// A row's length differs from the first row's
    #[error("row {row} has length {len} (expected {expected})")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },
    /// Infinite or NaN cell in an input matrix
    #[error("cell ({row},{col}) is not a finite number")]
    NonFinite { row: usize, col: usize },
    /// Unparseable cell in a matrix literal
    #[error("cell ({row},{col}) is not a number: {token:?}")]
    InvalidCell {
        row: usize,
        col: usize,
        token: String,
    },
    /// Operation name not recognised
    #[error("unknown operation {0:?}")]
    UnknownOperation(String),
    /// A binary operation was requested with a single operand
    #[error("{op} requires two operands")]
    MissingOperand { op: Operation },
    /// A single-operand operation was used where two operands are rendered
    #[error("{0} is not a binary operation")]
    NotBinary(Operation),
    /// A numeric source produced a result of the wrong shape
    #[error("expected a {expected} result, got {actual}")]
    ResultShape {
        expected: Dimension,
        actual: Dimension,
    },
    /// The arithmetic delegate could not be reached or timed out
    #[error("arithmetic backend unavailable: {0}")]
    BackendUnavailable(String),
    /// The arithmetic delegate answered with an error response
    #[error("arithmetic backend rejected the request: {0}")]
    BackendRejected(String),
    /// The arithmetic delegate answered with an unrecognised shape
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
    /// A configuration value could not be interpreted
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: String, value: String },
}

/// Coarse grouping of [`MxError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Operand or result shapes are incompatible
    Shape,
    /// The caller supplied unusable input
    Input,
    /// The arithmetic delegate failed; the caller may retry
    Backend,
    /// Configuration could not be loaded
    Config,
}

impl MxError {
    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            MxError::DimensionMismatch { .. } | MxError::ResultShape { .. } => ErrorCategory::Shape,
            MxError::RaggedRows { .. }
            | MxError::NonFinite { .. }
            | MxError::InvalidCell { .. }
            | MxError::UnknownOperation(_)
            | MxError::MissingOperand { .. }
            | MxError::NotBinary(_) => ErrorCategory::Input,
            MxError::BackendUnavailable(_)
            | MxError::BackendRejected(_)
            | MxError::MalformedResponse(_) => ErrorCategory::Backend,
            MxError::InvalidConfig { .. } => ErrorCategory::Config,
        }
    }

    /// Whether the arithmetic delegate, not the input, is at fault
    pub fn is_backend_failure(&self) -> bool {
        self.category() == ErrorCategory::Backend
    }
}

fn describe_mismatch(op: &Operation, left: &Dimension, right: &Dimension) -> String {
    match op {
        Operation::Multiply => {
            format!("multiply requires A.cols == B.rows, got {left} · {right}")
        }
        _ => format!("{op} requires same dimensions, got {left} and {right}"),
    }
}

/// Result type for matrix operations
pub type Result<T> = core::result::Result<T, MxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_messages() {
        let err = MxError::DimensionMismatch {
            op: Operation::Add,
            left: Dimension::new(2, 2),
            right: Dimension::new(2, 3),
        };
        assert_eq!(err.to_string(), "add requires same dimensions, got 2×2 and 2×3");

        let err = MxError::DimensionMismatch {
            op: Operation::Multiply,
            left: Dimension::new(2, 3),
            right: Dimension::new(2, 2),
        };
        assert_eq!(
            err.to_string(),
            "multiply requires A.cols == B.rows, got 2×3 · 2×2"
        );
        assert_eq!(err.category(), ErrorCategory::Shape);
    }

    #[test]
    fn test_backend_category() {
        assert!(MxError::BackendUnavailable("timeout".into()).is_backend_failure());
        assert!(MxError::MalformedResponse("42".into()).is_backend_failure());
        assert!(!MxError::UnknownOperation("pow".into()).is_backend_failure());
    }
}
