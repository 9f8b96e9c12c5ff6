//! Results handed to the presentation layer

use core::fmt;

use crate::trace::Trace;
use crate::{Dimension, Matrix, MxError, Operation};

/// Non-fatal condition attached to a successful computation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Notice {
    /// An operand has no rows or no columns; the result is vacuously empty
    DegenerateInput { operand: char, dimension: Dimension },
    /// The arithmetic delegate failed and the numbers were computed locally
    LocalFallback { reason: String },
    /// The delegate's reduction differs from the traced local one, which is
    /// the one shown
    BackendDisagreement { max_difference: f64 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DegenerateInput { operand, dimension } => {
                write!(f, "{operand} is {dimension}; the result is empty")
            }
            Notice::LocalFallback { reason } => {
                write!(f, "computed locally because the backend failed: {reason}")
            }
            Notice::BackendDisagreement { max_difference } => write!(
                f,
                "backend reduction differs from the traced one by up to {max_difference:e}; \
                 showing the traced result"
            ),
        }
    }
}

/// A numeric result together with its derivation
#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    operation: Operation,
    result: Matrix,
    trace: Trace,
    notices: Vec<Notice>,
}

impl Computation {
    pub fn new(operation: Operation, result: Matrix, trace: Trace) -> Self {
        Self {
            operation,
            result,
            trace,
            notices: Vec::new(),
        }
    }

    pub fn with_notices(mut self, notices: impl IntoIterator<Item = Notice>) -> Self {
        self.notices.extend(notices);
        self
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn result(&self) -> &Matrix {
        &self.result
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

/// `{ result, error, steps }` as consumed by the presentation layer
///
/// `result` and `error` are mutually exclusive; on error `steps` is the
/// placeholder trace.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Outcome {
    result: Option<Matrix>,
    error: Option<String>,
    steps: Trace,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    notices: Vec<Notice>,
}

impl Outcome {
    pub fn success(computation: Computation) -> Self {
        Self {
            result: Some(computation.result),
            error: None,
            steps: computation.trace,
            notices: computation.notices,
        }
    }

    pub fn failure(error: &MxError) -> Self {
        Self {
            result: None,
            error: Some(error.to_string()),
            steps: Trace::placeholder(),
            notices: Vec::new(),
        }
    }

    pub fn result(&self) -> Option<&Matrix> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn steps(&self) -> &Trace {
        &self.steps
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

impl From<crate::Result<Computation>> for Outcome {
    fn from(result: crate::Result<Computation>) -> Self {
        match result {
            Ok(computation) => Self::success(computation),
            Err(error) => Self::failure(&error),
        }
    }
}
