//! Step traces: the human-readable derivation of a result
//!
//! A [`Trace`] is built from the same inputs and outputs as the numeric
//! result it explains. It is consumed only for display.

pub mod render;
pub mod step;

pub use render::TraceRenderer;
pub use step::{Step, TextMatrix};

use core::fmt;

use crate::Operation;

/// Ordered derivation for one computation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Trace {
    operation: Option<Operation>,
    title: String,
    note: String,
    operands: Vec<TextMatrix>,
    steps: Vec<Step>,
}

impl Trace {
    pub(crate) fn new(
        operation: Operation,
        note: String,
        operands: Vec<TextMatrix>,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            operation: Some(operation),
            title: operation.title().to_string(),
            note,
            operands,
            steps,
        }
    }

    /// Stand-in trace shown when there is nothing to explain
    pub fn placeholder() -> Self {
        Self {
            operation: None,
            title: "Matrix Operations".to_string(),
            note: "Enter sizes and values for A and B. Choose an operation and the \
                   step-by-step explanation will show up here."
                .to_string(),
            operands: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Input matrices as display text, A first
    pub fn operands(&self) -> &[TextMatrix] {
        &self.operands
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_placeholder(&self) -> bool {
        self.operation.is_none()
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.note)?;

        // Expression steps already show their operands
        if self.operation == Some(Operation::ReduceToRref) {
            if let Some(a) = self.operands.first() {
                let block = step::side_by_side(&[vec!["A =".to_string()], a.lines()]);
                write!(f, "\n\n{}", block.join("\n"))?;
            }
        }

        for step in &self.steps {
            write!(f, "\n\n{step}")?;
        }
        Ok(())
    }
}
