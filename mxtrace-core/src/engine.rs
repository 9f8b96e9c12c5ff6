//! Local compute pipeline: validate, compute, then explain

use log::debug;

use crate::fraction::FractionConfig;
use crate::outcome::{Computation, Notice};
use crate::reduction::reduce;
use crate::trace::TraceRenderer;
use crate::{elementwise, product, Matrix, MxError, Operation, Result};

/// Stateless engine running every operation locally
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Engine {
    renderer: TraceRenderer,
}

impl Engine {
    pub fn new(fractions: FractionConfig) -> Self {
        Self {
            renderer: TraceRenderer::new(fractions),
        }
    }

    pub fn renderer(&self) -> &TraceRenderer {
        &self.renderer
    }

    /// Numeric result only, no trace
    pub fn evaluate(&self, op: Operation, a: &Matrix, b: Option<&Matrix>) -> Result<Matrix> {
        if op == Operation::ReduceToRref {
            return Ok(reduce(a).into_result());
        }
        let b = b.ok_or(MxError::MissingOperand { op })?;
        match op {
            Operation::Add => elementwise::add(a, b),
            Operation::Subtract => elementwise::subtract(a, b),
            _ => product::multiply(a, b),
        }
    }

    /// Result and trace for `op`; `b` is ignored for reduction
    ///
    /// Shapes are checked before anything is computed, so an incompatible
    /// request yields neither a partial result nor a trace.
    pub fn compute(&self, op: Operation, a: &Matrix, b: Option<&Matrix>) -> Result<Computation> {
        op.check(a.dimensions(), b.map(Matrix::dimensions))?;

        let computation = match (op, b) {
            (Operation::ReduceToRref, _) => {
                let reduction = reduce(a);
                let trace = self.renderer.reduction(a, &reduction);
                Computation::new(op, reduction.into_result(), trace)
            }
            (_, Some(b)) => {
                let result = self.evaluate(op, a, Some(b))?;
                let trace = self.renderer.binary(op, a, b, &result)?;
                Computation::new(op, result, trace)
            }
            (_, None) => return Err(MxError::MissingOperand { op }),
        };

        debug!(
            "{op}: {} result, {} steps",
            computation.result().dimensions(),
            computation.trace().steps().len()
        );
        Ok(computation.with_notices(degenerate_notices(op, a, b)))
    }
}

/// Compute `op` locally with the default configuration
pub fn compute(op: Operation, a: &Matrix, b: Option<&Matrix>) -> Result<Computation> {
    Engine::default().compute(op, a, b)
}

/// One notice per operand that has no rows or no columns
pub fn degenerate_notices(op: Operation, a: &Matrix, b: Option<&Matrix>) -> Vec<Notice> {
    let operands = [Some(a), b.filter(|_| op.arity() == 2)];
    operands
        .into_iter()
        .zip(['A', 'B'])
        .filter_map(|(m, operand)| {
            let m = m?;
            m.is_empty().then(|| Notice::DegenerateInput {
                operand,
                dimension: m.dimensions(),
            })
        })
        .collect()
}
