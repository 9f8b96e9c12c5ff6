//! Arithmetic delegates: where the numbers for a session come from
//!
//! A delegate answers one operation on validated operands. It either
//! produces a matrix, answers with an error message of its own, or fails
//! to answer at all; those three outcomes map to `Ok(Ok(_))`, `Ok(Err(_))`
//! and `Err(_)` respectively.

use std::future::{self, Future};

use mxtrace_core::{Engine, Matrix, Operation, Result};

/// The delegate's own answer: a matrix, or the message it rejected the
/// request with
pub type DelegateReply = core::result::Result<Matrix, String>;

/// One operation with borrowed operands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelegateRequest<'a> {
    pub operation: Operation,
    pub a: &'a Matrix,
    /// Absent for reduction
    pub b: Option<&'a Matrix>,
}

impl<'a> DelegateRequest<'a> {
    pub fn new(operation: Operation, a: &'a Matrix, b: Option<&'a Matrix>) -> Self {
        let b = if operation.arity() == 2 { b } else { None };
        Self { operation, a, b }
    }
}

/// Source of numeric results for a [`Session`](crate::Session)
pub trait ArithmeticDelegate {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Whether this delegate computes somewhere other than the local engine
    ///
    /// Reductions are only cross-checked against remote delegates.
    fn is_remote(&self) -> bool {
        true
    }

    /// Compute the requested operation
    fn compute(
        &self,
        request: &DelegateRequest<'_>,
    ) -> impl Future<Output = Result<DelegateReply>> + Send;
}

/// Delegate backed by the in-process engines
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDelegate {
    engine: Engine,
}

impl LocalDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    fn reply(&self, request: &DelegateRequest<'_>) -> DelegateReply {
        self.engine
            .evaluate(request.operation, request.a, request.b)
            .map_err(|e| e.to_string())
    }
}

impl ArithmeticDelegate for LocalDelegate {
    fn name(&self) -> &str {
        "local"
    }

    fn is_remote(&self) -> bool {
        false
    }

    fn compute(
        &self,
        request: &DelegateRequest<'_>,
    ) -> impl Future<Output = Result<DelegateReply>> + Send {
        future::ready(Ok(self.reply(request)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_delegate_answers() {
        let a = Matrix::from([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::from([[5.0, 6.0], [7.0, 8.0]]);
        let delegate = LocalDelegate::new();

        let reply = delegate
            .compute(&DelegateRequest::new(Operation::Multiply, &a, Some(&b)))
            .await
            .unwrap();
        assert_eq!(reply, Ok(Matrix::from([[19.0, 22.0], [43.0, 50.0]])));
        assert!(!delegate.is_remote());
    }

    #[tokio::test]
    async fn test_local_delegate_rejects_mismatch() {
        let a = Matrix::zeros(2, 2);
        let b = Matrix::zeros(3, 3);
        let reply = LocalDelegate::new()
            .compute(&DelegateRequest::new(Operation::Add, &a, Some(&b)))
            .await
            .unwrap();
        assert_eq!(
            reply,
            Err("add requires same dimensions, got 2×2 and 3×3".to_string())
        );
    }

    #[test]
    fn test_request_drops_operand_for_reduction() {
        let a = Matrix::identity(2, 2);
        let request = DelegateRequest::new(Operation::ReduceToRref, &a, Some(&a));
        assert!(request.b.is_none());
    }
}
