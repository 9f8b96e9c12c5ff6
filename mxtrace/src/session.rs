//! Sessions: one delegate, one configuration, many computations
//!
//! A session validates operand shapes locally before its delegate is ever
//! asked, then decides which numbers are shown:
//!
//! - add, subtract and multiply take their result from the delegate, and
//!   the trace is rendered around that same result
//! - reduction always shows the locally traced elimination; a remote
//!   delegate is only asked to cross-check it
//!
//! Delegate failures follow the configured [`FallbackPolicy`].

use log::{debug, warn};

use crate::config::{FallbackPolicy, SessionConfig};
use crate::delegate::{ArithmeticDelegate, DelegateRequest, LocalDelegate};
use mxtrace_core::{
    degenerate_notices, Computation, Engine, Matrix, MxError, Notice, Operation, Outcome, Result,
};

pub struct Session<D> {
    delegate: D,
    engine: Engine,
    config: SessionConfig,
}

impl Session<LocalDelegate> {
    /// Session computing everything in-process
    pub fn local(config: SessionConfig) -> Self {
        Self::new(LocalDelegate::new(), config)
    }
}

impl<D: ArithmeticDelegate> Session<D> {
    pub fn new(delegate: D, config: SessionConfig) -> Self {
        Self {
            delegate,
            engine: Engine::new(config.fractions),
            config,
        }
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Compute `op` and package the result for presentation
    ///
    /// Never fails: errors become an [`Outcome`] with a message and the
    /// placeholder trace.
    pub async fn compute(&self, op: Operation, a: &Matrix, b: Option<&Matrix>) -> Outcome {
        let result = self.try_compute(op, a, b).await;
        if let Err(e) = &result {
            warn!("{op} failed: {e}");
        }
        Outcome::from(result)
    }

    /// Compute `op`, propagating errors
    pub async fn try_compute(
        &self,
        op: Operation,
        a: &Matrix,
        b: Option<&Matrix>,
    ) -> Result<Computation> {
        op.check(a.dimensions(), b.map(Matrix::dimensions))?;

        match (op, b) {
            (Operation::ReduceToRref, _) => self.reduce(a).await,
            (_, Some(b)) => self.binary(op, a, b).await,
            (_, None) => Err(MxError::MissingOperand { op }),
        }
    }

    async fn binary(&self, op: Operation, a: &Matrix, b: &Matrix) -> Result<Computation> {
        let request = DelegateRequest::new(op, a, Some(b));
        let result = match self.ask(&request).await {
            Ok(result) => result,
            Err(e) if falls_back(&e) => return self.fall_back(op, a, Some(b), e),
            Err(e) => return Err(e),
        };

        let trace = self.engine.renderer().binary(op, a, b, &result)?;
        Ok(Computation::new(op, result, trace).with_notices(degenerate_notices(op, a, Some(b))))
    }

    async fn reduce(&self, a: &Matrix) -> Result<Computation> {
        let op = Operation::ReduceToRref;
        let mut local = self.engine.compute(op, a, None)?;
        if !self.delegate.is_remote() {
            return Ok(local);
        }

        match self.ask(&DelegateRequest::new(op, a, None)).await {
            Ok(remote) => {
                // ask() has already checked the shape
                let diff = remote.max_abs_difference(local.result()).unwrap_or(f64::INFINITY);
                if diff > self.config.agreement_tolerance {
                    warn!("{} disagrees with the traced reduction by {diff:e}", self.delegate.name());
                    local.push_notice(Notice::BackendDisagreement { max_difference: diff });
                }
                Ok(local)
            }
            Err(e) if falls_back(&e) => match self.config.fallback {
                FallbackPolicy::Strict => Err(e),
                FallbackPolicy::Local => {
                    warn!("could not cross-check reduction: {e}");
                    local.push_notice(Notice::LocalFallback { reason: e.to_string() });
                    Ok(local)
                }
            },
            Err(e) => Err(e),
        }
    }

    /// The delegate's matrix for `request`, checked against the expected shape
    async fn ask(&self, request: &DelegateRequest<'_>) -> Result<Matrix> {
        let op = request.operation;
        debug!("asking {} for {op}", self.delegate.name());

        let result = self
            .delegate
            .compute(request)
            .await?
            .map_err(MxError::BackendRejected)?;

        let expected = op.check(request.a.dimensions(), request.b.map(Matrix::dimensions))?;
        if result.dimensions() != expected {
            return Err(MxError::ResultShape {
                expected,
                actual: result.dimensions(),
            });
        }
        Ok(result)
    }

    fn fall_back(
        &self,
        op: Operation,
        a: &Matrix,
        b: Option<&Matrix>,
        error: MxError,
    ) -> Result<Computation> {
        match self.config.fallback {
            FallbackPolicy::Strict => Err(error),
            FallbackPolicy::Local => {
                warn!("{} failed, computing {op} locally: {error}", self.delegate.name());
                let mut computation = self.engine.compute(op, a, b)?;
                computation.push_notice(Notice::LocalFallback {
                    reason: error.to_string(),
                });
                Ok(computation)
            }
        }
    }
}

/// Whether `error` is the delegate's fault rather than the input's
fn falls_back(error: &MxError) -> bool {
    error.is_backend_failure() || matches!(error, MxError::ResultShape { .. })
}
