//! mxtrace-core - Matrix Operation & Step-Trace Engine
//!
//! Small dense real matrices, the operations a linear-algebra course starts
//! with, and a reproducible derivation of every result:
//!
//! - [`fraction`]: shortest rational text for a float (`0.75` → `3/4`)
//! - [`elementwise`]: add and subtract
//! - [`product`]: matrix multiplication
//! - [`reduction`]: Gauss–Jordan elimination with a replayable row-op log
//! - [`trace`]: step traces built from the same inputs and outputs
//!
//! Everything here is a pure function over explicit arguments; there is no
//! I/O and no shared state. Remote arithmetic lives in the `mxtrace` crate.
//!
//! ```rust
//! use mxtrace_core::{compute, Matrix, Operation};
//!
//! let a = Matrix::from([[2.0, 4.0], [1.0, 3.0]]);
//! let c = compute(Operation::ReduceToRref, &a, None)?;
//! assert_eq!(c.result(), &Matrix::identity(2, 2));
//! println!("{}", c.trace());
//! # Ok::<(), mxtrace_core::MxError>(())
//! ```

pub mod elementwise;
pub mod engine;
pub mod error;
pub mod fraction;
pub mod matrix;
pub mod operation;
pub mod outcome;
pub mod product;
pub mod reduction;
pub mod trace;
pub mod validation;

pub use elementwise::{add, subtract};
pub use engine::{compute, degenerate_notices, Engine};
pub use error::*;
pub use fraction::{to_fraction, FractionConfig};
pub use matrix::{Dimension, Matrix};
pub use operation::{compatibility_hint, Operation};
pub use outcome::{Computation, Notice, Outcome};
pub use product::{dot, multiply};
pub use reduction::{reduce, Reduction, RowOp, RowOpKind, RowOpLog};
pub use trace::{Step, TextMatrix, Trace, TraceRenderer};
pub use validation::parse_matrix;
