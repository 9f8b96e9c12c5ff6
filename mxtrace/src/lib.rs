//! mxtrace - Matrix step-trace sessions
//!
//! Runs matrix operations through an arithmetic delegate and explains every
//! result with a step trace.
//!
//! ## Architecture
//!
//! - **mxtrace-core**: matrices, engines, rational rendering and traces (no I/O)
//! - **mxtrace**: delegates, the remote wire format, sessions and configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mxtrace::{Matrix, Operation, Session, SessionConfig};
//!
//! # async fn example() -> Result<(), mxtrace::MxError> {
//! let session = Session::local(SessionConfig::from_env()?);
//! let a = Matrix::from([[1.0, 2.0], [3.0, 4.0]]);
//! let b = Matrix::from([[5.0, 6.0], [7.0, 8.0]]);
//!
//! let outcome = session.compute(Operation::Multiply, &a, Some(&b)).await;
//! println!("{}", outcome.steps());
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **serde**: JSON wire adapter and serializable outcomes
//! - **http**: remote delegate over HTTP (reqwest + tokio)
//! - **cli**: command-line front end (`examples/cli.rs`)

pub use mxtrace_core::{
    // Data model
    Dimension, Matrix, Operation,
    // Engines
    compute, reduce, to_fraction, Engine, FractionConfig, TraceRenderer,
    // Results
    Computation, Notice, Outcome, Step, TextMatrix, Trace,
    // Error handling
    ErrorCategory, MxError, Result,
    // Parsing and hints
    compatibility_hint, parse_matrix,
};

pub mod config;
pub mod delegate;
pub mod generate;
pub mod http_backend;
pub mod session;
#[cfg(feature = "serde")]
pub mod wire;

pub use config::{FallbackPolicy, SessionConfig};
pub use delegate::{ArithmeticDelegate, DelegateReply, DelegateRequest, LocalDelegate};
pub use generate::MatrixSource;
pub use http_backend::HttpDelegate;
pub use session::Session;
