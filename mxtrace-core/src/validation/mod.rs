//! Shape validation and matrix-literal parsing
//!
//! Pure functions with no I/O; every operation checks its operands here
//! before any arithmetic happens.

pub mod parsing;
pub mod shape;

pub use parsing::{parse_cell, parse_matrix};
pub use shape::{validate_product_shape, validate_rectangular, validate_same_shape};
