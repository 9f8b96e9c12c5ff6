//! The operations a caller can request

use core::fmt;
use core::str::FromStr;

use crate::validation::{validate_product_shape, validate_same_shape};
use crate::{Dimension, MxError, Result};

/// Matrix operation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    #[cfg_attr(feature = "serde", serde(rename = "rref"))]
    ReduceToRref,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::ReduceToRref,
    ];

    /// Number of matrix operands the operation takes
    pub const fn arity(self) -> usize {
        match self {
            Operation::ReduceToRref => 1,
            _ => 2,
        }
    }

    /// Short lowercase name, also the remote endpoint name
    pub const fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::ReduceToRref => "rref",
        }
    }

    /// Infix symbol shown between operands in a trace
    pub const fn symbol(self) -> Option<&'static str> {
        match self {
            Operation::Add => Some("+"),
            Operation::Subtract => Some("\u{2212}"),
            Operation::Multiply => Some("×"),
            Operation::ReduceToRref => None,
        }
    }

    /// Heading used by the step trace
    pub const fn title(self) -> &'static str {
        match self {
            Operation::Add => "Addition",
            Operation::Subtract => "Subtraction",
            Operation::Multiply => "Multiplication",
            Operation::ReduceToRref => "Reduced row-echelon form",
        }
    }

    /// Check operand shapes and return the result dimension
    ///
    /// `b` is ignored for [`Operation::ReduceToRref`].
    pub fn check(self, a: Dimension, b: Option<Dimension>) -> Result<Dimension> {
        match (self, b) {
            (Operation::ReduceToRref, _) => Ok(a),
            (_, None) => Err(MxError::MissingOperand { op: self }),
            (Operation::Multiply, Some(b)) => validate_product_shape(a, b),
            (op, Some(b)) => validate_same_shape(op, a, b),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = MxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(Operation::Add),
            "sub" | "subtract" | "-" => Ok(Operation::Subtract),
            "mul" | "multiply" | "*" | "x" => Ok(Operation::Multiply),
            "rref" | "reduce" => Ok(Operation::ReduceToRref),
            _ => Err(MxError::UnknownOperation(s.to_string())),
        }
    }
}

/// One-line reminder of which operations the current shapes allow
pub fn compatibility_hint(a: Dimension, b: Dimension) -> String {
    format!(
        "Add/Sub require same sizes (A: {a}, B: {b}). Multiply requires A.cols == B.rows ({} vs {}).",
        a.cols, b.rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("add".parse::<Operation>(), Ok(Operation::Add));
        assert_eq!(" SUB ".parse::<Operation>(), Ok(Operation::Subtract));
        assert_eq!("*".parse::<Operation>(), Ok(Operation::Multiply));
        assert_eq!("reduce".parse::<Operation>(), Ok(Operation::ReduceToRref));
        assert_eq!(
            "pow".parse::<Operation>(),
            Err(MxError::UnknownOperation("pow".into()))
        );
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
        }
    }

    #[test]
    fn test_check() {
        let a = Dimension::new(2, 3);
        let b = Dimension::new(3, 2);
        assert_eq!(Operation::Multiply.check(a, Some(b)), Ok(Dimension::new(2, 2)));
        assert!(Operation::Add.check(a, Some(b)).is_err());
        assert_eq!(Operation::Add.check(a, Some(a)), Ok(a));
        assert_eq!(Operation::ReduceToRref.check(a, None), Ok(a));
        assert_eq!(Operation::ReduceToRref.check(a, Some(b)), Ok(a));
        assert_eq!(
            Operation::Subtract.check(a, None),
            Err(MxError::MissingOperand {
                op: Operation::Subtract
            })
        );
    }

    #[test]
    fn test_compatibility_hint() {
        assert_eq!(
            compatibility_hint(Dimension::new(2, 2), Dimension::new(2, 3)),
            "Add/Sub require same sizes (A: 2×2, B: 2×3). Multiply requires A.cols == B.rows (2 vs 2)."
        );
    }
}
