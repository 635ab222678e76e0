//! The calculator's pure functions and their name table

use crate::error::{CalculatorError, Result};
use std::fmt;
use std::str::FromStr;

/// Add two numbers
pub fn add(a: i64, b: i64) -> Result<i64> {
    a.checked_add(b)
        .ok_or(CalculatorError::Overflow { op: "add", a, b })
}

/// Multiply two numbers
pub fn multiply(a: i64, b: i64) -> Result<i64> {
    a.checked_mul(b)
        .ok_or(CalculatorError::Overflow { op: "multiply", a, b })
}

/// Divide two numbers
///
/// Always returns a float, so `divide(10, 2)` is `5.0`.
pub fn divide(a: i64, b: i64) -> Result<f64> {
    if b == 0 {
        return Err(CalculatorError::DivisionByZero);
    }
    Ok(a as f64 / b as f64)
}

/// Result of an arithmetic call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer result of `add` / `multiply`
    Int(i64),
    /// Float result of `divide`
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{x:.1}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

/// The calculator's functions, addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    /// `add(a, b)`
    Add,
    /// `multiply(a, b)`
    Multiply,
    /// `divide(a, b)`
    Divide,
}

impl ArithmeticOp {
    /// Every operation, in registration order
    pub const ALL: [ArithmeticOp; 3] = [ArithmeticOp::Add, ArithmeticOp::Multiply, ArithmeticOp::Divide];

    /// Name the model calls this function by
    pub fn name(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Multiply => "multiply",
            ArithmeticOp::Divide => "divide",
        }
    }

    /// Description shown to the model
    pub fn description(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "Add two numbers.",
            ArithmeticOp::Multiply => "Multiply two numbers.",
            ArithmeticOp::Divide => "Divide two numbers.",
        }
    }

    /// Apply the operation
    pub fn apply(self, a: i64, b: i64) -> Result<Number> {
        match self {
            ArithmeticOp::Add => add(a, b).map(Number::Int),
            ArithmeticOp::Multiply => multiply(a, b).map(Number::Int),
            ArithmeticOp::Divide => divide(a, b).map(Number::Float),
        }
    }
}

impl FromStr for ArithmeticOp {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self> {
        ArithmeticOp::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| CalculatorError::UnknownFunction(s.to_string()))
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functions() {
        assert_eq!(add(2, 3), Ok(5));
        assert_eq!(multiply(4, 5), Ok(20));
        assert_eq!(divide(10, 2), Ok(5.0));
        assert_eq!(divide(1, 0), Err(CalculatorError::DivisionByZero));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(matches!(add(i64::MAX, 1), Err(CalculatorError::Overflow { op: "add", .. })));
        assert!(multiply(i64::MIN, -1).is_err());
    }

    #[test]
    fn test_op_names_round_trip() {
        for op in ArithmeticOp::ALL {
            assert_eq!(op.name().parse::<ArithmeticOp>(), Ok(op));
        }
        assert_eq!(
            "subtract".parse::<ArithmeticOp>(),
            Err(CalculatorError::UnknownFunction("subtract".to_string()))
        );
    }

    #[test]
    fn test_number_display() {
        assert_eq!(ArithmeticOp::Add.apply(2, 3).unwrap().to_string(), "5");
        assert_eq!(ArithmeticOp::Divide.apply(10, 2).unwrap().to_string(), "5.0");
        assert_eq!(ArithmeticOp::Divide.apply(1, 4).unwrap().to_string(), "0.25");
    }
}
