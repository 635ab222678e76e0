//! Error types for calculator operations

use thiserror::Error;

/// Failures of a single arithmetic call
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculatorError {
    /// Divisor was zero
    #[error("division by zero")]
    DivisionByZero,

    /// Result does not fit in a 64-bit integer
    #[error("integer overflow in {op}({a}, {b})")]
    Overflow {
        /// Operation name
        op: &'static str,
        /// First operand
        a: i64,
        /// Second operand
        b: i64,
    },

    /// A function name outside the calculator's table
    #[error("unknown function: {0}")]
    UnknownFunction(String),
}

/// Result type alias for calculator operations
pub type Result<T> = std::result::Result<T, CalculatorError>;

/// Convert CalculatorError to agent_core::Error
impl From<CalculatorError> for agent_core::Error {
    fn from(err: CalculatorError) -> Self {
        match err {
            CalculatorError::UnknownFunction(name) => agent_core::Error::InitializationFailed(
                format!("unknown function: {name}"),
            ),
            other => agent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(CalculatorError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            CalculatorError::Overflow {
                op: "add",
                a: i64::MAX,
                b: 1
            }
            .to_string(),
            format!("integer overflow in add({}, 1)", i64::MAX)
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: agent_core::Error = CalculatorError::DivisionByZero.into();
        assert!(matches!(err, agent_core::Error::ProcessingFailed(ref m) if m == "division by zero"));

        let err: agent_core::Error = CalculatorError::UnknownFunction("pow".to_string()).into();
        assert!(matches!(err, agent_core::Error::InitializationFailed(_)));
    }
}
