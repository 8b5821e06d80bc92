//! Costing error types.

use thiserror::Error;

/// Errors raised by the costing calculator and input validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostingError {
    /// Package quantity of zero.
    #[error("Division by zero: package quantity must not be zero")]
    DivisionByZero,

    /// NaN or infinite input.
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    /// Input rejected before any arithmetic or persistence.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

impl CostingError {
    /// Creates an invalid input error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for costing operations.
pub type CostingResult<T> = Result<T, CostingError>;
