//! Recipe store error types.

use costing::CostingError;
use thiserror::Error;

/// Errors that can occur during recipe store operations.
///
/// A recipe that does not exist, or belongs to another user, is not an error:
/// lookups return `None` and deletes return `false`.
#[derive(Debug, Error)]
pub enum RecipeStoreError {
    /// Duplicate entity.
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },

    /// Input rejected before any write.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CostingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Foreign key constraint violation.
    #[error("Foreign key constraint violation: {0}")]
    ForeignKeyViolation(String),

    /// A stored row could not be decoded.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl RecipeStoreError {
    /// Creates an already exists error.
    pub fn already_exists(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity_type,
            id: id.into(),
        }
    }

    /// Returns true if the input was rejected by validation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type for recipe store operations.
pub type StoreResult<T> = Result<T, RecipeStoreError>;
