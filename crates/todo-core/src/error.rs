//! Todo store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Todo not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TodoError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TodoError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound(_))
    }

    /// Storage-side failures: anything that is neither bad input nor a missing id.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            TodoError::Persistence(_) | TodoError::Io(_) | TodoError::Serialization(_)
        )
    }
}

pub type TodoResult<T> = std::result::Result<T, TodoError>;
