//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unknown dataset type: {0}")]
    UnknownDatasetType(String),

    #[error("Unknown risk category: {0}")]
    UnknownRiskCategory(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("No profile registered for dataset type: {0}")]
    MissingProfile(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
