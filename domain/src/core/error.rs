//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Text input is required.")]
    EmptyPrompt,

    #[error("No providers configured")]
    NoProviders,

    #[error("Duplicate provider in panel: {0}")]
    DuplicateProvider(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown failure kind: {0}")]
    InvalidFailureKind(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Check if this error is a caller-side validation failure (4xx-equivalent)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyPrompt | DomainError::UnknownProvider(_)
        )
    }
}
