//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Identifier must not be empty")]
    EmptyIdentifier,

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}
