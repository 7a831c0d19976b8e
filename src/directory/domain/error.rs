//! Validation errors for directory records.

use thiserror::Error;

/// Errors raised while constructing directory values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryDomainError {
    /// An identifier was empty or whitespace.
    #[error("{0} identifier must not be blank")]
    BlankIdentifier(&'static str),

    /// A role name is neither `admin` nor `user`.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// A required text field was blank.
    #[error("{0} must not be blank")]
    BlankField(&'static str),
}
