//! Validation errors for session values.

use thiserror::Error;

/// Errors raised while constructing or inspecting session values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionDomainError {
    /// The token string was empty.
    #[error("bearer token must not be blank")]
    BlankToken,

    /// The token is not a decodable JWT.
    #[error("token is not a valid JWT: {0}")]
    MalformedToken(String),

    /// A required credential field was blank.
    #[error("{0} must not be blank")]
    BlankField(&'static str),
}
