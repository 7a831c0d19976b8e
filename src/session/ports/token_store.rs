//! Persistence contract for the bearer token.

use std::io;
use thiserror::Error;

use crate::session::domain::{BearerToken, SessionDomainError};

/// Result type for token store operations.
pub type TokenStoreResult<T> = Result<T, TokenStoreError>;

/// Errors returned by token store implementations.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Reading or writing the token failed.
    #[error("token storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The stored value is not a usable token.
    #[error("stored token is invalid: {0}")]
    Corrupt(#[from] SessionDomainError),
}

/// Durable home of the current bearer token.
///
/// Calls are synchronous and cheap; the HTTP adapter reads the token before
/// every request.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when storage cannot be read.
    fn load(&self) -> TokenStoreResult<Option<BearerToken>>;

    /// Replaces the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when storage cannot be written.
    fn save(&self, token: &BearerToken) -> TokenStoreResult<()>;

    /// Removes the stored token. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when storage cannot be written.
    fn clear(&self) -> TokenStoreResult<()>;
}
