//! Failure contract shared by every remote-store port.
//!
//! Board, directory and session ports all talk to the same REST API, so they
//! share one error vocabulary. Adapters map their transport specifics into
//! these variants; services never inspect HTTP details.

use std::sync::Arc;
use thiserror::Error;

/// Result type for remote-store operations.
pub type RemoteResult<T> = Result<T, RemoteStoreError>;

/// Errors returned by remote-store adapters.
#[derive(Debug, Clone, Error)]
pub enum RemoteStoreError {
    /// The request carried no valid credentials.
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed to perform the operation.
    #[error("permission denied: {0}")]
    Forbidden(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request conflicts with current server state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store rejected the request for another reason.
    #[error("request rejected with status {status}: {message}")]
    Rejected {
        /// HTTP-style status code.
        status: u16,
        /// Server-provided explanation.
        message: String,
    },

    /// The store could not be reached.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The response could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The store is temporarily unable to serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl RemoteStoreError {
    /// Wraps a transport-level error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns `true` when the store reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
