//! Domain types for authentication state.

mod auth;
mod error;
mod token;

pub use auth::{AuthGrant, AuthState, Credentials, Registration};
pub use error::SessionDomainError;
pub use token::BearerToken;
