//! Remote authentication contract.

use async_trait::async_trait;

use crate::directory::domain::User;
use crate::remote::RemoteResult;
use crate::session::domain::{AuthGrant, Credentials, Registration};

/// Server-side authentication endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for a token.
    async fn login(&self, credentials: &Credentials) -> RemoteResult<AuthGrant>;

    /// Creates an account and signs it in.
    async fn register(&self, registration: &Registration) -> RemoteResult<AuthGrant>;

    /// Returns the user owning the current token.
    async fn current_user(&self) -> RemoteResult<User>;
}
