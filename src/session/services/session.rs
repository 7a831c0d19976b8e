//! Session lifecycle: start-up verification, sign-in, sign-out.

use std::sync::{Arc, PoisonError, RwLock};

use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::directory::domain::User;
use crate::remote::RemoteStoreError;
use crate::session::{
    domain::{AuthState, BearerToken, Credentials, Registration, SessionDomainError},
    ports::{AuthGateway, TokenStore, TokenStoreError},
};

/// Errors returned by [`SessionService`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] SessionDomainError),
    /// The token could not be read or written.
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
    /// The authentication endpoint rejected the request.
    #[error("authentication failed: {0}")]
    Gateway(#[from] RemoteStoreError),
}

/// Owns the authentication state and the persisted token.
pub struct SessionService<T, G, C>
where
    T: TokenStore,
    G: AuthGateway,
    C: Clock + Send + Sync,
{
    tokens: Arc<T>,
    gateway: Arc<G>,
    clock: Arc<C>,
    state: RwLock<AuthState>,
}

impl<T, G, C> SessionService<T, G, C>
where
    T: TokenStore,
    G: AuthGateway,
    C: Clock + Send + Sync,
{
    /// Creates a signed-out session.
    #[must_use]
    pub const fn new(tokens: Arc<T>, gateway: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            tokens,
            gateway,
            clock,
            state: RwLock::new(AuthState::anonymous()),
        }
    }

    /// Restores the session from the persisted token.
    ///
    /// Expired, malformed or server-rejected tokens are removed and the
    /// session stays anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::TokenStore`] only when token storage itself
    /// fails.
    pub async fn init(&self) -> Result<AuthState, SessionError> {
        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => return Ok(self.replace(AuthState::anonymous())),
            Err(TokenStoreError::Corrupt(err)) => {
                return self.discard(&format!("stored token is unreadable: {err}"));
            }
            Err(err) => return Err(err.into()),
        };

        match token.is_expired_at(self.clock.utc()) {
            Ok(false) => {}
            Ok(true) => return self.discard("token expired"),
            Err(err) => return self.discard(&err.to_string()),
        }

        match self.gateway.current_user().await {
            Ok(user) => {
                info!(user = %user.id(), "session restored");
                Ok(self.replace(AuthState::authenticated(token, user)))
            }
            Err(err) => self.discard(&err.to_string()),
        }
    }

    /// Persists `token` and signs `user` in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::TokenStore`] when the token cannot be saved.
    pub fn login(&self, token: BearerToken, user: User) -> Result<AuthState, SessionError> {
        self.tokens.save(&token)?;
        info!(user = %user.id(), admin = user.is_admin(), "signed in");
        Ok(self.replace(AuthState::authenticated(token, user)))
    }

    /// Exchanges credentials for a token and signs in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Gateway`] when the server rejects the
    /// credentials, or [`SessionError::TokenStore`] when saving fails.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthState, SessionError> {
        let grant = self.gateway.login(credentials).await?;
        self.login(grant.token, grant.user)
    }

    /// Registers a new account and signs in with it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Gateway`] when registration is rejected, or
    /// [`SessionError::TokenStore`] when saving fails.
    pub async fn register(&self, registration: &Registration) -> Result<AuthState, SessionError> {
        let grant = self.gateway.register(registration).await?;
        self.login(grant.token, grant.user)
    }

    /// Removes the token and signs out.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::TokenStore`] when the token cannot be removed.
    pub fn logout(&self) -> Result<AuthState, SessionError> {
        self.tokens.clear()?;
        info!("signed out");
        Ok(self.replace(AuthState::anonymous()))
    }

    /// Returns the current authentication state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn discard(&self, reason: &str) -> Result<AuthState, SessionError> {
        warn!(reason, "discarding stored token");
        self.tokens.clear()?;
        Ok(self.replace(AuthState::anonymous()))
    }

    fn replace(&self, next: AuthState) -> AuthState {
        debug!(authenticated = next.is_authenticated(), "session state changed");
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        next
    }
}
