//! In-memory authentication gateway.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use uuid::Uuid;

use crate::directory::domain::{Role, User, UserId};
use crate::remote::{RemoteResult, RemoteStoreError};
use crate::session::{
    domain::{AuthGrant, BearerToken, Credentials, Registration, SessionDomainError},
    ports::AuthGateway,
};

/// Gateway backed by a list of accounts keyed by email.
///
/// `current_user` answers for whichever account last signed in (or the user
/// set with [`InMemoryAuthGateway::set_current_user`]) and counts its calls.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthGateway {
    state: Arc<RwLock<GatewayState>>,
}

#[derive(Debug, Default)]
struct GatewayState {
    accounts: Vec<Account>,
    current: Option<User>,
    current_user_calls: usize,
}

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
    token: BearerToken,
}

impl InMemoryAuthGateway {
    /// Creates a gateway with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account that signs in with `password` and receives `token`.
    #[must_use]
    pub fn with_account(self, user: User, password: impl Into<String>, token: BearerToken) -> Self {
        self.write().accounts.push(Account {
            user,
            password: password.into(),
            token,
        });
        self
    }

    /// Sets the user returned by `current_user`.
    pub fn set_current_user(&self, user: Option<User>) {
        self.write().current = user;
    }

    /// Returns how many times `current_user` was called.
    #[must_use]
    pub fn current_user_calls(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current_user_calls
    }

    fn write(&self) -> RwLockWriteGuard<'_, GatewayState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn rejected(err: &impl std::fmt::Display) -> RemoteStoreError {
    RemoteStoreError::Rejected {
        status: 400,
        message: err.to_string(),
    }
}

/// Issues an unsigned JWT whose payload names the user and carries no `exp`.
fn unsigned_token(user_id: &UserId) -> Result<BearerToken, SessionDomainError> {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::json!({ "sub": user_id.as_str() }).to_string());
    BearerToken::new(format!("{header}.{payload}.memory"))
}

#[async_trait]
impl AuthGateway for InMemoryAuthGateway {
    async fn login(&self, credentials: &Credentials) -> RemoteResult<AuthGrant> {
        let mut state = self.write();
        let account = state
            .accounts
            .iter()
            .find(|account| {
                account.user.email() == credentials.email()
                    && account.password == credentials.password()
            })
            .cloned()
            .ok_or_else(|| RemoteStoreError::Unauthorized("Invalid email or password".to_owned()))?;
        state.current = Some(account.user.clone());
        Ok(AuthGrant {
            token: account.token,
            user: account.user,
        })
    }

    async fn register(&self, registration: &Registration) -> RemoteResult<AuthGrant> {
        let mut state = self.write();
        if state
            .accounts
            .iter()
            .any(|account| account.user.email() == registration.email())
        {
            return Err(rejected(&"Email already in use"));
        }
        let id = UserId::new(Uuid::new_v4().to_string()).map_err(|err| rejected(&err))?;
        let user = User::new(
            id,
            registration.username(),
            registration.email(),
            Role::User,
            DefaultClock.utc(),
        )
        .map_err(|err| rejected(&err))?;
        let token = unsigned_token(user.id()).map_err(|err| rejected(&err))?;
        state.accounts.push(Account {
            user: user.clone(),
            password: registration.password().to_owned(),
            token: token.clone(),
        });
        state.current = Some(user.clone());
        Ok(AuthGrant { token, user })
    }

    async fn current_user(&self) -> RemoteResult<User> {
        let mut state = self.write();
        state.current_user_calls += 1;
        state
            .current
            .clone()
            .ok_or_else(|| RemoteStoreError::Unauthorized("invalid token".to_owned()))
    }
}
