//! Credentials, grants and the observable authentication state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BearerToken, SessionDomainError};
use crate::directory::domain::User;

/// Email and password for `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Creates sign-in credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::BlankField`] when either field is blank.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, SessionDomainError> {
        Ok(Self {
            email: required(email.into(), "email")?,
            password: required(password.into(), "password")?,
        })
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// New account details for `POST /auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    username: String,
    email: String,
    password: String,
}

impl Registration {
    /// Creates registration details.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::BlankField`] when any field is blank.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, SessionDomainError> {
        Ok(Self {
            username: required(username.into(), "username")?,
            email: required(email.into(), "email")?,
            password: required(password.into(), "password")?,
        })
    }

    /// Returns the requested username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn required(value: String, field: &'static str) -> Result<String, SessionDomainError> {
    if value.trim().is_empty() {
        return Err(SessionDomainError::BlankField(field));
    }
    Ok(value)
}

/// Token and identity returned by login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthGrant {
    /// Issued bearer token.
    pub token: BearerToken,
    /// The authenticated user.
    pub user: User,
}

/// Who is signed in, if anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    user: Option<User>,
    token: Option<BearerToken>,
}

impl AuthState {
    /// Returns the signed-out state.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user: None,
            token: None,
        }
    }

    /// Returns the signed-in state for `user`.
    #[must_use]
    pub const fn authenticated(token: BearerToken, user: User) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
        }
    }

    /// Returns the signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Returns the active token.
    #[must_use]
    pub const fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    /// Returns `true` when a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns `true` when the signed-in user is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}
