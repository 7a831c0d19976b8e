//! User accounts and roles.

use super::{DirectoryDomainError, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Access level of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May manage users and every task.
    Admin,
    /// Regular board member.
    User,
}

impl Role {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Returns `true` for [`Role::Admin`].
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DirectoryDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(DirectoryDomainError::UnknownRole(other.to_owned())),
        }
    }
}

/// A registered user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user record.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::BlankField`] when the username or
    /// email is blank.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DirectoryDomainError> {
        let name: String = username.into();
        let address: String = email.into();
        if name.trim().is_empty() {
            return Err(DirectoryDomainError::BlankField("username"));
        }
        if address.trim().is_empty() {
            return Err(DirectoryDomainError::BlankField("email"));
        }
        Ok(Self {
            id,
            username: name,
            email: address,
            role,
            created_at,
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the access level.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns `true` when the user is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns the registration time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) const fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}
