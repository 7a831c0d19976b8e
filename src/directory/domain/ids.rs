//! Identifier types for directory records.

use super::DirectoryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a validated user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::BlankIdentifier`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        non_blank(value.into(), "user").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = DirectoryDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotificationId(String);

impl NotificationId {
    /// Creates a validated notification identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::BlankIdentifier`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        non_blank(value.into(), "notification").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NotificationId {
    type Error = DirectoryDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NotificationId> for String {
    fn from(value: NotificationId) -> Self {
        value.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn non_blank(raw: String, kind: &'static str) -> Result<String, DirectoryDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DirectoryDomainError::BlankIdentifier(kind));
    }
    Ok(trimmed.to_owned())
}
