//! Per-user notifications.

use super::{NotificationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    id: NotificationId,
    user_id: UserId,
    message: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification.
    #[must_use]
    pub fn new(
        id: NotificationId,
        user_id: UserId,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            message: message.into(),
            read: false,
            created_at,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> &NotificationId {
        &self.id
    }

    /// Returns the addressee.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` once the notification has been read.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// Returns the creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) const fn mark_read(&mut self) {
        self.read = true;
    }
}
