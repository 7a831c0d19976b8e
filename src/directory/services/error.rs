//! Service-level errors for users and notifications.

use thiserror::Error;

use crate::directory::domain::{NotificationId, UserId};
use crate::remote::RemoteStoreError;

/// Errors returned by [`super::UserAdminService`] and
/// [`super::NotificationService`].
#[derive(Debug, Clone, Error)]
pub enum DirectoryServiceError {
    /// A listing could not be fetched.
    #[error("could not load {what}: {source}")]
    Load {
        /// What was being listed.
        what: &'static str,
        /// Underlying store failure.
        #[source]
        source: RemoteStoreError,
    },

    /// A mutation was rejected or failed in the store.
    #[error(transparent)]
    Store(#[from] RemoteStoreError),

    /// The acting user lacks the admin role.
    #[error("user {actor} is not allowed to {action}")]
    PermissionDenied {
        /// The acting user.
        actor: UserId,
        /// The attempted action.
        action: &'static str,
    },

    /// An administrator tried to delete their own account.
    #[error("users cannot delete their own account")]
    SelfDeletion,

    /// The notification is not in the loaded list.
    #[error("notification not found: {0}")]
    NotificationNotFound(NotificationId),
}

impl DirectoryServiceError {
    pub(crate) const fn load(what: &'static str, source: RemoteStoreError) -> Self {
        Self::Load { what, source }
    }
}
