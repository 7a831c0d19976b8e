//! User administration: listing, role changes and deletion.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::directory::{
    domain::{Role, User, UserId},
    ports::UserStore,
};

use super::DirectoryServiceError;

/// Lists users and applies admin-only changes to them.
///
/// Keeps the last fetched listing so callers can render it without another
/// round trip; role changes and deletions are applied to that copy once the
/// store accepts them.
pub struct UserAdminService<U>
where
    U: UserStore,
{
    store: Arc<U>,
    users: RwLock<Vec<User>>,
}

impl<U> UserAdminService<U>
where
    U: UserStore,
{
    /// Creates a service with an empty listing.
    #[must_use]
    pub const fn new(store: Arc<U>) -> Self {
        Self {
            store,
            users: RwLock::new(Vec::new()),
        }
    }

    /// Fetches every user and caches the listing.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Load`] when the store fails.
    pub async fn list_users(&self) -> Result<Vec<User>, DirectoryServiceError> {
        let users = self
            .store
            .list_users()
            .await
            .map_err(|err| DirectoryServiceError::load("users", err))?;
        info!(count = users.len(), "users loaded");
        *self.users.write().unwrap_or_else(PoisonError::into_inner) = users.clone();
        Ok(users)
    }

    /// Returns the cached listing.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetches the users a task may be assigned to (everyone but admins).
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Load`] when the store fails.
    pub async fn assignable_users(&self) -> Result<Vec<User>, DirectoryServiceError> {
        let users = self.list_users().await?;
        Ok(users.into_iter().filter(|user| !user.is_admin()).collect())
    }

    /// Changes a user's role on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::PermissionDenied`] when `actor` is not
    /// an admin, or [`DirectoryServiceError::Store`] when the store fails.
    pub async fn update_role(
        &self,
        actor: &User,
        user_id: &UserId,
        role: Role,
    ) -> Result<User, DirectoryServiceError> {
        require_admin(actor, "change user roles")?;
        let updated = self.store.update_user_role(user_id, role).await?;
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = users.iter_mut().find(|user| user.id() == user_id) {
            updated.clone_into(cached);
        }
        debug!(user = %user_id, role = %role, "user role updated");
        Ok(updated)
    }

    /// Deletes a user on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::PermissionDenied`] when `actor` is not
    /// an admin, [`DirectoryServiceError::SelfDeletion`] when `actor` targets
    /// their own account, or [`DirectoryServiceError::Store`] when the store
    /// fails.
    pub async fn delete_user(
        &self,
        actor: &User,
        user_id: &UserId,
    ) -> Result<(), DirectoryServiceError> {
        require_admin(actor, "delete users")?;
        if actor.id() == user_id {
            return Err(DirectoryServiceError::SelfDeletion);
        }
        self.store.delete_user(user_id).await?;
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|user| user.id() != user_id);
        debug!(user = %user_id, "user deleted");
        Ok(())
    }
}

fn require_admin(actor: &User, action: &'static str) -> Result<(), DirectoryServiceError> {
    if actor.is_admin() {
        return Ok(());
    }
    Err(DirectoryServiceError::PermissionDenied {
        actor: actor.id().clone(),
        action,
    })
}
