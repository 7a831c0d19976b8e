//! Notification listing and read tracking.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use tracing::{debug, info};

use crate::directory::{
    domain::{Notification, NotificationId},
    ports::NotificationStore,
};

use super::DirectoryServiceError;

/// Holds the signed-in user's notifications and marks them read.
pub struct NotificationService<N>
where
    N: NotificationStore,
{
    store: Arc<N>,
    notifications: RwLock<Vec<Notification>>,
}

impl<N> NotificationService<N>
where
    N: NotificationStore,
{
    /// Creates a service with nothing loaded.
    #[must_use]
    pub const fn new(store: Arc<N>) -> Self {
        Self {
            store,
            notifications: RwLock::new(Vec::new()),
        }
    }

    /// Fetches notifications and replaces the local list.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Load`] when the store fails; the
    /// previous list is kept.
    pub async fn load(&self) -> Result<Vec<Notification>, DirectoryServiceError> {
        let notifications = self
            .store
            .list_notifications()
            .await
            .map_err(|err| DirectoryServiceError::load("notifications", err))?;
        info!(count = notifications.len(), "notifications loaded");
        *self.write_list() = notifications.clone();
        Ok(notifications)
    }

    /// Returns the local list.
    #[must_use]
    pub fn list(&self) -> Vec<Notification> {
        self.notifications
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Counts unread notifications in the local list.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|notification| !notification.is_read())
            .count()
    }

    /// Marks a notification read in the store, then locally.
    ///
    /// Already-read notifications are left alone without contacting the
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::NotificationNotFound`] when the id is
    /// not in the local list, or [`DirectoryServiceError::Store`] when the
    /// store fails.
    pub async fn mark_read(
        &self,
        notification_id: &NotificationId,
    ) -> Result<(), DirectoryServiceError> {
        let already_read = self
            .notifications
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|notification| notification.id() == notification_id)
            .map(Notification::is_read)
            .ok_or_else(|| DirectoryServiceError::NotificationNotFound(notification_id.clone()))?;
        if already_read {
            return Ok(());
        }

        self.store.mark_notification_read(notification_id).await?;

        if let Some(notification) = self
            .write_list()
            .iter_mut()
            .find(|notification| notification.id() == notification_id)
        {
            notification.mark_read();
        }
        debug!(notification = %notification_id, "notification marked read");
        Ok(())
    }

    fn write_list(&self) -> RwLockWriteGuard<'_, Vec<Notification>> {
        self.notifications
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
