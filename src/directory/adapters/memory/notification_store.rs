//! In-memory notification store.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{Notification, NotificationId},
    ports::NotificationStore,
};
use crate::remote::{RemoteResult, RemoteStoreError};

/// Thread-safe in-memory notification store that counts mark-read calls.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationStore {
    state: Arc<RwLock<NotificationState>>,
}

#[derive(Debug, Default)]
struct NotificationState {
    notifications: Vec<Notification>,
    failure: Option<RemoteStoreError>,
    mark_read_calls: usize,
}

impl InMemoryNotificationStore {
    /// Creates a store holding the given notifications.
    #[must_use]
    pub fn new(notifications: impl IntoIterator<Item = Notification>) -> Self {
        Self {
            state: Arc::new(RwLock::new(NotificationState {
                notifications: notifications.into_iter().collect(),
                failure: None,
                mark_read_calls: 0,
            })),
        }
    }

    /// Makes every subsequent call fail with `error` until cleared.
    pub fn fail_with(&self, error: RemoteStoreError) {
        if let Ok(mut state) = self.state.write() {
            state.failure = Some(error);
        }
    }

    /// Clears an armed failure.
    pub fn recover(&self) {
        if let Ok(mut state) = self.state.write() {
            state.failure = None;
        }
    }

    /// Returns how many times `mark_notification_read` reached the store.
    #[must_use]
    pub fn mark_read_calls(&self) -> usize {
        self.state
            .read()
            .map(|state| state.mark_read_calls)
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn list_notifications(&self) -> RemoteResult<Vec<Notification>> {
        let state = self
            .state
            .read()
            .map_err(|err| RemoteStoreError::Unavailable(err.to_string()))?;
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }
        Ok(state.notifications.clone())
    }

    async fn mark_notification_read(&self, notification_id: &NotificationId) -> RemoteResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| RemoteStoreError::Unavailable(err.to_string()))?;
        state.mark_read_calls += 1;
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }
        let notification = state
            .notifications
            .iter_mut()
            .find(|notification| notification.id() == notification_id)
            .ok_or_else(|| RemoteStoreError::NotFound(format!("notification {notification_id}")))?;
        notification.mark_read();
        Ok(())
    }
}
