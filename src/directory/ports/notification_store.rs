//! Remote notification contract.

use async_trait::async_trait;

use crate::directory::domain::{Notification, NotificationId};
use crate::remote::RemoteResult;

/// Remote source of the signed-in user's notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Lists notifications for the authenticated user.
    async fn list_notifications(&self) -> RemoteResult<Vec<Notification>>;

    /// Marks one notification as read.
    async fn mark_notification_read(&self, notification_id: &NotificationId) -> RemoteResult<()>;
}
