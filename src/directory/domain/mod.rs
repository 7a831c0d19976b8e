//! Domain model for users and notifications.

mod error;
mod ids;
mod notification;
mod user;

pub use error::DirectoryDomainError;
pub use ids::{NotificationId, UserId};
pub use notification::Notification;
pub use user::{Role, User};
