//! Orchestration services for the directory context.

mod error;
mod notifications;
mod users;

pub use error::DirectoryServiceError;
pub use notifications::NotificationService;
pub use users::UserAdminService;
