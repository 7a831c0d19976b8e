//! Port contracts for the directory context.

pub mod notification_store;
pub mod user_store;

pub use notification_store::NotificationStore;
pub use user_store::UserStore;
