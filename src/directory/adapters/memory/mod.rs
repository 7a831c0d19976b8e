//! In-memory directory stores for tests and offline use.

mod notification_store;
mod user_store;

pub use notification_store::InMemoryNotificationStore;
pub use user_store::InMemoryUserStore;
