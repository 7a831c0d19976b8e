//! Remote user administration contract.

use async_trait::async_trait;

use crate::directory::domain::{Role, User, UserId};
use crate::remote::RemoteResult;

/// Remote source of user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Lists every registered user.
    async fn list_users(&self) -> RemoteResult<Vec<User>>;

    /// Changes a user's role and returns the updated record.
    async fn update_user_role(&self, user_id: &UserId, role: Role) -> RemoteResult<User>;

    /// Deletes a user account.
    async fn delete_user(&self, user_id: &UserId) -> RemoteResult<()>;
}
