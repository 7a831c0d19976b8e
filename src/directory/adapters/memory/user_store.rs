//! In-memory user store.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{Role, User, UserId},
    ports::UserStore,
};
use crate::remote::{RemoteResult, RemoteStoreError};

/// Thread-safe in-memory user store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<RwLock<UserState>>,
}

#[derive(Debug, Default)]
struct UserState {
    users: Vec<User>,
    failure: Option<RemoteStoreError>,
}

impl InMemoryUserStore {
    /// Creates a store holding the given users in listing order.
    #[must_use]
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            state: Arc::new(RwLock::new(UserState {
                users: users.into_iter().collect(),
                failure: None,
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

    /// Returns the store-side users.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.state
            .read()
            .map(|state| state.users.clone())
            .unwrap_or_default()
    }

    fn with_state<T>(
        &self,
        operation: impl FnOnce(&mut Vec<User>) -> RemoteResult<T>,
    ) -> RemoteResult<T> {
        let mut state = self
            .state
            .write()
            .map_err(|err| RemoteStoreError::Unavailable(err.to_string()))?;
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }
        operation(&mut state.users)
    }
}

fn not_found(user_id: &UserId) -> RemoteStoreError {
    RemoteStoreError::NotFound(format!("user {user_id}"))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list_users(&self) -> RemoteResult<Vec<User>> {
        self.with_state(|users| Ok(users.clone()))
    }

    async fn update_user_role(&self, user_id: &UserId, role: Role) -> RemoteResult<User> {
        self.with_state(|users| {
            let user = users
                .iter_mut()
                .find(|user| user.id() == user_id)
                .ok_or_else(|| not_found(user_id))?;
            user.set_role(role);
            Ok(user.clone())
        })
    }

    async fn delete_user(&self, user_id: &UserId) -> RemoteResult<()> {
        self.with_state(|users| {
            let position = users
                .iter()
                .position(|user| user.id() == user_id)
                .ok_or_else(|| not_found(user_id))?;
            users.remove(position);
            Ok(())
        })
    }
}
