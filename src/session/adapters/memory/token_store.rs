//! Process-local token store.

use std::sync::{Arc, PoisonError, RwLock};

use crate::session::{
    domain::BearerToken,
    ports::{TokenStore, TokenStoreResult},
};

/// Token store that keeps the token in memory only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<RwLock<Option<BearerToken>>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `token`.
    #[must_use]
    pub fn with_token(token: BearerToken) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token))),
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> TokenStoreResult<Option<BearerToken>> {
        Ok(self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &BearerToken) -> TokenStoreResult<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> TokenStoreResult<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
