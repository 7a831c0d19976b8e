//! Port contracts for the session context.

pub mod gateway;
pub mod token_store;

pub use gateway::AuthGateway;
pub use token_store::{TokenStore, TokenStoreError, TokenStoreResult};
