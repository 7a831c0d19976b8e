//! In-memory session adapters for tests and offline use.

mod gateway;
mod token_store;

pub use gateway::InMemoryAuthGateway;
pub use token_store::InMemoryTokenStore;
