//! Filesystem-backed session adapters.

mod token_store;

pub use token_store::FileTokenStore;
