//! In-memory board adapters.

mod board_store;

pub use board_store::{BoardStoreCall, InMemoryBoardStore};
