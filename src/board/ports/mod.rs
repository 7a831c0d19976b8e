//! Port contracts for the board context.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod store;

pub use store::BoardStore;
