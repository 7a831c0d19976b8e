//! Task board state management.
//!
//! This module owns the board model (tasks, columns, column order) and the
//! [`services::BoardStateManager`] that mutates it. Moves between columns are
//! applied optimistically and reconciled with the remote store, rolling back
//! to the exact pre-move board when the store rejects them. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
