//! User directory and notifications.
//!
//! Users and notifications are server-owned records that the client lists
//! and edits through the same REST API as the board. Administrative
//! operations (role changes, deletions) are gated on the acting user's role
//! before the store is contacted.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
