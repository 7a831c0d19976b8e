//! Bearer-token session lifecycle.
//!
//! The session owns the persisted API token and the identity it belongs to.
//! On start-up it drops tokens whose JWT `exp` claim has passed and verifies
//! the rest against the server; sign-in and registration persist the issued
//! token so the HTTP adapter can attach it to every request.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
