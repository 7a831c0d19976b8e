//! REST adapter for every remote port.
//!
//! [`HttpApiClient`] speaks the task-board JSON API: camelCase bodies, a
//! bearer token read from the session's [`crate::session::ports::TokenStore`]
//! on every request, and status codes folded into
//! [`crate::remote::RemoteStoreError`].

mod client;
mod status;

pub use client::HttpApiClient;

#[cfg(test)]
mod tests;
