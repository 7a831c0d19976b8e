//! Taskboard: client core for a Kanban task board.
//!
//! The crate keeps a local copy of the board in sync with a remote API.
//! Column moves are applied optimistically and rolled back when the server
//! rejects them; creates, updates and deletes wait for the server's record.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board, user and session types with their invariants
//! - **Ports**: Async trait interfaces for the remote API and token storage
//! - **Adapters**: In-memory stores for tests plus the HTTP and file adapters
//!
//! # Modules
//!
//! - [`board`]: Board model and the optimistic state manager
//! - [`directory`]: Users, roles and notifications
//! - [`session`]: Bearer-token session lifecycle
//! - [`http`]: `reqwest` adapter implementing every remote port
//! - [`config`]: Layered client configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod board;
pub mod config;
pub mod directory;
pub mod http;
pub mod remote;
pub mod session;
pub mod telemetry;
