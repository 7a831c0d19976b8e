//! Orchestration services for the session context.

mod session;

pub use session::{SessionError, SessionService};
