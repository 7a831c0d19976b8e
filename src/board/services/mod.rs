//! Application services for the board.

mod error;
mod manager;
mod reconciliation;

pub use error::{LoadError, MutationCause, MutationError, MutationKind};
pub use manager::{BoardSnapshot, BoardStateManager, ReorderOutcome};
pub use reconciliation::{MoveOutcome, MovePhase, MoveTransition, PendingMove};
