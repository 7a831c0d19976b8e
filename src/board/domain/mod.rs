//! Domain model for the task board.
//!
//! The board holds tasks keyed by identifier, columns keyed by identifier,
//! and the left-to-right column order. All placement invariants are enforced
//! here so that services only decide *when* to mutate, never *how*.

mod board;
mod column;
mod error;
mod ids;
mod stats;
mod task;

pub use board::Board;
pub use column::Column;
pub use error::BoardDomainError;
pub use ids::{ColumnId, CommentId, TaskId};
pub use stats::{AWAITING_APPROVAL_COLUMN, DONE_COLUMN, IN_PROGRESS_COLUMN, UserTaskStats};
pub use task::{Comment, Priority, Task, TaskData, TaskDraft, TaskPatch};
