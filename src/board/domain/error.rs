//! Error types for board domain validation.

use super::{ColumnId, TaskId};
use thiserror::Error;

/// Errors returned while constructing or mutating board values.
///
/// These are validation failures: they are detected locally and never
/// involve the remote store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// An identifier was empty after trimming.
    #[error("{0} identifier must not be empty")]
    BlankIdentifier(&'static str),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The priority is outside the supported range.
    #[error("invalid priority {0}, expected 1 (high), 2 (medium) or 3 (low)")]
    InvalidPriority(i64),

    /// A task update carried no fields.
    #[error("task update must change at least one field")]
    EmptyPatch,

    /// The column does not exist on the board.
    #[error("column not found: {0}")]
    UnknownColumn(ColumnId),

    /// The task does not exist on the board.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),

    /// A task with the same identifier is already on the board.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task is not in the column it was expected in.
    #[error("task {task_id} is not in column {column_id}")]
    TaskNotInColumn {
        /// Task that was looked up.
        task_id: TaskId,
        /// Column that was expected to hold it.
        column_id: ColumnId,
    },

    /// A positional index is outside the column's bounds.
    #[error("index {index} is out of range for column {column_id} holding {len} tasks")]
    IndexOutOfRange {
        /// Column being indexed.
        column_id: ColumnId,
        /// Offending index.
        index: usize,
        /// Number of task identifiers in the column.
        len: usize,
    },

    /// A column references a task that is missing from the task mapping.
    #[error("column {column_id} references missing task {task_id}")]
    DanglingTaskReference {
        /// Column holding the reference.
        column_id: ColumnId,
        /// Missing task.
        task_id: TaskId,
    },

    /// A task's state does not name the column containing it.
    #[error("task {task_id} has state {state} but sits in column {column_id}")]
    StateMismatch {
        /// Task with the inconsistent state.
        task_id: TaskId,
        /// State recorded on the task.
        state: ColumnId,
        /// Column actually containing the task.
        column_id: ColumnId,
    },

    /// A task identifier is placed more than once across the columns.
    #[error("task {0} is placed in more than one position")]
    DuplicatePlacement(TaskId),

    /// A task exists in the mapping but no column references it.
    #[error("task {0} is not placed in any column")]
    UnplacedTask(TaskId),

    /// The column order does not list exactly the board's columns.
    #[error("column order is inconsistent with the column mapping at {0}")]
    ColumnOrderMismatch(ColumnId),
}
