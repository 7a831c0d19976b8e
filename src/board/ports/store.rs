//! Remote store port for board data.

use crate::board::domain::{Board, ColumnId, Task, TaskDraft, TaskId, TaskPatch};
use crate::remote::RemoteResult;
use async_trait::async_trait;

/// Remote source of truth for the board.
///
/// Each call is a suspension point for the calling operation only; the
/// in-memory board stays readable while a call is outstanding.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Fetches the whole board.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::remote::RemoteStoreError`] when the board cannot be
    /// retrieved or decoded.
    async fn fetch_board(&self) -> RemoteResult<Board>;

    /// Records that a task now lives in another column.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::remote::RemoteStoreError`] when the store rejects
    /// the change.
    async fn update_task_state(&self, task_id: &TaskId, column_id: &ColumnId) -> RemoteResult<()>;

    /// Creates a task and returns it with its assigned identifier and
    /// timestamps.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::remote::RemoteStoreError`] when creation fails.
    async fn create_task(&self, draft: &TaskDraft) -> RemoteResult<Task>;

    /// Applies a partial update and returns the canonical task.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::remote::RemoteStoreError`] when the update fails.
    async fn update_task(&self, task_id: &TaskId, patch: &TaskPatch) -> RemoteResult<Task>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::remote::RemoteStoreError`] when deletion fails.
    async fn delete_task(&self, task_id: &TaskId) -> RemoteResult<()>;
}
