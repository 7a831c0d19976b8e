//! Board columns and their ordered task sequences.

use super::{BoardDomainError, ColumnId, TaskId};
use serde::{Deserialize, Serialize};

/// A workflow stage holding an ordered sequence of task identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    id: ColumnId,
    title: String,
    #[serde(default)]
    task_ids: Vec<TaskId>,
}

impl Column {
    /// Creates an empty column.
    #[must_use]
    pub fn new(id: ColumnId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            task_ids: Vec::new(),
        }
    }

    /// Sets the initial task order.
    #[must_use]
    pub fn with_task_ids(mut self, task_ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.task_ids = task_ids.into_iter().collect();
        self
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> &ColumnId {
        &self.id
    }

    /// Returns the display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task identifiers in display order.
    #[must_use]
    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    /// Returns the number of tasks in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    /// Returns `true` when the column holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    /// Returns the position of a task in the column.
    #[must_use]
    pub fn position_of(&self, task_id: &TaskId) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }

    /// Moves the task at `from_index` to `to_index`.
    pub(crate) fn reorder(
        &mut self,
        from_index: usize,
        to_index: usize,
    ) -> Result<(), BoardDomainError> {
        self.check_index(from_index, self.task_ids.len())?;
        self.check_index(to_index, self.task_ids.len())?;
        let task_id = self.task_ids.remove(from_index);
        self.task_ids.insert(to_index, task_id);
        Ok(())
    }

    /// Removes a task, returning the position it held.
    pub(crate) fn remove(&mut self, task_id: &TaskId) -> Result<usize, BoardDomainError> {
        let index = self
            .position_of(task_id)
            .ok_or_else(|| BoardDomainError::TaskNotInColumn {
                task_id: task_id.clone(),
                column_id: self.id.clone(),
            })?;
        self.task_ids.remove(index);
        Ok(index)
    }

    /// Inserts a task at `index`; `index == len` appends.
    pub(crate) fn insert(&mut self, index: usize, task_id: TaskId) -> Result<(), BoardDomainError> {
        self.check_index(index, self.task_ids.len().saturating_add(1))?;
        self.task_ids.insert(index, task_id);
        Ok(())
    }

    pub(crate) fn push(&mut self, task_id: TaskId) {
        self.task_ids.push(task_id);
    }

    fn check_index(&self, index: usize, bound: usize) -> Result<(), BoardDomainError> {
        if index >= bound {
            return Err(BoardDomainError::IndexOutOfRange {
                column_id: self.id.clone(),
                index,
                len: self.task_ids.len(),
            });
        }
        Ok(())
    }
}
