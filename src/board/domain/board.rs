//! The board aggregate: tasks, columns and column order.

use super::{BoardDomainError, Column, ColumnId, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Full task/column/order model for a workspace.
///
/// Every mutating method checks its preconditions before touching any state,
/// so a failed call leaves the board exactly as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    tasks: HashMap<TaskId, Task>,
    columns: HashMap<ColumnId, Column>,
    column_order: Vec<ColumnId>,
}

impl Board {
    /// Assembles a board from tasks and columns in display order.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardDomainError`] when the parts violate a board
    /// invariant (see [`Board::validate`]).
    pub fn from_parts(
        tasks: impl IntoIterator<Item = Task>,
        columns: impl IntoIterator<Item = Column>,
    ) -> Result<Self, BoardDomainError> {
        let mut board = Self::default();
        for column in columns {
            board.column_order.push(column.id().clone());
            board.columns.insert(column.id().clone(), column);
        }
        for task in tasks {
            if board.tasks.contains_key(task.id()) {
                return Err(BoardDomainError::DuplicateTask(task.id().clone()));
            }
            board.tasks.insert(task.id().clone(), task);
        }
        board.validate()?;
        Ok(board)
    }

    /// Checks every board invariant.
    ///
    /// - each column reference names an existing task whose state is that
    ///   column
    /// - each task is placed exactly once
    /// - the column order lists each column exactly once
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), BoardDomainError> {
        let mut ordered = HashSet::with_capacity(self.column_order.len());
        for column_id in &self.column_order {
            if !self.columns.contains_key(column_id) || !ordered.insert(column_id) {
                return Err(BoardDomainError::ColumnOrderMismatch(column_id.clone()));
            }
        }
        if let Some(unordered) = self.columns.keys().find(|id| !ordered.contains(id)) {
            return Err(BoardDomainError::ColumnOrderMismatch(unordered.clone()));
        }

        let mut placed = HashSet::with_capacity(self.tasks.len());
        for column in self.ordered_columns() {
            for task_id in column.task_ids() {
                let task = self.tasks.get(task_id).ok_or_else(|| {
                    BoardDomainError::DanglingTaskReference {
                        column_id: column.id().clone(),
                        task_id: task_id.clone(),
                    }
                })?;
                if task.state() != column.id() {
                    return Err(BoardDomainError::StateMismatch {
                        task_id: task_id.clone(),
                        state: task.state().clone(),
                        column_id: column.id().clone(),
                    });
                }
                if !placed.insert(task_id) {
                    return Err(BoardDomainError::DuplicatePlacement(task_id.clone()));
                }
            }
        }
        if let Some(unplaced) = self.tasks.keys().find(|id| !placed.contains(id)) {
            return Err(BoardDomainError::UnplacedTask(unplaced.clone()));
        }
        Ok(())
    }

    /// Returns a task by identifier.
    #[must_use]
    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.get(task_id)
    }

    /// Returns the task mapping.
    #[must_use]
    pub const fn tasks(&self) -> &HashMap<TaskId, Task> {
        &self.tasks
    }

    /// Returns the number of tasks on the board.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns a column by identifier.
    #[must_use]
    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.get(column_id)
    }

    /// Returns the column identifiers in left-to-right order.
    #[must_use]
    pub fn column_order(&self) -> &[ColumnId] {
        &self.column_order
    }

    /// Iterates columns in left-to-right order.
    pub fn ordered_columns(&self) -> impl Iterator<Item = &Column> {
        self.column_order
            .iter()
            .filter_map(|column_id| self.columns.get(column_id))
    }

    /// Returns the tasks of a column in display order.
    #[must_use]
    pub fn tasks_in(&self, column_id: &ColumnId) -> Vec<&Task> {
        self.columns
            .get(column_id)
            .map(|column| {
                column
                    .task_ids()
                    .iter()
                    .filter_map(|task_id| self.tasks.get(task_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Moves a task within one column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownColumn`] or
    /// [`BoardDomainError::IndexOutOfRange`].
    pub fn reorder_within_column(
        &mut self,
        column_id: &ColumnId,
        from_index: usize,
        to_index: usize,
    ) -> Result<(), BoardDomainError> {
        self.column_mut(column_id)?.reorder(from_index, to_index)
    }

    /// Moves a task from one column to a position in another and updates its
    /// state.
    ///
    /// `dest_index` may equal the destination length to append.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardDomainError`] when either column is unknown, the task
    /// is not in the source column, or the index is out of range.
    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        source_column_id: &ColumnId,
        dest_column_id: &ColumnId,
        dest_index: usize,
    ) -> Result<(), BoardDomainError> {
        let source = self.column_ref(source_column_id)?;
        let Some(from_index) = source.position_of(task_id) else {
            return Err(BoardDomainError::TaskNotInColumn {
                task_id: task_id.clone(),
                column_id: source_column_id.clone(),
            });
        };
        if source_column_id == dest_column_id {
            return self.reorder_within_column(source_column_id, from_index, dest_index);
        }
        let dest = self.column_ref(dest_column_id)?;
        if dest_index > dest.len() {
            return Err(BoardDomainError::IndexOutOfRange {
                column_id: dest_column_id.clone(),
                index: dest_index,
                len: dest.len(),
            });
        }
        if !self.tasks.contains_key(task_id) {
            return Err(BoardDomainError::UnknownTask(task_id.clone()));
        }

        self.column_mut(source_column_id)?.remove(task_id)?;
        self.column_mut(dest_column_id)?
            .insert(dest_index, task_id.clone())?;
        if let Some(task) = self.tasks.get_mut(task_id) {
            task.set_state(dest_column_id.clone());
        }
        Ok(())
    }

    /// Adds a new task at the end of the column named by its state.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateTask`] or
    /// [`BoardDomainError::UnknownColumn`].
    pub fn insert_task(&mut self, task: Task) -> Result<(), BoardDomainError> {
        if self.tasks.contains_key(task.id()) {
            return Err(BoardDomainError::DuplicateTask(task.id().clone()));
        }
        self.column_mut(task.state())?.push(task.id().clone());
        self.tasks.insert(task.id().clone(), task);
        Ok(())
    }

    /// Replaces a task record.
    ///
    /// When the replacement names a different column the task identifier is
    /// removed from its old column and appended to the new one.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownTask`] or
    /// [`BoardDomainError::UnknownColumn`].
    pub fn replace_task(&mut self, task: Task) -> Result<(), BoardDomainError> {
        let current_state = self
            .tasks
            .get(task.id())
            .map(|existing| existing.state().clone())
            .ok_or_else(|| BoardDomainError::UnknownTask(task.id().clone()))?;

        if &current_state != task.state() {
            self.column_ref(task.state())?;
            self.column_mut(&current_state)?.remove(task.id())?;
            self.column_mut(task.state())?.push(task.id().clone());
        }
        self.tasks.insert(task.id().clone(), task);
        Ok(())
    }

    /// Removes a task from the mapping and from its column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownTask`] when the task is absent.
    pub fn remove_task(&mut self, task_id: &TaskId) -> Result<Task, BoardDomainError> {
        let state = self
            .tasks
            .get(task_id)
            .map(|task| task.state().clone())
            .ok_or_else(|| BoardDomainError::UnknownTask(task_id.clone()))?;
        self.column_mut(&state)?.remove(task_id)?;
        self.tasks
            .remove(task_id)
            .ok_or_else(|| BoardDomainError::UnknownTask(task_id.clone()))
    }

    fn column_ref(&self, column_id: &ColumnId) -> Result<&Column, BoardDomainError> {
        self.columns
            .get(column_id)
            .ok_or_else(|| BoardDomainError::UnknownColumn(column_id.clone()))
    }

    fn column_mut(&mut self, column_id: &ColumnId) -> Result<&mut Column, BoardDomainError> {
        self.columns
            .get_mut(column_id)
            .ok_or_else(|| BoardDomainError::UnknownColumn(column_id.clone()))
    }
}
