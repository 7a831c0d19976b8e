//! Shared world state for board move BDD scenarios.

use std::sync::Arc;

use chrono::DateTime;
use rstest::fixture;
use taskboard::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{Board, Column, ColumnId, Priority, Task, TaskData, TaskId},
    services::{BoardStateManager, MutationError},
};

/// Scenario world for board move behaviour tests.
pub struct BoardWorld {
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
    pub store: Option<InMemoryBoardStore>,
    pub manager: Option<BoardStateManager<InMemoryBoardStore>>,
    pub last_error: Option<MutationError>,
}

impl BoardWorld {
    /// Creates a world with no board.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
            tasks: Vec::new(),
            store: None,
            manager: None,
            last_error: None,
        }
    }

    /// Returns the manager once the board has been loaded.
    pub fn manager(&self) -> Result<&BoardStateManager<InMemoryBoardStore>, eyre::Report> {
        self.manager
            .as_ref()
            .ok_or_else(|| eyre::eyre!("board has not been loaded in scenario world"))
    }

    /// Returns the backing store once the board has been loaded.
    pub fn store(&self) -> Result<&InMemoryBoardStore, eyre::Report> {
        self.store
            .as_ref()
            .ok_or_else(|| eyre::eyre!("store has not been created in scenario world"))
    }

    /// Returns the manager's current board.
    pub fn board(&self) -> Result<Board, eyre::Report> {
        self.manager()?
            .snapshot()
            .board()
            .cloned()
            .ok_or_else(|| eyre::eyre!("manager holds no board"))
    }

    /// Places a new task at the end of an already declared column.
    pub fn place_task(&mut self, id: &str, column: &str) -> Result<(), eyre::Report> {
        let task_id = TaskId::new(id)?;
        let column_id = ColumnId::new(column)?;
        let slot = self
            .columns
            .iter_mut()
            .find(|candidate| candidate.id() == &column_id)
            .ok_or_else(|| eyre::eyre!("column {column} is not declared"))?;
        let mut ids = slot.task_ids().to_vec();
        ids.push(task_id.clone());
        *slot = Column::new(column_id.clone(), slot.title().to_owned()).with_task_ids(ids);

        let created = DateTime::from_timestamp(1_680_343_200, 0)
            .ok_or_else(|| eyre::eyre!("invalid fixture timestamp"))?;
        self.tasks.push(Task::from_data(TaskData {
            id: task_id,
            title: format!("Task {id}"),
            description: format!("Description of {id}"),
            state: column_id,
            priority: Priority::Medium,
            assignee: None,
            comments: Vec::new(),
            created_at: created,
            updated_at: created,
        }));
        Ok(())
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated step argument into trimmed items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
