//! Shared test helpers for in-memory integration tests.

use chrono::{DateTime, Utc};
use rstest::fixture;
use taskboard::board::domain::{Board, Column, ColumnId, Priority, Task, TaskData, TaskId};
use taskboard::directory::domain::{Role, User, UserId};

/// Fixed creation time used by every fixture record.
#[must_use]
pub fn created_at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_680_343_200, 0).unwrap_or_default()
}

/// Builds a task in `state`, optionally assigned.
///
/// # Errors
///
/// Returns an error if an identifier is blank.
pub fn task(id: &str, state: &str, assignee: Option<&str>) -> Result<Task, eyre::Report> {
    Ok(Task::from_data(TaskData {
        id: TaskId::new(id)?,
        title: format!("Task {id}"),
        description: format!("Description of {id}"),
        state: ColumnId::new(state)?,
        priority: Priority::Medium,
        assignee: assignee.map(str::to_owned),
        comments: Vec::new(),
        created_at: created_at(),
        updated_at: created_at(),
    }))
}

/// Builds a column holding `task_ids` in order.
///
/// # Errors
///
/// Returns an error if an identifier is blank.
pub fn column(id: &str, title: &str, task_ids: &[&str]) -> Result<Column, eyre::Report> {
    let ids = task_ids
        .iter()
        .map(|value| TaskId::new(*value))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Column::new(ColumnId::new(id)?, title).with_task_ids(ids))
}

/// Builds a user with a derived email address.
///
/// # Errors
///
/// Returns an error if the identifier or username is blank.
pub fn user(id: &str, username: &str, role: Role) -> Result<User, eyre::Report> {
    Ok(User::new(
        UserId::new(id)?,
        username,
        format!("{username}@example.com"),
        role,
        created_at(),
    )?)
}

/// A board shaped like the default server board, with a few assignments.
///
/// `backlog = [t1, t2]`, `inprogress = [t3]`, `aprove = []`, `done = [t4]`.
#[fixture]
pub fn team_board() -> Board {
    build_team_board().unwrap_or_default()
}

fn build_team_board() -> Result<Board, eyre::Report> {
    Ok(Board::from_parts(
        vec![
            task("t1", "backlog", Some("alice"))?,
            task("t2", "backlog", None)?,
            task("t3", "inprogress", Some("alice"))?,
            task("t4", "done", Some("bob"))?,
        ],
        vec![
            column("backlog", "Backlog", &["t1", "t2"])?,
            column("inprogress", "In Progress", &["t3"])?,
            column("aprove", "Awaiting Approval", &[])?,
            column("done", "Done", &["t4"])?,
        ],
    )?)
}
