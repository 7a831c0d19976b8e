//! Then steps for board move BDD scenarios.

use super::world::{BoardWorld, split_list};
use rstest_bdd_macros::then;
use taskboard::board::{
    adapters::memory::BoardStoreCall,
    domain::{Board, ColumnId, TaskId},
};

fn column_ids(board: &Board, column: &str) -> Result<Vec<String>, eyre::Report> {
    let column_id = ColumnId::new(column)?;
    let found = board
        .column(&column_id)
        .ok_or_else(|| eyre::eyre!("column {column} is missing"))?;
    Ok(found.task_ids().iter().map(ToString::to_string).collect())
}

fn mutation_calls(world: &BoardWorld) -> Result<Vec<BoardStoreCall>, eyre::Report> {
    Ok(world
        .store()?
        .calls()
        .into_iter()
        .filter(|call| *call != BoardStoreCall::FetchBoard)
        .collect())
}

#[then(r#"column "{column}" lists "{tasks}""#)]
fn column_lists(world: &BoardWorld, column: String, tasks: String) -> Result<(), eyre::Report> {
    let actual = column_ids(&world.board()?, &column)?;
    eyre::ensure!(
        actual == split_list(&tasks),
        "column {column} holds {actual:?}, expected {tasks}"
    );
    Ok(())
}

#[then(r#"column "{column}" is empty"#)]
fn column_is_empty(world: &BoardWorld, column: String) -> Result<(), eyre::Report> {
    let actual = column_ids(&world.board()?, &column)?;
    eyre::ensure!(actual.is_empty(), "column {column} holds {actual:?}");
    Ok(())
}

#[then(r#"column "{column}" has {count:usize} tasks"#)]
fn column_has_count(world: &BoardWorld, column: String, count: usize) -> Result<(), eyre::Report> {
    let actual = column_ids(&world.board()?, &column)?;
    eyre::ensure!(
        actual.len() == count,
        "column {column} holds {} tasks, expected {count}",
        actual.len()
    );
    Ok(())
}

#[then(r#"the last task in "{column}" is titled "{title}""#)]
fn last_task_titled(world: &BoardWorld, column: String, title: String) -> Result<(), eyre::Report> {
    let board = world.board()?;
    let tasks = board.tasks_in(&ColumnId::new(column.as_str())?);
    let last = tasks
        .last()
        .ok_or_else(|| eyre::eyre!("column {column} is empty"))?;
    eyre::ensure!(last.title() == title, "last task is titled {}", last.title());
    Ok(())
}

#[then(r#"task "{task}" has state "{state}""#)]
fn task_has_state(world: &BoardWorld, task: String, state: String) -> Result<(), eyre::Report> {
    let found = world
        .manager()?
        .task(&TaskId::new(task.as_str())?)
        .ok_or_else(|| eyre::eyre!("task {task} is missing"))?;
    eyre::ensure!(
        found.state().as_str() == state,
        "task {task} has state {}",
        found.state()
    );
    Ok(())
}

#[then(r#"task "{task}" is not on the board"#)]
fn task_not_on_board(world: &BoardWorld, task: String) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(task.as_str())?;
    eyre::ensure!(
        world.manager()?.task(&task_id).is_none(),
        "task {task} is still present"
    );
    Ok(())
}

#[then(r#"the store received a state update for "{task}" to "{column}""#)]
fn store_received_update(world: &BoardWorld, task: String, column: String) -> Result<(), eyre::Report> {
    let expected = BoardStoreCall::UpdateTaskState(TaskId::new(task)?, ColumnId::new(column)?);
    let calls = mutation_calls(world)?;
    eyre::ensure!(calls == [expected.clone()], "store calls were {calls:?}, expected {expected:?}");
    Ok(())
}

#[then("the store received no mutations")]
fn store_received_nothing(world: &BoardWorld) -> Result<(), eyre::Report> {
    let calls = mutation_calls(world)?;
    eyre::ensure!(calls.is_empty(), "unexpected store calls {calls:?}");
    Ok(())
}

#[then("the operation fails")]
fn operation_fails(world: &BoardWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.last_error.is_some(), "expected the operation to fail");
    Ok(())
}

#[then("the operation fails with not found")]
fn operation_fails_not_found(world: &BoardWorld) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the operation to fail"))?;
    eyre::ensure!(err.is_not_found(), "expected not found, got {err}");
    Ok(())
}

#[then("the board revision is {revision:u64}")]
fn board_revision(world: &BoardWorld, revision: u64) -> Result<(), eyre::Report> {
    let actual = world.manager()?.snapshot().revision();
    eyre::ensure!(actual == revision, "board revision is {actual}, expected {revision}");
    Ok(())
}
