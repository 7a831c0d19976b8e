//! In-memory integration tests for board editing flows.

use std::sync::Arc;

use eyre::{WrapErr, ensure, eyre};
use rstest::rstest;
use taskboard::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{Board, ColumnId, Priority, TaskDraft, TaskId, TaskPatch},
    services::{BoardStateManager, MoveOutcome},
};
use taskboard::remote::RemoteStoreError;

use super::helpers::team_board;

fn ids(board: &Board, column: &str) -> Result<Vec<String>, eyre::Report> {
    let found = board
        .column(&ColumnId::new(column)?)
        .ok_or_else(|| eyre!("column {column} is missing"))?;
    Ok(found.task_ids().iter().map(ToString::to_string).collect())
}

fn current(manager: &BoardStateManager<InMemoryBoardStore>) -> Result<Board, eyre::Report> {
    manager
        .snapshot()
        .board()
        .cloned()
        .ok_or_else(|| eyre!("board is not loaded"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_walks_the_board_and_stats_follow(team_board: Board) -> Result<(), eyre::Report> {
    let store = InMemoryBoardStore::new(team_board);
    let manager = BoardStateManager::new(Arc::new(store.clone()));
    manager.load().await.wrap_err("load board")?;
    let t1 = TaskId::new("t1")?;

    let before = manager
        .user_stats("u-alice", "alice")
        .ok_or_else(|| eyre!("stats unavailable"))?;
    ensure!(before.in_progress == 1, "alice starts with one task in progress");

    for (from, to) in [("backlog", "inprogress"), ("inprogress", "aprove"), ("aprove", "done")] {
        let outcome = manager
            .move_between_columns(&t1, &ColumnId::new(from)?, &ColumnId::new(to)?, 0)
            .await
            .wrap_err_with(|| format!("move t1 from {from} to {to}"))?;
        ensure!(matches!(outcome, MoveOutcome::Confirmed(_)), "move was not confirmed");
    }

    let after = manager
        .user_stats("u-alice", "alice")
        .ok_or_else(|| eyre!("stats unavailable"))?;
    ensure!(after.total == 2, "alice still has two tasks");
    ensure!(after.completed == 1, "t1 counts as done");
    ensure!(after.pending == 0, "nothing awaits approval");

    let local = current(&manager)?;
    ensure!(ids(&local, "done")? == ["t1", "t4"], "t1 is first in done");
    let remote_state = store
        .board()
        .task(&t1)
        .map(|task| task.state().clone())
        .ok_or_else(|| eyre!("store lost t1"))?;
    ensure!(remote_state.as_str() == "done", "store recorded the final column");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn subscribers_see_rollback_then_recovery(team_board: Board) -> Result<(), eyre::Report> {
    let store = InMemoryBoardStore::new(team_board);
    let manager = BoardStateManager::new(Arc::new(store.clone()));
    let mut receiver = manager.subscribe();
    manager.load().await.wrap_err("load board")?;
    let loaded = current(&manager)?;
    let t2 = TaskId::new("t2")?;
    let backlog = ColumnId::new("backlog")?;
    let done = ColumnId::new("done")?;

    store.fail_with(RemoteStoreError::Unavailable("offline".to_owned()));
    let failed = manager.move_between_columns(&t2, &backlog, &done, 1).await;
    ensure!(failed.is_err(), "offline move must fail");
    ensure!(current(&manager)? == loaded, "rollback restores the loaded board");

    store.recover();
    manager
        .move_between_columns(&t2, &backlog, &done, 1)
        .await
        .wrap_err("retry move")?;

    let latest = receiver.borrow_and_update().clone();
    ensure!(latest.revision() == 4, "load, move, rollback and retried move publish revisions");
    let board = latest.board().ok_or_else(|| eyre!("snapshot has no board"))?;
    ensure!(ids(board, "done")? == ["t4", "t2"], "t2 appended after t4");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_edit_and_delete_round_trip(team_board: Board) -> Result<(), eyre::Report> {
    let store = InMemoryBoardStore::new(team_board);
    let manager = BoardStateManager::new(Arc::new(store.clone()));
    manager.load().await.wrap_err("load board")?;

    let draft = TaskDraft::new("Ship release", "Tag and publish", ColumnId::new("backlog")?, Priority::High)?
        .with_assignee("bob");
    let created = manager.create_task(draft).await.wrap_err("create task")?;
    ensure!(
        ids(&current(&manager)?, "backlog")?.last().map(String::as_str) == Some(created.id().as_str()),
        "created task is appended"
    );

    let patch = TaskPatch::new()
        .with_title("Ship release 1.0")?
        .with_state(ColumnId::new("inprogress")?);
    let updated = manager
        .update_task(created.id(), patch)
        .await
        .wrap_err("update task")?;
    ensure!(updated.title() == "Ship release 1.0", "title updated");
    ensure!(
        ids(&current(&manager)?, "inprogress")? == ["t3".to_owned(), created.id().to_string()],
        "state change relocates to the end of the new column"
    );

    manager.delete_task(created.id()).await.wrap_err("delete task")?;
    ensure!(manager.task(created.id()).is_none(), "task removed locally");
    ensure!(store.board().task(created.id()).is_none(), "task removed remotely");
    ensure!(current(&manager)?.validate().is_ok(), "board stays consistent");
    Ok(())
}
