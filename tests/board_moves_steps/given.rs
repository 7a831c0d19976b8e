//! Given steps for board move BDD scenarios.

use std::sync::Arc;

use super::world::{BoardWorld, run_async, split_list};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{Board, Column, ColumnId},
    services::BoardStateManager,
};
use taskboard::remote::RemoteStoreError;

#[given(r#"a board with columns "{columns}""#)]
fn board_with_columns(world: &mut BoardWorld, columns: String) -> Result<(), eyre::Report> {
    for id in split_list(&columns) {
        let title = id.to_uppercase();
        world.columns.push(Column::new(ColumnId::new(id)?, title));
    }
    Ok(())
}

#[given(r#"tasks "{tasks}" in "{column}""#)]
fn tasks_in_column(world: &mut BoardWorld, tasks: String, column: String) -> Result<(), eyre::Report> {
    for id in split_list(&tasks) {
        world.place_task(&id, &column)?;
    }
    Ok(())
}

#[given(r#"task "{task}" in "{column}""#)]
fn task_in_column(world: &mut BoardWorld, task: String, column: String) -> Result<(), eyre::Report> {
    world.place_task(&task, &column)
}

#[given("the board has been loaded")]
fn board_loaded(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let board = Board::from_parts(world.tasks.clone(), world.columns.clone())
        .wrap_err("build scenario board")?;
    let store = InMemoryBoardStore::new(board);
    let manager = BoardStateManager::new(Arc::new(store.clone()));
    run_async(manager.load()).wrap_err("load scenario board")?;
    world.store = Some(store);
    world.manager = Some(manager);
    Ok(())
}

#[given("the store rejects requests with status {status:u16}")]
fn store_rejects(world: &mut BoardWorld, status: u16) -> Result<(), eyre::Report> {
    world.store()?.fail_with(RemoteStoreError::Rejected {
        status,
        message: "Internal Server Error".to_owned(),
    });
    Ok(())
}
