//! When steps for board move BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::board::domain::{ColumnId, Priority, TaskDraft, TaskId};

#[when(r#"task "{task}" is moved from "{source}" to "{dest}" at position {index:usize}"#)]
fn move_task(
    world: &mut BoardWorld,
    task: String,
    source: String,
    dest: String,
    index: usize,
) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(task)?;
    let source_id = ColumnId::new(source)?;
    let dest_id = ColumnId::new(dest)?;
    let result = run_async(
        world
            .manager()?
            .move_between_columns(&task_id, &source_id, &dest_id, index),
    );
    world.last_error = result.err();
    Ok(())
}

#[when(r#"a task titled "{title}" is created in "{column}""#)]
fn create_task(world: &mut BoardWorld, title: String, column: String) -> Result<(), eyre::Report> {
    let draft = TaskDraft::new(title, "Created in a scenario", ColumnId::new(column)?, Priority::Low)?;
    let result = run_async(world.manager()?.create_task(draft));
    world.last_error = result.err();
    Ok(())
}

#[when(r#"task "{task}" is deleted"#)]
fn delete_task(world: &mut BoardWorld, task: String) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(task)?;
    let result = run_async(world.manager()?.delete_task(&task_id));
    world.last_error = result.err();
    Ok(())
}
