//! Service tests for the board state manager against the in-memory store.

use std::sync::Arc;

use crate::board::{
    adapters::memory::{BoardStoreCall, InMemoryBoardStore},
    domain::{Board, BoardDomainError, Priority, TaskDraft, TaskPatch},
    services::{
        BoardStateManager, MoveOutcome, MutationCause, MutationKind, ReorderOutcome,
    },
};
use crate::remote::RemoteStoreError;
use rstest::{fixture, rstest};

use super::fixtures::{board, column_id, ids, task_id};

type TestManager = BoardStateManager<InMemoryBoardStore>;

struct Harness {
    store: InMemoryBoardStore,
    manager: TestManager,
}

#[fixture]
fn harness(board: Board) -> Harness {
    let store = InMemoryBoardStore::new(board);
    let manager = BoardStateManager::new(Arc::new(store.clone()));
    Harness { store, manager }
}

async fn loaded(harness: Harness) -> Harness {
    harness.manager.load().await.expect("board loads");
    harness
}

fn current_board(manager: &TestManager) -> Board {
    manager
        .snapshot()
        .board()
        .cloned()
        .expect("board is loaded")
}

fn mutation_calls(store: &InMemoryBoardStore) -> Vec<BoardStoreCall> {
    store
        .calls()
        .into_iter()
        .filter(|call| *call != BoardStoreCall::FetchBoard)
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_publishes_first_revision(harness: Harness) {
    let receiver = harness.manager.subscribe();

    let snapshot = harness.manager.load().await.expect("board loads");

    assert_eq!(snapshot.revision(), 1);
    assert_eq!(receiver.borrow().revision(), 1);
    assert_eq!(snapshot.board().map(Board::task_count), Some(4));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_failure_leaves_board_absent(harness: Harness) {
    harness
        .store
        .fail_with(RemoteStoreError::Unavailable("offline".to_owned()));

    let result = harness.manager.load().await;

    assert!(result.is_err());
    assert!(harness.manager.snapshot().board().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_between_columns_updates_placement_and_store(harness: Harness) {
    let harness = loaded(harness).await;

    let outcome = harness
        .manager
        .move_between_columns(&task_id("t2"), &column_id("backlog"), &column_id("pending"), 0)
        .await
        .expect("move succeeds");

    assert!(matches!(outcome, MoveOutcome::Confirmed(_)));
    let board = current_board(&harness.manager);
    assert_eq!(ids(&board, "backlog"), ["t1", "t3"]);
    assert_eq!(ids(&board, "pending"), ["t2"]);
    let moved = board.task(&task_id("t2")).expect("task present");
    assert_eq!(moved.state(), &column_id("pending"));
    assert_eq!(
        mutation_calls(&harness.store),
        [BoardStoreCall::UpdateTaskState(task_id("t2"), column_id("pending"))]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_move_restores_pre_move_board(harness: Harness) {
    let harness = loaded(harness).await;
    let before = current_board(&harness.manager);
    harness
        .store
        .fail_with(RemoteStoreError::Forbidden("not yours".to_owned()));

    let result = harness
        .manager
        .move_between_columns(&task_id("t2"), &column_id("backlog"), &column_id("pending"), 0)
        .await;

    let err = result.expect_err("move is rejected");
    assert_eq!(err.kind(), MutationKind::Move);
    assert!(matches!(
        err.cause(),
        MutationCause::Store(RemoteStoreError::Forbidden(_))
    ));
    assert_eq!(current_board(&harness.manager), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rollback_publishes_a_newer_revision(harness: Harness) {
    let harness = loaded(harness).await;
    let receiver = harness.manager.subscribe();
    harness
        .store
        .fail_with(RemoteStoreError::Unavailable("offline".to_owned()));

    let _ = harness
        .manager
        .move_between_columns(&task_id("t1"), &column_id("backlog"), &column_id("done"), 0)
        .await;

    // load = 1, optimistic move = 2, rollback = 3
    assert_eq!(receiver.borrow().revision(), 3);
    assert_eq!(harness.manager.snapshot().revision(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drop_at_own_position_is_a_no_op(harness: Harness) {
    let harness = loaded(harness).await;
    let revision = harness.manager.snapshot().revision();

    let outcome = harness
        .manager
        .move_between_columns(&task_id("t2"), &column_id("backlog"), &column_id("backlog"), 1)
        .await
        .expect("no-op succeeds");

    assert_eq!(outcome, MoveOutcome::Unchanged);
    assert_eq!(harness.manager.snapshot().revision(), revision);
    assert!(mutation_calls(&harness.store).is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_column_move_reorders_without_store_call(harness: Harness) {
    let harness = loaded(harness).await;

    let outcome = harness
        .manager
        .move_between_columns(&task_id("t1"), &column_id("backlog"), &column_id("backlog"), 2)
        .await
        .expect("reorder succeeds");

    assert!(matches!(outcome, MoveOutcome::Reordered(_)));
    assert_eq!(ids(&current_board(&harness.manager), "backlog"), ["t2", "t3", "t1"]);
    assert!(mutation_calls(&harness.store).is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_column_move_to_column_length_appends(harness: Harness) {
    let harness = loaded(harness).await;

    let outcome = harness
        .manager
        .move_between_columns(&task_id("t1"), &column_id("backlog"), &column_id("backlog"), 3)
        .await
        .expect("move to the end succeeds");

    assert!(matches!(outcome, MoveOutcome::Reordered(_)));
    assert_eq!(ids(&current_board(&harness.manager), "backlog"), ["t2", "t3", "t1"]);
    assert!(mutation_calls(&harness.store).is_empty());

    let err = harness
        .manager
        .move_between_columns(&task_id("t1"), &column_id("backlog"), &column_id("backlog"), 4)
        .await
        .expect_err("index past the end");
    assert!(matches!(
        err.cause(),
        MutationCause::Validation(BoardDomainError::IndexOutOfRange { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_preserves_the_task_set(harness: Harness) {
    let harness = loaded(harness).await;

    let outcome = harness
        .manager
        .reorder_within_column(&column_id("backlog"), 2, 0)
        .expect("reorder succeeds");

    let ReorderOutcome::Reordered(snapshot) = outcome else {
        panic!("expected a reorder");
    };
    let board = snapshot.board().expect("board present");
    assert_eq!(ids(board, "backlog"), ["t3", "t1", "t2"]);
    assert_eq!(board.task_count(), 4);
    assert_eq!(board.validate(), Ok(()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_with_equal_indices_publishes_nothing(harness: Harness) {
    let harness = loaded(harness).await;
    let revision = harness.manager.snapshot().revision();

    let outcome = harness
        .manager
        .reorder_within_column(&column_id("backlog"), 1, 1)
        .expect("no-op succeeds");

    assert_eq!(outcome, ReorderOutcome::Unchanged);
    assert_eq!(harness.manager.snapshot().revision(), revision);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_out_of_range_is_a_validation_error(harness: Harness) {
    let harness = loaded(harness).await;
    let before = current_board(&harness.manager);

    let err = harness
        .manager
        .reorder_within_column(&column_id("inprogress"), 0, 1)
        .expect_err("index is out of range");

    assert!(matches!(
        err.cause(),
        MutationCause::Validation(BoardDomainError::IndexOutOfRange { .. })
    ));
    assert_eq!(current_board(&harness.manager), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mutations_before_load_report_not_loaded(harness: Harness) {
    let err = harness
        .manager
        .reorder_within_column(&column_id("backlog"), 0, 1)
        .expect_err("nothing loaded");

    assert!(matches!(err.cause(), MutationCause::NotLoaded));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_appends_store_record_to_column(harness: Harness) {
    let harness = loaded(harness).await;
    let draft = TaskDraft::new("Write docs", "Cover the CLI", column_id("backlog"), Priority::Low)
        .expect("valid draft");

    let created = harness.manager.create_task(draft).await.expect("create succeeds");

    let board = current_board(&harness.manager);
    let backlog = ids(&board, "backlog");
    assert_eq!(backlog.len(), 4);
    assert_eq!(backlog.last().map(String::as_str), Some(created.id().as_str()));
    assert_eq!(board.task(created.id()).map(|task| task.title()), Some("Write docs"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_create_leaves_board_untouched(harness: Harness) {
    let harness = loaded(harness).await;
    let before = current_board(&harness.manager);
    harness
        .store
        .fail_with(RemoteStoreError::Unavailable("offline".to_owned()));
    let draft = TaskDraft::new("Write docs", "Cover the CLI", column_id("backlog"), Priority::Low)
        .expect("valid draft");

    let err = harness.manager.create_task(draft).await.expect_err("create fails");

    assert_eq!(err.kind(), MutationKind::Create);
    assert_eq!(current_board(&harness.manager), before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_into_unknown_column_skips_the_store(harness: Harness) {
    let harness = loaded(harness).await;
    let draft = TaskDraft::new("Write docs", "Cover the CLI", column_id("archive"), Priority::Low)
        .expect("valid draft");

    let err = harness.manager.create_task(draft).await.expect_err("column is unknown");

    assert!(matches!(
        err.cause(),
        MutationCause::Validation(BoardDomainError::UnknownColumn(_))
    ));
    assert!(mutation_calls(&harness.store).is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_task_and_reference(harness: Harness) {
    let harness = loaded(harness).await;

    harness
        .manager
        .delete_task(&task_id("t4"))
        .await
        .expect("delete succeeds");

    let board = current_board(&harness.manager);
    assert!(ids(&board, "inprogress").is_empty());
    assert!(board.task(&task_id("t4")).is_none());
    assert!(harness.store.board().task(&task_id("t4")).is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_of_unknown_task_is_not_found_without_store_call(harness: Harness) {
    let harness = loaded(harness).await;
    let before = current_board(&harness.manager);

    let err = harness
        .manager
        .delete_task(&task_id("nonexistent"))
        .await
        .expect_err("task is unknown");

    assert!(err.is_not_found());
    assert_eq!(current_board(&harness.manager), before);
    assert!(mutation_calls(&harness.store).is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_task_with_store_record(harness: Harness) {
    let harness = loaded(harness).await;
    let patch = TaskPatch::new()
        .with_title("Renamed")
        .expect("valid title")
        .with_priority(Priority::High)
        .expect("known priority");

    let updated = harness
        .manager
        .update_task(&task_id("t3"), patch)
        .await
        .expect("update succeeds");

    assert_eq!(updated.title(), "Renamed");
    let board = current_board(&harness.manager);
    let local = board.task(&task_id("t3")).expect("task present");
    assert_eq!(local.priority(), Priority::High);
    assert_eq!(ids(&board, "backlog"), ["t1", "t2", "t3"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_with_new_state_relocates_to_column_end(harness: Harness) {
    let harness = loaded(harness).await;
    let patch = TaskPatch::new().with_state(column_id("inprogress"));

    harness
        .manager
        .update_task(&task_id("t1"), patch)
        .await
        .expect("update succeeds");

    let board = current_board(&harness.manager);
    assert_eq!(ids(&board, "backlog"), ["t2", "t3"]);
    assert_eq!(ids(&board, "inprogress"), ["t4", "t1"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_update_is_rejected_before_the_store(harness: Harness) {
    let harness = loaded(harness).await;

    let err = harness
        .manager
        .update_task(&task_id("t1"), TaskPatch::new())
        .await
        .expect_err("patch is empty");

    assert!(matches!(
        err.cause(),
        MutationCause::Validation(BoardDomainError::EmptyPatch)
    ));
    assert!(mutation_calls(&harness.store).is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_stats_reflect_the_loaded_board(harness: Harness) {
    assert!(harness.manager.user_stats("u1", "alice").is_none());
    let harness = loaded(harness).await;

    let stats = harness
        .manager
        .user_stats("u1", "alice")
        .expect("board is loaded");

    assert_eq!(stats.total, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn columns_follow_display_order(harness: Harness) {
    let harness = loaded(harness).await;

    let columns: Vec<String> = harness
        .manager
        .columns()
        .into_iter()
        .map(|(id, _)| id.to_string())
        .collect();

    assert_eq!(columns, ["backlog", "pending", "inprogress", "done"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clear_discards_the_board(harness: Harness) {
    let harness = loaded(harness).await;

    let snapshot = harness.manager.clear();

    assert!(snapshot.board().is_none());
    assert!(harness.manager.task(&task_id("t1")).is_none());
}
