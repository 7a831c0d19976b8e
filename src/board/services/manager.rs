//! Board state manager: owns the in-memory board and every mutation on it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::board::{
    domain::{Board, BoardDomainError, ColumnId, Task, TaskDraft, TaskId, TaskPatch, UserTaskStats},
    ports::BoardStore,
};

use super::{
    LoadError, MoveOutcome, MovePhase, MoveTransition, MutationCause, MutationError, MutationKind,
    PendingMove,
    reconciliation::{InFlightGuard, InFlightMoves, PendingMoveParts},
};

/// Immutable view of the board handed to the presentation layer.
///
/// The revision increases with every applied change, including rollbacks,
/// so observers can tell snapshots apart even when boards compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    revision: u64,
    board: Option<Board>,
}

impl BoardSnapshot {
    /// Returns the snapshot revision.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the board, or `None` when nothing is loaded.
    #[must_use]
    pub const fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }
}

/// Result of an intra-column reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Source and destination were equal; nothing happened.
    Unchanged,
    /// The column order changed.
    Reordered(BoardSnapshot),
}

#[derive(Debug, Default)]
struct ManagerState {
    board: Option<Board>,
    revision: u64,
    /// Incremented whenever the board is replaced wholesale (load or clear).
    epoch: u64,
}

/// Maintains board invariants under reorder, move, create, update and delete.
///
/// Reorders are local only. Moves are optimistic: the board changes before
/// the store is asked, and a rejection restores the exact pre-move board.
/// Create, update and delete wait for the store and leave the board untouched
/// on failure.
///
/// Locks are never held across store calls, so the board stays readable and
/// other operations may proceed while a call is outstanding.
pub struct BoardStateManager<S>
where
    S: BoardStore,
{
    store: Arc<S>,
    state: RwLock<ManagerState>,
    in_flight: InFlightMoves,
    snapshots: watch::Sender<BoardSnapshot>,
}

impl<S> BoardStateManager<S>
where
    S: BoardStore,
{
    /// Creates a manager with no board loaded.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        let (snapshots, _) = watch::channel(BoardSnapshot::default());
        Self {
            store,
            state: RwLock::new(ManagerState::default()),
            in_flight: InFlightMoves::default(),
            snapshots,
        }
    }

    /// Subscribes to board snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.snapshots.subscribe()
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.read_state();
        BoardSnapshot {
            revision: state.revision,
            board: state.board.clone(),
        }
    }

    /// Returns a task from the local board.
    #[must_use]
    pub fn task(&self, task_id: &TaskId) -> Option<Task> {
        self.read_state()
            .board
            .as_ref()
            .and_then(|board| board.task(task_id).cloned())
    }

    /// Returns `(id, title)` pairs for every column in display order.
    #[must_use]
    pub fn columns(&self) -> Vec<(ColumnId, String)> {
        self.read_state()
            .board
            .as_ref()
            .map(|board| {
                board
                    .ordered_columns()
                    .map(|column| (column.id().clone(), column.title().to_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns task statistics for a user on the loaded board.
    #[must_use]
    pub fn user_stats(&self, user_id: &str, username: &str) -> Option<UserTaskStats> {
        self.read_state()
            .board
            .as_ref()
            .map(|board| UserTaskStats::for_user(board, user_id, username))
    }

    /// Fetches the board from the store and installs it.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Store`] when the fetch fails and
    /// [`LoadError::InvalidBoard`] when the board breaks an invariant.
    pub async fn load(&self) -> Result<BoardSnapshot, LoadError> {
        let board = self.store.fetch_board().await?;
        board.validate()?;
        info!(
            tasks = board.task_count(),
            columns = board.column_order().len(),
            "board loaded"
        );
        let mut state = self.write_state();
        state.epoch += 1;
        Ok(self.publish(&mut state, Some(board)))
    }

    /// Discards the local board.
    pub fn clear(&self) -> BoardSnapshot {
        let mut state = self.write_state();
        state.epoch += 1;
        debug!("board cleared");
        self.publish(&mut state, None)
    }

    /// Moves a task within one column. Never contacts the store.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] when no board is loaded, the column is
    /// unknown or an index is out of range.
    pub fn reorder_within_column(
        &self,
        column_id: &ColumnId,
        from_index: usize,
        to_index: usize,
    ) -> Result<ReorderOutcome, MutationError> {
        let mut state = self.write_state();
        let board = loaded_mut(&mut state, MutationKind::Reorder)?;
        if from_index == to_index {
            ensure_index(board, column_id, from_index, MutationKind::Reorder)?;
            return Ok(ReorderOutcome::Unchanged);
        }
        board
            .reorder_within_column(column_id, from_index, to_index)
            .map_err(|err| MutationError::new(MutationKind::Reorder, err))?;
        debug!(column = %column_id, from_index, to_index, "task reordered");
        let snapshot = self.republish(&mut state);
        Ok(ReorderOutcome::Reordered(snapshot))
    }

    /// Applies a move locally and returns a handle for reconciling it.
    ///
    /// A drop at the task's own position is [`MoveTransition::Unchanged`]; a
    /// same-column drop elsewhere is a local reorder, and `dest_index` equal
    /// to the column length moves the task to the end. Cross-column moves
    /// update the task's state and must be passed to
    /// [`BoardStateManager::reconcile`].
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] when the preconditions do not hold or the
    /// task already has a move, update or delete awaiting the store.
    pub fn begin_move(
        &self,
        task_id: &TaskId,
        source_column_id: &ColumnId,
        dest_column_id: &ColumnId,
        dest_index: usize,
    ) -> Result<MoveTransition, MutationError> {
        if source_column_id == dest_column_id {
            return self.begin_same_column_move(task_id, source_column_id, dest_index);
        }

        let guard = self.in_flight.acquire(task_id).ok_or_else(|| {
            MutationError::new(MutationKind::Move, MutationCause::MoveInFlight(task_id.clone()))
        })?;

        let mut state = self.write_state();
        let epoch = state.epoch;
        let board = loaded_mut(&mut state, MutationKind::Move)?;
        let previous = board.clone();
        board
            .move_task(task_id, source_column_id, dest_column_id, dest_index)
            .map_err(|err| MutationError::new(MutationKind::Move, err))?;
        let snapshot = self.republish(&mut state);
        debug!(
            task = %task_id,
            from = %source_column_id,
            to = %dest_column_id,
            dest_index,
            revision = snapshot.revision,
            phase = MovePhase::OptimisticallyMoved.as_str(),
            "task moved optimistically"
        );

        Ok(MoveTransition::Pending(PendingMove::new(
            PendingMoveParts {
                task_id: task_id.clone(),
                source_column_id: source_column_id.clone(),
                dest_column_id: dest_column_id.clone(),
                dest_index,
                previous,
                applied_revision: snapshot.revision,
                epoch,
                snapshot,
            },
            guard,
        )))
    }

    /// Confirms a pending move with the store, or rolls it back.
    ///
    /// On rejection the board is restored to exactly the pre-move state. Any
    /// other local change applied after the move is discarded with it.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] carrying the store failure after the
    /// rollback has been applied.
    pub async fn reconcile(&self, mut pending: PendingMove) -> Result<MoveOutcome, MutationError> {
        let result = self
            .store
            .update_task_state(pending.task_id(), pending.dest_column_id())
            .await;

        match result {
            Ok(()) => {
                let phase = pending.settle(MovePhase::Confirmed);
                debug!(task = %pending.task_id(), phase = phase.as_str(), "move reconciled");
                Ok(MoveOutcome::Confirmed(pending.snapshot.clone()))
            }
            Err(err) => {
                self.roll_back(&pending);
                let phase = pending.settle(MovePhase::RolledBack);
                warn!(
                    task = %pending.task_id(),
                    phase = phase.as_str(),
                    error = %err,
                    "move rejected by store"
                );
                Err(MutationError::new(MutationKind::Move, err))
            }
        }
    }

    /// Moves a task between columns: optimistic phase then reconciliation.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] when preconditions fail or the store
    /// rejects the move (after rolling back).
    pub async fn move_between_columns(
        &self,
        task_id: &TaskId,
        source_column_id: &ColumnId,
        dest_column_id: &ColumnId,
        dest_index: usize,
    ) -> Result<MoveOutcome, MutationError> {
        match self.begin_move(task_id, source_column_id, dest_column_id, dest_index)? {
            MoveTransition::Unchanged => Ok(MoveOutcome::Unchanged),
            MoveTransition::Reordered(snapshot) => Ok(MoveOutcome::Reordered(snapshot)),
            MoveTransition::Pending(pending) => self.reconcile(pending).await,
        }
    }

    /// Creates a task through the store and adds it to its column.
    ///
    /// The board changes only after the store has assigned the identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] when the target column is unknown or the
    /// store fails.
    pub async fn create_task(&self, draft: TaskDraft) -> Result<Task, MutationError> {
        const KIND: MutationKind = MutationKind::Create;
        {
            let state = self.read_state();
            let board = loaded(&state, KIND)?;
            if board.column(draft.state()).is_none() {
                return Err(MutationError::new(
                    KIND,
                    BoardDomainError::UnknownColumn(draft.state().clone()),
                ));
            }
        }

        let task = self
            .store
            .create_task(&draft)
            .await
            .map_err(|err| MutationError::new(KIND, err))?;

        let mut state = self.write_state();
        loaded_mut(&mut state, KIND)?
            .insert_task(task.clone())
            .map_err(|err| MutationError::new(KIND, err))?;
        let snapshot = self.republish(&mut state);
        debug!(task = %task.id(), column = %task.state(), revision = snapshot.revision, "task created");
        Ok(task)
    }

    /// Sends a partial update and replaces the local task with the store's
    /// canonical record.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] when the patch is empty, the task or a new
    /// column is unknown, another change to the task is in flight, or the
    /// store fails.
    pub async fn update_task(
        &self,
        task_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task, MutationError> {
        const KIND: MutationKind = MutationKind::Update;
        patch
            .ensure_not_empty()
            .map_err(|err| MutationError::new(KIND, err))?;
        let _guard = {
            let state = self.read_state();
            let board = loaded(&state, KIND)?;
            if let Some(column_id) = patch.state()
                && board.column(column_id).is_none()
            {
                return Err(MutationError::new(
                    KIND,
                    BoardDomainError::UnknownColumn(column_id.clone()),
                ));
            }
            self.claim_editable(board, task_id, KIND)?
        };

        let updated = self
            .store
            .update_task(task_id, &patch)
            .await
            .map_err(|err| MutationError::new(KIND, err))?;

        let mut state = self.write_state();
        loaded_mut(&mut state, KIND)?
            .replace_task(updated.clone())
            .map_err(|err| MutationError::new(KIND, err))?;
        let snapshot = self.republish(&mut state);
        debug!(task = %task_id, revision = snapshot.revision, "task updated");
        Ok(updated)
    }

    /// Deletes a task through the store and removes it locally.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] when the task is unknown, another change to
    /// the task is in flight, or the store fails.
    pub async fn delete_task(&self, task_id: &TaskId) -> Result<(), MutationError> {
        const KIND: MutationKind = MutationKind::Delete;
        let _guard = {
            let state = self.read_state();
            let board = loaded(&state, KIND)?;
            self.claim_editable(board, task_id, KIND)?
        };

        self.store
            .delete_task(task_id)
            .await
            .map_err(|err| MutationError::new(KIND, err))?;

        let mut state = self.write_state();
        let board = loaded_mut(&mut state, KIND)?;
        if board.task(task_id).is_some() {
            board
                .remove_task(task_id)
                .map_err(|err| MutationError::new(KIND, err))?;
        }
        let snapshot = self.republish(&mut state);
        debug!(task = %task_id, revision = snapshot.revision, "task deleted");
        Ok(())
    }

    fn begin_same_column_move(
        &self,
        task_id: &TaskId,
        column_id: &ColumnId,
        dest_index: usize,
    ) -> Result<MoveTransition, MutationError> {
        let (from_index, to_index) = {
            let state = self.read_state();
            let board = loaded(&state, MutationKind::Move)?;
            let column = board.column(column_id).ok_or_else(|| {
                MutationError::new(
                    MutationKind::Move,
                    BoardDomainError::UnknownColumn(column_id.clone()),
                )
            })?;
            let from_index = column.position_of(task_id).ok_or_else(|| {
                MutationError::new(
                    MutationKind::Move,
                    BoardDomainError::TaskNotInColumn {
                        task_id: task_id.clone(),
                        column_id: column_id.clone(),
                    },
                )
            })?;
            // A drop past the last card lands in the last slot.
            let to_index = if dest_index == column.len() {
                column.len().saturating_sub(1)
            } else {
                dest_index
            };
            (from_index, to_index)
        };

        match self.reorder_within_column(column_id, from_index, to_index)? {
            ReorderOutcome::Unchanged => Ok(MoveTransition::Unchanged),
            ReorderOutcome::Reordered(snapshot) => Ok(MoveTransition::Reordered(snapshot)),
        }
    }

    fn roll_back(&self, pending: &PendingMove) {
        let mut state = self.write_state();
        if state.epoch != pending.epoch {
            debug!(task = %pending.task_id(), "board replaced since move; rollback skipped");
            return;
        }
        if state.revision > pending.applied_revision {
            warn!(
                task = %pending.task_id(),
                discarded_from = pending.applied_revision + 1,
                discarded_to = state.revision,
                "rollback discards local changes made after the move"
            );
        }
        self.publish(&mut state, Some(pending.previous.clone()));
    }

    /// Marks an existing task as busy until the returned guard is dropped.
    fn claim_editable(
        &self,
        board: &Board,
        task_id: &TaskId,
        kind: MutationKind,
    ) -> Result<InFlightGuard, MutationError> {
        if board.task(task_id).is_none() {
            return Err(MutationError::new(kind, MutationCause::NotFound(task_id.clone())));
        }
        self.in_flight
            .acquire(task_id)
            .ok_or_else(|| MutationError::new(kind, MutationCause::MoveInFlight(task_id.clone())))
    }

    fn publish(&self, state: &mut ManagerState, board: Option<Board>) -> BoardSnapshot {
        state.board = board;
        self.republish(state)
    }

    fn republish(&self, state: &mut ManagerState) -> BoardSnapshot {
        state.revision += 1;
        let snapshot = BoardSnapshot {
            revision: state.revision,
            board: state.board.clone(),
        };
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ManagerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ManagerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn loaded(state: &ManagerState, kind: MutationKind) -> Result<&Board, MutationError> {
    state
        .board
        .as_ref()
        .ok_or_else(|| MutationError::new(kind, MutationCause::NotLoaded))
}

fn loaded_mut(state: &mut ManagerState, kind: MutationKind) -> Result<&mut Board, MutationError> {
    state
        .board
        .as_mut()
        .ok_or_else(|| MutationError::new(kind, MutationCause::NotLoaded))
}

fn ensure_index(
    board: &Board,
    column_id: &ColumnId,
    index: usize,
    kind: MutationKind,
) -> Result<(), MutationError> {
    let column = board.column(column_id).ok_or_else(|| {
        MutationError::new(kind, BoardDomainError::UnknownColumn(column_id.clone()))
    })?;
    if index >= column.len() {
        return Err(MutationError::new(
            kind,
            BoardDomainError::IndexOutOfRange {
                column_id: column_id.clone(),
                index,
                len: column.len(),
            },
        ));
    }
    Ok(())
}
