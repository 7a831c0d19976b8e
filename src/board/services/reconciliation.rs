//! Two-phase move bookkeeping: the move state machine, the pending move
//! handle returned by the optimistic phase, and the per-task in-flight guard
//! shared with updates and deletes.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::board::domain::{Board, ColumnId, TaskId};

use super::BoardSnapshot;

/// Phase of a single inter-column move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovePhase {
    /// No move has been applied yet.
    Idle,
    /// The move is applied locally and awaits the store.
    OptimisticallyMoved,
    /// The store accepted the move; the local state is final.
    Confirmed,
    /// The store rejected the move; the board was restored.
    RolledBack,
}

impl MovePhase {
    /// Returns `true` when the phase ends the move.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::RolledBack)
    }

    /// Returns `true` when `target` is a legal next phase.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::OptimisticallyMoved)
                | (Self::OptimisticallyMoved, Self::Confirmed | Self::RolledBack)
        )
    }

    /// Returns a lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::OptimisticallyMoved => "optimistically_moved",
            Self::Confirmed => "confirmed",
            Self::RolledBack => "rolled_back",
        }
    }
}

/// Registry of tasks with a move, update or delete awaiting the store.
#[derive(Debug, Clone, Default)]
pub(crate) struct InFlightMoves {
    tasks: Arc<Mutex<HashSet<TaskId>>>,
}

impl InFlightMoves {
    /// Marks a task as in flight, or returns `None` if it already is.
    pub(crate) fn acquire(&self, task_id: &TaskId) -> Option<InFlightGuard> {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if !tasks.insert(task_id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            tasks: Arc::clone(&self.tasks),
            task_id: task_id.clone(),
        })
    }
}

/// Releases the in-flight marker for a task when dropped.
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    tasks: Arc<Mutex<HashSet<TaskId>>>,
    task_id: TaskId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.task_id);
    }
}

/// A move that has been applied locally and still needs reconciling.
///
/// Produced by [`super::BoardStateManager::begin_move`] and consumed by
/// [`super::BoardStateManager::reconcile`]. Dropping it without reconciling
/// leaves the optimistic state in place and frees the task for new moves.
#[derive(Debug)]
#[must_use = "a pending move must be reconciled to confirm or roll it back"]
pub struct PendingMove {
    task_id: TaskId,
    source_column_id: ColumnId,
    dest_column_id: ColumnId,
    dest_index: usize,
    phase: MovePhase,
    pub(crate) previous: Board,
    pub(crate) applied_revision: u64,
    pub(crate) epoch: u64,
    pub(crate) snapshot: BoardSnapshot,
    _guard: InFlightGuard,
}

/// Parameter object for [`PendingMove::new`].
pub(crate) struct PendingMoveParts {
    pub(crate) task_id: TaskId,
    pub(crate) source_column_id: ColumnId,
    pub(crate) dest_column_id: ColumnId,
    pub(crate) dest_index: usize,
    pub(crate) previous: Board,
    pub(crate) applied_revision: u64,
    pub(crate) epoch: u64,
    pub(crate) snapshot: BoardSnapshot,
}

impl PendingMove {
    pub(crate) fn new(parts: PendingMoveParts, guard: InFlightGuard) -> Self {
        Self {
            task_id: parts.task_id,
            source_column_id: parts.source_column_id,
            dest_column_id: parts.dest_column_id,
            dest_index: parts.dest_index,
            phase: MovePhase::OptimisticallyMoved,
            previous: parts.previous,
            applied_revision: parts.applied_revision,
            epoch: parts.epoch,
            snapshot: parts.snapshot,
            _guard: guard,
        }
    }

    /// Returns the moved task.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the column the task left.
    #[must_use]
    pub const fn source_column_id(&self) -> &ColumnId {
        &self.source_column_id
    }

    /// Returns the column the task entered.
    #[must_use]
    pub const fn dest_column_id(&self) -> &ColumnId {
        &self.dest_column_id
    }

    /// Returns the position the task was inserted at.
    #[must_use]
    pub const fn dest_index(&self) -> usize {
        self.dest_index
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> MovePhase {
        self.phase
    }

    /// Returns the board as it was before the move.
    #[must_use]
    pub const fn previous_board(&self) -> &Board {
        &self.previous
    }

    /// Returns the snapshot published by the optimistic phase.
    #[must_use]
    pub const fn optimistic_snapshot(&self) -> &BoardSnapshot {
        &self.snapshot
    }

    /// Advances to a terminal phase. Illegal transitions are ignored.
    pub(crate) fn settle(&mut self, target: MovePhase) -> MovePhase {
        if target.is_terminal() && self.phase.can_transition_to(target) {
            self.phase = target;
        }
        self.phase
    }
}

/// Result of the optimistic phase of a move.
#[derive(Debug)]
pub enum MoveTransition {
    /// Dropped at its own position; nothing happened.
    Unchanged,
    /// Same-column drop at a new position; applied locally and final.
    Reordered(BoardSnapshot),
    /// Cross-column move applied locally; must be reconciled.
    Pending(PendingMove),
}

/// Successful end state of a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Dropped at its own position; nothing happened.
    Unchanged,
    /// Same-column reorder applied locally.
    Reordered(BoardSnapshot),
    /// Cross-column move accepted by the store.
    Confirmed(BoardSnapshot),
}

impl MoveOutcome {
    /// Returns the snapshot produced by the move, if any.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&BoardSnapshot> {
        match self {
            Self::Unchanged => None,
            Self::Reordered(snapshot) | Self::Confirmed(snapshot) => Some(snapshot),
        }
    }
}
