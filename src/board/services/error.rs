//! Error taxonomy surfaced by the board state manager.

use crate::board::domain::{BoardDomainError, TaskId};
use crate::remote::RemoteStoreError;
use std::fmt;
use thiserror::Error;

/// The initial board fetch failed; the board cannot be shown.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The store could not provide the board.
    #[error("could not load the board: {0}")]
    Store(#[from] RemoteStoreError),
    /// The store returned a board that violates placement invariants.
    #[error("the board returned by the server is inconsistent: {0}")]
    InvalidBoard(#[from] BoardDomainError),
}

/// Operation that produced a [`MutationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Intra-column reorder.
    Reorder,
    /// Inter-column move.
    Move,
    /// Task creation.
    Create,
    /// Task field update.
    Update,
    /// Task deletion.
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reorder => "reorder the task",
            Self::Move => "move the task",
            Self::Create => "create the task",
            Self::Update => "update the task",
            Self::Delete => "delete the task",
        })
    }
}

/// Why a mutation failed.
#[derive(Debug, Clone, Error)]
pub enum MutationCause {
    /// The request was invalid for the current board.
    #[error(transparent)]
    Validation(#[from] BoardDomainError),
    /// The remote store rejected or failed the request.
    #[error(transparent)]
    Store(#[from] RemoteStoreError),
    /// The task is not on the board.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The task has a move, update or delete awaiting the store.
    #[error("task {0} has a change awaiting the server")]
    MoveInFlight(TaskId),
    /// No board is loaded.
    #[error("the board has not been loaded")]
    NotLoaded,
}

/// A create, update, delete, move or reorder failed.
///
/// The board is either untouched or rolled back to its pre-operation state
/// when this error is returned.
#[derive(Debug, Clone, Error)]
#[error("could not {kind}: {cause}")]
pub struct MutationError {
    kind: MutationKind,
    #[source]
    cause: MutationCause,
}

impl MutationError {
    /// Creates a mutation error.
    #[must_use]
    pub fn new(kind: MutationKind, cause: impl Into<MutationCause>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    /// Returns the failed operation.
    #[must_use]
    pub const fn kind(&self) -> MutationKind {
        self.kind
    }

    /// Returns the failure cause.
    #[must_use]
    pub const fn cause(&self) -> &MutationCause {
        &self.cause
    }

    /// Returns `true` when the task was not found locally or remotely.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        match &self.cause {
            MutationCause::NotFound(_) => true,
            MutationCause::Store(err) => err.is_not_found(),
            _ => false,
        }
    }
}
