//! In-memory board store for tests and offline use.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::board::{
    domain::{Board, ColumnId, Task, TaskDraft, TaskId, TaskPatch},
    ports::BoardStore,
};
use crate::remote::{RemoteResult, RemoteStoreError};

/// Store operation recorded by [`InMemoryBoardStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardStoreCall {
    /// `fetch_board` was called.
    FetchBoard,
    /// `update_task_state` was called.
    UpdateTaskState(TaskId, ColumnId),
    /// `create_task` was called with a draft titled as given.
    CreateTask(String),
    /// `update_task` was called.
    UpdateTask(TaskId),
    /// `delete_task` was called.
    DeleteTask(TaskId),
}

/// Thread-safe in-memory board store.
///
/// Applies mutations to its own copy of the board so that it behaves like a
/// server. A failure can be armed to make the next calls fail, and every call
/// is recorded for inspection.
#[derive(Clone)]
pub struct InMemoryBoardStore {
    state: Arc<RwLock<InMemoryBoardState>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    board: Board,
    failure: Option<RemoteStoreError>,
    calls: Vec<BoardStoreCall>,
}

impl InMemoryBoardStore {
    /// Creates a store serving the given board.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self::with_clock(board, Arc::new(DefaultClock))
    }

    /// Creates a store that stamps records with the given clock.
    #[must_use]
    pub fn with_clock(board: Board, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryBoardState {
                board,
                failure: None,
                calls: Vec::new(),
            })),
            clock,
        }
    }

    /// Makes every subsequent call fail with `error` until cleared.
    pub fn fail_with(&self, error: RemoteStoreError) {
        if let Ok(mut state) = self.state.write() {
            state.failure = Some(error);
        }
    }

    /// Clears an armed failure.
    pub fn recover(&self) {
        if let Ok(mut state) = self.state.write() {
            state.failure = None;
        }
    }

    /// Returns the calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<BoardStoreCall> {
        self.state
            .read()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    /// Returns a copy of the store-side board.
    #[must_use]
    pub fn board(&self) -> Board {
        self.state
            .read()
            .map(|state| state.board.clone())
            .unwrap_or_default()
    }

    fn with_state<T>(
        &self,
        call: BoardStoreCall,
        operation: impl FnOnce(&mut Board, &dyn Clock) -> RemoteResult<T>,
    ) -> RemoteResult<T> {
        let mut state = self
            .state
            .write()
            .map_err(|err| RemoteStoreError::Unavailable(err.to_string()))?;
        state.calls.push(call);
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }
        operation(&mut state.board, self.clock.as_ref())
    }
}

fn not_found(task_id: &TaskId) -> RemoteStoreError {
    RemoteStoreError::NotFound(format!("task {task_id}"))
}

fn rejected(err: &impl std::fmt::Display) -> RemoteStoreError {
    RemoteStoreError::Rejected {
        status: 400,
        message: err.to_string(),
    }
}

#[async_trait]
impl BoardStore for InMemoryBoardStore {
    async fn fetch_board(&self) -> RemoteResult<Board> {
        self.with_state(BoardStoreCall::FetchBoard, |board, _| Ok(board.clone()))
    }

    async fn update_task_state(&self, task_id: &TaskId, column_id: &ColumnId) -> RemoteResult<()> {
        let call = BoardStoreCall::UpdateTaskState(task_id.clone(), column_id.clone());
        self.with_state(call, |board, clock| {
            let mut task = board.task(task_id).cloned().ok_or_else(|| not_found(task_id))?;
            task.apply_patch(&TaskPatch::new().with_state(column_id.clone()), clock.utc());
            board.replace_task(task).map_err(|err| rejected(&err))
        })
    }

    async fn create_task(&self, draft: &TaskDraft) -> RemoteResult<Task> {
        let call = BoardStoreCall::CreateTask(draft.title().to_owned());
        self.with_state(call, |board, clock| {
            let id = TaskId::new(Uuid::new_v4().to_string()).map_err(|err| rejected(&err))?;
            let task = Task::from_draft(id, draft.clone(), clock.utc());
            board.insert_task(task.clone()).map_err(|err| rejected(&err))?;
            Ok(task)
        })
    }

    async fn update_task(&self, task_id: &TaskId, patch: &TaskPatch) -> RemoteResult<Task> {
        self.with_state(BoardStoreCall::UpdateTask(task_id.clone()), |board, clock| {
            let mut task = board.task(task_id).cloned().ok_or_else(|| not_found(task_id))?;
            task.apply_patch(patch, clock.utc());
            board.replace_task(task.clone()).map_err(|err| rejected(&err))?;
            Ok(task)
        })
    }

    async fn delete_task(&self, task_id: &TaskId) -> RemoteResult<()> {
        self.with_state(BoardStoreCall::DeleteTask(task_id.clone()), |board, _| {
            board.remove_task(task_id).map_err(|_| not_found(task_id))?;
            Ok(())
        })
    }
}
