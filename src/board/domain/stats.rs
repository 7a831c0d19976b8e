//! Per-user task statistics derived from a board.

use super::Board;
use serde::Serialize;

/// Column holding tasks that are being worked on.
pub const IN_PROGRESS_COLUMN: &str = "inprogress";
/// Column holding tasks awaiting approval.
pub const AWAITING_APPROVAL_COLUMN: &str = "aprove";
/// Column holding finished tasks.
pub const DONE_COLUMN: &str = "done";

/// Task counts for one user, as shown on profile and user-list pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTaskStats {
    /// All tasks assigned to the user.
    pub total: usize,
    /// Assigned tasks in the in-progress column.
    pub in_progress: usize,
    /// Assigned tasks awaiting approval.
    pub pending: usize,
    /// Assigned tasks that are done.
    pub completed: usize,
}

impl UserTaskStats {
    /// Counts the tasks assigned to a user, matched by id or username.
    #[must_use]
    pub fn for_user(board: &Board, user_id: &str, username: &str) -> Self {
        board
            .tasks()
            .values()
            .filter(|task| task.is_assigned_to(user_id, username))
            .fold(Self::default(), |mut stats, task| {
                stats.total += 1;
                match task.state().as_str() {
                    IN_PROGRESS_COLUMN => stats.in_progress += 1,
                    AWAITING_APPROVAL_COLUMN => stats.pending += 1,
                    DONE_COLUMN => stats.completed += 1,
                    _ => {}
                }
                stats
            })
    }
}
