//! Task records, comments and the request shapes used to create or edit them.

use super::{BoardDomainError, ColumnId, CommentId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task urgency. Lower numbers are more urgent.
///
/// The server stores any integer, so values outside `1..=3` decode as
/// [`Priority::Other`]. Drafts and patches accept only the three known
/// levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "i64")]
pub enum Priority {
    /// Most urgent (`1`).
    High,
    /// Default urgency (`2`).
    Medium,
    /// Least urgent (`3`).
    Low,
    /// A value outside the known levels, kept as received.
    Other(i64),
}

impl Priority {
    /// Maps any wire value to a priority without rejecting it.
    #[must_use]
    pub const fn from_wire(value: i64) -> Self {
        match value {
            1 => Self::High,
            2 => Self::Medium,
            3 => Self::Low,
            other => Self::Other(other),
        }
    }

    /// Returns the numeric wire value.
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Other(other) => other,
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Other(_) => "unknown",
        }
    }

    /// Returns `true` for the three levels a client may set.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Other(_))
    }

    const fn ensure_known(self) -> Result<Self, BoardDomainError> {
        match self {
            Self::Other(other) => Err(BoardDomainError::InvalidPriority(other)),
            known => Ok(known),
        }
    }
}

impl TryFrom<i64> for Priority {
    type Error = BoardDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_wire(value).ensure_known()
    }
}

impl From<Priority> for i64 {
    fn from(value: Priority) -> Self {
        value.value()
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Self::from_wire)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A comment left on a task. Comments are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    id: CommentId,
    content: String,
    author: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment record.
    #[must_use]
    pub fn new(
        id: CommentId,
        content: impl Into<String>,
        author: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            author: author.into(),
            created_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> &CommentId {
        &self.id
    }

    /// Returns the comment body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the comment author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A task card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    state: ColumnId,
    priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    comments: Vec<Comment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for building a [`Task`] from store-provided values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Column holding the task.
    pub state: ColumnId,
    /// Task urgency.
    pub priority: Priority,
    /// Assigned user identifier or display name.
    pub assignee: Option<String>,
    /// Comments in display order.
    pub comments: Vec<Comment>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a task from store-provided values.
    #[must_use]
    pub fn from_data(data: TaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            state: data.state,
            priority: data.priority,
            assignee: data.assignee,
            comments: data.comments,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Builds the task the store would create from a draft.
    #[must_use]
    pub fn from_draft(id: TaskId, draft: TaskDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            state: draft.state,
            priority: draft.priority,
            assignee: draft.assignee,
            comments: Vec::new(),
            created_at,
            updated_at: created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the identifier of the column holding the task.
    #[must_use]
    pub const fn state(&self) -> &ColumnId {
        &self.state
    }

    /// Returns the task urgency.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns the comments in display order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the task is assigned to the given user id or name.
    #[must_use]
    pub fn is_assigned_to(&self, user_id: &str, username: &str) -> bool {
        self.assignee
            .as_deref()
            .is_some_and(|assignee| assignee == user_id || assignee == username)
    }

    /// Applies a patch and stamps the update time.
    ///
    /// Used by stores that compute the canonical record themselves.
    pub fn apply_patch(&mut self, patch: &TaskPatch, updated_at: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(state) = &patch.state {
            self.state = state.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(assignee) = &patch.assignee {
            self.assignee = Some(assignee.clone());
        }
        self.updated_at = updated_at;
    }

    pub(crate) fn set_state(&mut self, state: ColumnId) {
        self.state = state;
    }
}

/// Fields of a task to be created; the store assigns the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    title: String,
    description: String,
    state: ColumnId,
    priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<String>,
}

impl TaskDraft {
    /// Creates a validated draft targeting the given column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] or
    /// [`BoardDomainError::EmptyDescription`] when either field is blank, and
    /// [`BoardDomainError::InvalidPriority`] for [`Priority::Other`].
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        state: ColumnId,
        priority: Priority,
    ) -> Result<Self, BoardDomainError> {
        Ok(Self {
            title: non_blank(title.into(), BoardDomainError::EmptyTitle)?,
            description: non_blank(description.into(), BoardDomainError::EmptyDescription)?,
            state,
            priority: priority.ensure_known()?,
            assignee: None,
        })
    }

    /// Sets the assignee. Blank values clear it.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = optional_text(assignee.into());
        self
    }

    /// Returns the draft title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the draft description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the target column.
    #[must_use]
    pub const fn state(&self) -> &ColumnId {
        &self.state
    }

    /// Returns the draft priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }
}

/// Partial task update. Absent fields are left unchanged by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<ColumnId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<String>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is blank.
    pub fn with_title(mut self, title: impl Into<String>) -> Result<Self, BoardDomainError> {
        self.title = Some(non_blank(title.into(), BoardDomainError::EmptyTitle)?);
        Ok(self)
    }

    /// Sets a new description.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyDescription`] when the description is
    /// blank.
    pub fn with_description(
        mut self,
        description: impl Into<String>,
    ) -> Result<Self, BoardDomainError> {
        self.description = Some(non_blank(
            description.into(),
            BoardDomainError::EmptyDescription,
        )?);
        Ok(self)
    }

    /// Moves the task to another column as part of the edit.
    #[must_use]
    pub fn with_state(mut self, state: ColumnId) -> Self {
        self.state = Some(state);
        self
    }

    /// Sets a new priority.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidPriority`] for [`Priority::Other`].
    pub fn with_priority(mut self, priority: Priority) -> Result<Self, BoardDomainError> {
        self.priority = Some(priority.ensure_known()?);
        Ok(self)
    }

    /// Sets a new assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = optional_text(assignee.into());
        self
    }

    /// Returns the new title, if set.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the new description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the new column, if set.
    #[must_use]
    pub const fn state(&self) -> Option<&ColumnId> {
        self.state.as_ref()
    }

    /// Returns the new priority, if set.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the new assignee, if set.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.state.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
    }

    /// Ensures the patch changes something.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyPatch`] when no field is set.
    pub const fn ensure_not_empty(&self) -> Result<(), BoardDomainError> {
        if self.is_empty() {
            return Err(BoardDomainError::EmptyPatch);
        }
        Ok(())
    }
}

fn non_blank(value: String, error: BoardDomainError) -> Result<String, BoardDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
