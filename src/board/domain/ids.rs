//! Identifier types for the board domain.
//!
//! Identifiers are assigned by the remote store and arrive as opaque strings.
//! The newtypes keep task, column and comment identifiers from being mixed up
//! and reject blank values at every entry point, including deserialization.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a task on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Creates a validated task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::BlankIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        normalize_identifier(value.into(), "task").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskId {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a board column (a workflow stage such as `backlog`).
///
/// A task's `state` field holds the identifier of the column containing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnId(String);

impl ColumnId {
    /// Creates a validated column identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::BlankIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        normalize_identifier(value.into(), "column").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ColumnId {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColumnId> for String {
    fn from(value: ColumnId) -> Self {
        value.0
    }
}

impl AsRef<str> for ColumnId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a comment attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentId(String);

impl CommentId {
    /// Creates a validated comment identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::BlankIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        normalize_identifier(value.into(), "comment").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommentId {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommentId> for String {
    fn from(value: CommentId) -> Self {
        value.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn normalize_identifier(raw: String, kind: &'static str) -> Result<String, BoardDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::BlankIdentifier(kind));
    }
    if trimmed.len() == raw.len() {
        return Ok(raw);
    }
    Ok(trimmed.to_owned())
}
