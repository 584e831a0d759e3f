//! Identifier types for tasks and users.
//!
//! Both identifiers are assigned by a repository on creation and wrap the
//! `BIGINT` values used by the `PostgreSQL` schema.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repository-assigned identifier of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw identifier value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = TaskDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_positive(s).map(Self)
    }
}

/// Repository-assigned identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a raw identifier value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Validates an identifier supplied by a caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingUserId`] for zero and
    /// [`TaskDomainError::InvalidId`] for negative values.
    pub const fn try_new(value: i64) -> Result<Self, TaskDomainError> {
        match value {
            0 => Err(TaskDomainError::MissingUserId),
            v if v < 0 => Err(TaskDomainError::InvalidId(v)),
            v => Ok(Self(v)),
        }
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = TaskDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_positive(s).map(Self)
    }
}

fn parse_positive(raw: &str) -> Result<i64, TaskDomainError> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| TaskDomainError::MalformedId(raw.to_owned()))?;
    if value <= 0 {
        return Err(TaskDomainError::InvalidId(value));
    }
    Ok(value)
}
