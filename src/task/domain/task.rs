//! Task record and the payloads used to create and change it.

use super::{TaskDomainError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// A stored task.
///
/// `id` and `created_at` are assigned by the repository and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
    title: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone)]
pub struct PersistedTaskData {
    /// Task identifier.
    pub id: TaskId,
    /// Owning user, if any.
    pub user_id: Option<UserId>,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Free-form status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task from a creation payload and a freshly assigned id.
    ///
    /// The status starts empty.
    #[must_use]
    pub fn create(id: TaskId, new_task: &NewTask, clock: &impl Clock) -> Self {
        Self {
            id,
            user_id: new_task.user_id,
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            status: String::new(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            title: data.title,
            description: data.description,
            status: data.status,
            created_at: data.created_at,
        }
    }

    /// Overwrites every mutable field with the values in `changes`.
    ///
    /// Empty strings and an absent owner are written as-is; nothing is
    /// coalesced.
    pub fn replace_fields(&mut self, changes: &TaskChanges) {
        self.user_id = changes.user_id;
        self.title.clone_from(&changes.title);
        self.description.clone_from(&changes.description);
        self.status.clone_from(&changes.status);
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the free-form status.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    user_id: Option<UserId>,
    title: String,
    description: String,
}

impl NewTask {
    /// Creates a payload with a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, TaskDomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            user_id: None,
            title,
            description: String::new(),
        })
    }

    /// Sets the owning user.
    #[must_use]
    pub const fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the owning user, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// New values for a task's mutable fields.
///
/// How empty values are interpreted belongs to the repository: the
/// `PostgreSQL` adapter keeps the stored value for an empty string or an
/// absent owner, while the in-memory adapter replaces the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    user_id: Option<UserId>,
    title: String,
    description: String,
    status: String,
}

impl TaskChanges {
    /// Creates a change set with every field empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the owning user.
    #[must_use]
    pub const fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Returns the owning user, if supplied.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }
}
