//! Repository ports for task and user persistence.

use crate::task::domain::{NewTask, NewUser, Task, TaskChanges, TaskId, UserId, Username};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Task persistence contract shared by every storage backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::OwnerRequired`] or
    /// [`RepositoryError::UnknownUser`] when the backend enforces ownership
    /// and the owner is absent or does not exist, and
    /// [`RepositoryError::Persistence`] when the backend fails.
    async fn create_task(&self, task: &NewTask) -> RepositoryResult<TaskId>;

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::TaskNotFound`] when no task matches.
    async fn find_task(&self, id: TaskId) -> RepositoryResult<Task>;

    /// Applies `changes` to an existing task and returns its identifier.
    ///
    /// Whether empty fields mean "keep" or "clear" is backend-specific; see
    /// [`TaskChanges`].
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::TaskNotFound`] when no task matches.
    async fn update_task(&self, id: TaskId, changes: &TaskChanges) -> RepositoryResult<TaskId>;

    /// Deletes a task and returns the deleted identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::TaskNotFound`] when no task matches.
    async fn delete_task(&self, id: TaskId) -> RepositoryResult<TaskId>;
}

/// User persistence contract, available on backends that model users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user and returns its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateUsername`] when the username is
    /// taken. The store is left unchanged in that case.
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<UserId>;

    /// Reports whether a user exists.
    ///
    /// Absence is `Ok(false)`, never an error.
    async fn user_exists(&self, id: UserId) -> RepositoryResult<bool>;

    /// Returns all tasks owned by the named user, ordered by task id.
    ///
    /// An unknown user and a user without tasks both yield an empty list.
    async fn tasks_by_username(&self, username: &Username) -> RepositoryResult<Vec<Task>>;

    /// Deletes a user and returns the deleted identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UserNotFound`] when no user matches.
    async fn delete_user(&self, id: UserId) -> RepositoryResult<UserId>;
}

/// Coarse classification of failures for callers that translate them into
/// transport responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No matching record.
    NotFound,
    /// A uniqueness rule was violated.
    AlreadyExists,
    /// A referenced related entity does not exist.
    ValidationGap,
    /// Caller input was rejected before reaching storage.
    InvalidInput,
    /// Transport, query, pool, or configuration failure.
    Persistence,
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The store holds no tasks at all.
    #[error("no tasks stored")]
    NoTasks,

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The username is already taken.
    #[error("username already exists: {0}")]
    DuplicateUsername(Username),

    /// The referenced owner does not exist.
    #[error("user does not exist: {0}")]
    UnknownUser(UserId),

    /// The backend requires an owner and none was supplied.
    #[error("task owner is required by this repository")]
    OwnerRequired,

    /// Persistence-layer failure.
    #[error("unable to {operation}: {source}")]
    Persistence {
        /// Repository operation that failed.
        operation: &'static str,
        /// Underlying cause.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl RepositoryError {
    /// Wraps a persistence error raised while running `operation`.
    pub fn persistence(
        operation: &'static str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Persistence {
            operation,
            source: Arc::new(err),
        }
    }

    /// Returns the coarse failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TaskNotFound(_) | Self::UserNotFound(_) | Self::NoTasks => ErrorKind::NotFound,
            Self::DuplicateTask(_) | Self::DuplicateUsername(_) => ErrorKind::AlreadyExists,
            Self::UnknownUser(_) | Self::OwnerRequired => ErrorKind::ValidationGap,
            Self::Persistence { .. } => ErrorKind::Persistence,
        }
    }
}
