//! Service layer for task and user requests in the durable deployment.

use crate::task::{
    domain::{NewTask, NewUser, Task, TaskChanges, TaskDomainError, TaskId, UserId, Username},
    ports::{ErrorKind, RepositoryError, TaskRepository, UserRepository},
};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{instrument, warn};

/// Request payload for creating a task.
///
/// `userId` and `title` are required; `description` defaults to empty.
/// Unknown fields, including `status`, are rejected at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskRequest {
    user_id: Option<i64>,
    title: Option<String>,
    #[serde(default)]
    description: String,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(user_id: i64, title: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            title: Some(title.into()),
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn into_parts(self) -> Result<(UserId, NewTask), TaskDomainError> {
        let owner = UserId::try_new(self.user_id.unwrap_or_default())?;
        let task = NewTask::new(self.title.unwrap_or_default())?
            .with_user(owner)
            .with_description(self.description);
        Ok((owner, task))
    }
}

/// Request payload for a partial task update.
///
/// Every field is optional. Empty strings and a missing or zero `userId`
/// leave the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct UpdateTaskRequest {
    user_id: i64,
    title: String,
    description: String,
    status: String,
}

impl UpdateTaskRequest {
    /// Creates a request that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the task to another owner.
    #[must_use]
    pub const fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets a new status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    fn into_changes(self) -> Result<TaskChanges, TaskDomainError> {
        let changes = TaskChanges::new()
            .with_title(self.title)
            .with_description(self.description)
            .with_status(self.status);
        if self.user_id == 0 {
            return Ok(changes);
        }
        Ok(changes.with_user(UserId::try_new(self.user_id)?))
    }
}

/// Request payload for creating a user.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    username: Option<String>,
    password: Option<String>,
}

impl CreateUserRequest {
    /// Creates a request with both required fields.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    fn into_new_user(self) -> Result<NewUser, TaskDomainError> {
        let username = Username::new(self.username.unwrap_or_default())?;
        NewUser::new(username, self.password.unwrap_or_default())
    }
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Service-level errors for task and user operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Request validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The existence pre-check found no such user.
    #[error("user not found: {0}")]
    UnknownUser(UserId),

    /// The user owns no tasks, or does not exist.
    #[error("no tasks found for user '{0}'")]
    NoTasksForUser(Username),
}

impl TaskServiceError {
    /// Returns the coarse failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::InvalidInput,
            Self::Repository(err) => err.kind(),
            Self::UnknownUser(_) => ErrorKind::ValidationGap,
            Self::NoTasksForUser(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Validates requests and drives the task and user repositories.
///
/// Creating or reassigning a task checks that the owner exists first. That
/// check and the following write are separate calls; the store's foreign key
/// still rejects a write whose owner disappeared in between.
#[derive(Clone)]
pub struct TaskService<T, U>
where
    T: TaskRepository,
    U: UserRepository,
{
    tasks: Arc<T>,
    users: Arc<U>,
}

impl<T, U> TaskService<T, U>
where
    T: TaskRepository,
    U: UserRepository,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, users: Arc<U>) -> Self {
        Self { tasks, users }
    }

    /// Creates a task for an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for invalid input,
    /// [`TaskServiceError::UnknownUser`] when the owner does not exist, and
    /// [`TaskServiceError::Repository`] when storage fails.
    #[instrument(skip(self), err)]
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskServiceResult<TaskId> {
        let (owner, task) = request.into_parts()?;
        self.ensure_user_exists(owner).await?;
        Ok(self.tasks.create_task(&task).await?)
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for invalid input and
    /// [`TaskServiceError::Repository`] when the username is taken or
    /// storage fails.
    #[instrument(skip(self), err)]
    pub async fn create_user(&self, request: CreateUserRequest) -> TaskServiceResult<UserId> {
        let user = request.into_new_user()?;
        Ok(self.users.create_user(&user).await?)
    }

    /// Fetches a task by id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the task does not exist
    /// or storage fails.
    #[instrument(skip(self), err)]
    pub async fn find_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        Ok(self.tasks.find_task(id).await?)
    }

    /// Lists the tasks owned by a user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NoTasksForUser`] when the listing is
    /// empty.
    #[instrument(skip(self), err)]
    pub async fn tasks_by_username(&self, username: &str) -> TaskServiceResult<Vec<Task>> {
        let owner = Username::new(username)?;
        let tasks = self.users.tasks_by_username(&owner).await?;
        if tasks.is_empty() {
            return Err(TaskServiceError::NoTasksForUser(owner));
        }
        Ok(tasks)
    }

    /// Partially updates a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UnknownUser`] when a new owner is named
    /// and does not exist, and [`TaskServiceError::Repository`] when the task
    /// does not exist or storage fails.
    #[instrument(skip(self), err)]
    pub async fn update_task(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<TaskId> {
        let changes = request.into_changes()?;
        if let Some(owner) = changes.user_id() {
            self.ensure_user_exists(owner).await?;
        }
        Ok(self.tasks.update_task(id, &changes).await?)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the task does not exist
    /// or storage fails.
    #[instrument(skip(self), err)]
    pub async fn delete_task(&self, id: TaskId) -> TaskServiceResult<TaskId> {
        Ok(self.tasks.delete_task(id).await?)
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the user does not exist
    /// or storage fails.
    #[instrument(skip(self), err)]
    pub async fn delete_user(&self, id: UserId) -> TaskServiceResult<UserId> {
        Ok(self.users.delete_user(id).await?)
    }

    async fn ensure_user_exists(&self, id: UserId) -> TaskServiceResult<()> {
        if self.users.user_exists(id).await? {
            return Ok(());
        }
        warn!(user_id = %id, "rejecting request for unknown user");
        Err(TaskServiceError::UnknownUser(id))
    }
}
