//! `PostgreSQL` repository implementation for task and user storage.

use super::{
    models::{ExistsRow, IdRow, TaskRow},
    pool::TaskPgPool,
    queries,
};
use crate::task::{
    domain::{NewTask, NewUser, Task, TaskChanges, TaskId, UserId, Username},
    ports::{RepositoryError, RepositoryResult, TaskRepository, UserRepository},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{BigInt, Text};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// `PostgreSQL`-backed task and user repository.
///
/// Every call checks out one pooled connection on the blocking thread pool
/// and returns it when the statement completes. Clones share the pool.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: Arc<RwLock<Option<TaskPgPool>>>,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub fn new(pool: TaskPgPool) -> Self {
        Self {
            pool: Arc::new(RwLock::new(Some(pool))),
        }
    }

    /// Releases the connection pool.
    ///
    /// Calls already in flight finish on the connections they hold; later
    /// calls fail with [`RepositoryError::Persistence`]. Closing twice is a
    /// no-op.
    pub fn close(&self) {
        let released = self
            .pool
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if released.is_some() {
            debug!("task repository pool released");
        }
    }

    /// Reports whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_none()
    }

    fn checkout_pool(&self, operation: &'static str) -> RepositoryResult<TaskPgPool> {
        self.pool
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
            .ok_or_else(|| {
                RepositoryError::persistence(operation, std::io::Error::other("repository closed"))
            })
    }

    async fn run_blocking<F, T>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.checkout_pool(operation)?;
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(|err| RepositoryError::persistence(operation, err))?;
            f(&mut connection)
        })
        .await
        .map_err(|err| RepositoryError::persistence(operation, err))?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create_task(&self, task: &NewTask) -> RepositoryResult<TaskId> {
        const OPERATION: &str = "create task";
        let user_id = task.user_id().ok_or(RepositoryError::OwnerRequired)?;
        let title = task.title().to_owned();
        let description = task.description().to_owned();

        self.run_blocking(OPERATION, move |connection| {
            // The foreign key on `tasks.user_id` rejects the insert atomically
            // when the owner vanished after the caller's existence check.
            let row = diesel::sql_query(queries::CREATE_TASK)
                .bind::<BigInt, _>(user_id.value())
                .bind::<Text, _>(title)
                .bind::<Text, _>(description)
                .get_result::<IdRow>(connection)
                .map_err(|err| map_owner_violation(OPERATION, err, user_id))?;
            debug!(task_id = row.id, user_id = %user_id, "task created");
            Ok(TaskId::new(row.id))
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> RepositoryResult<Task> {
        const OPERATION: &str = "get task";
        self.run_blocking(OPERATION, move |connection| {
            let row = diesel::sql_query(queries::GET_TASK)
                .bind::<BigInt, _>(id.value())
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(|err| RepositoryError::persistence(OPERATION, err))?;
            row.map(Task::from).ok_or(RepositoryError::TaskNotFound(id))
        })
        .await
    }

    async fn update_task(&self, id: TaskId, changes: &TaskChanges) -> RepositoryResult<TaskId> {
        const OPERATION: &str = "update task";
        let title = changes.title().to_owned();
        let description = changes.description().to_owned();
        let status = changes.status().to_owned();
        let new_owner = changes.user_id();

        self.run_blocking(OPERATION, move |connection| {
            let row = diesel::sql_query(queries::UPDATE_TASK)
                .bind::<BigInt, _>(id.value())
                .bind::<Text, _>(title)
                .bind::<Text, _>(description)
                .bind::<Text, _>(status)
                .bind::<BigInt, _>(new_owner.map_or(0, UserId::value))
                .get_result::<IdRow>(connection)
                .optional()
                .map_err(|err| match new_owner {
                    Some(user_id) => map_owner_violation(OPERATION, err, user_id),
                    None => RepositoryError::persistence(OPERATION, err),
                })?;
            let row = row.ok_or(RepositoryError::TaskNotFound(id))?;
            debug!(task_id = row.id, "task updated");
            Ok(TaskId::new(row.id))
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<TaskId> {
        const OPERATION: &str = "delete task";
        self.run_blocking(OPERATION, move |connection| {
            let row = diesel::sql_query(queries::DELETE_TASK)
                .bind::<BigInt, _>(id.value())
                .get_result::<IdRow>(connection)
                .optional()
                .map_err(|err| RepositoryError::persistence(OPERATION, err))?;
            let row = row.ok_or(RepositoryError::TaskNotFound(id))?;
            debug!(task_id = row.id, "task deleted");
            Ok(TaskId::new(row.id))
        })
        .await
    }
}

#[async_trait]
impl UserRepository for PostgresTaskRepository {
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<UserId> {
        const OPERATION: &str = "create user";
        let username = user.username().clone();
        let password = user.password().to_owned();

        self.run_blocking(OPERATION, move |connection| {
            let row = diesel::sql_query(queries::CREATE_USER)
                .bind::<Text, _>(username.as_str())
                .bind::<Text, _>(password)
                .get_result::<IdRow>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        RepositoryError::DuplicateUsername(username.clone())
                    }
                    _ => RepositoryError::persistence(OPERATION, err),
                })?;
            debug!(user_id = row.id, "user created");
            Ok(UserId::new(row.id))
        })
        .await
    }

    async fn user_exists(&self, id: UserId) -> RepositoryResult<bool> {
        const OPERATION: &str = "check user exists";
        self.run_blocking(OPERATION, move |connection| {
            diesel::sql_query(queries::CHECK_USER)
                .bind::<BigInt, _>(id.value())
                .get_result::<ExistsRow>(connection)
                .map(|row| row.present)
                .map_err(|err| RepositoryError::persistence(OPERATION, err))
        })
        .await
    }

    async fn tasks_by_username(&self, username: &Username) -> RepositoryResult<Vec<Task>> {
        const OPERATION: &str = "get tasks";
        let lookup = username.as_str().to_owned();
        self.run_blocking(OPERATION, move |connection| {
            let rows = diesel::sql_query(queries::GET_TASKS_BY_USERNAME)
                .bind::<Text, _>(lookup)
                .load::<TaskRow>(connection)
                .map_err(|err| RepositoryError::persistence(OPERATION, err))?;
            Ok(rows.into_iter().map(Task::from).collect())
        })
        .await
    }

    async fn delete_user(&self, id: UserId) -> RepositoryResult<UserId> {
        const OPERATION: &str = "delete user";
        self.run_blocking(OPERATION, move |connection| {
            let row = diesel::sql_query(queries::DELETE_USER)
                .bind::<BigInt, _>(id.value())
                .get_result::<IdRow>(connection)
                .optional()
                .map_err(|err| RepositoryError::persistence(OPERATION, err))?;
            let row = row.ok_or(RepositoryError::UserNotFound(id))?;
            debug!(user_id = row.id, "user deleted");
            Ok(UserId::new(row.id))
        })
        .await
    }
}

fn map_owner_violation(
    operation: &'static str,
    err: DieselError,
    user_id: UserId,
) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            RepositoryError::UnknownUser(user_id)
        }
        _ => RepositoryError::persistence(operation, err),
    }
}
