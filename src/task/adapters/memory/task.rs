//! In-memory task repository for the standalone deployment.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::task::{
    domain::{NewTask, Task, TaskChanges, TaskId},
    ports::{RepositoryError, RepositoryResult, TaskRepository},
};

/// Thread-safe in-memory task repository.
///
/// One reader/writer lock guards both the task map and the id counter, so
/// reads run concurrently and every write is fully serialized. Ids start at
/// 1 and are never reused. Updates replace the whole record.
pub struct InMemoryTaskRepository<C = DefaultClock> {
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: Arc<C>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    last_id: i64,
}

impl InMemoryTaskRepository {
    /// Creates an empty repository stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(DefaultClock)
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty repository stamped by `clock`.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock: Arc::new(clock),
        }
    }

    /// Returns every stored task keyed by id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NoTasks`] when the store is empty.
    pub fn all_tasks(&self) -> RepositoryResult<BTreeMap<TaskId, Task>> {
        let state = self.read("list tasks")?;
        if state.tasks.is_empty() {
            return Err(RepositoryError::NoTasks);
        }
        Ok(state.tasks.clone())
    }

    fn read(
        &self,
        operation: &'static str,
    ) -> RepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            RepositoryError::persistence(operation, std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> RepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            RepositoryError::persistence(operation, std::io::Error::other(err.to_string()))
        })
    }
}

impl<C> Clone for InMemoryTaskRepository<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryTaskRepository<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTaskRepository")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> TaskRepository for InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    async fn create_task(&self, task: &NewTask) -> RepositoryResult<TaskId> {
        let mut state = self.write("create task")?;
        let next = state.last_id.checked_add(1).ok_or_else(|| {
            RepositoryError::persistence(
                "create task",
                std::io::Error::other("task identifier space exhausted"),
            )
        })?;
        let id = TaskId::new(next);
        if state.tasks.contains_key(&id) {
            return Err(RepositoryError::DuplicateTask(id));
        }

        state.last_id = next;
        state.tasks.insert(id, Task::create(id, task, &*self.clock));
        debug!(task_id = %id, "task created");
        Ok(id)
    }

    async fn find_task(&self, id: TaskId) -> RepositoryResult<Task> {
        let state = self.read("get task")?;
        state
            .tasks
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::TaskNotFound(id))
    }

    async fn update_task(&self, id: TaskId, changes: &TaskChanges) -> RepositoryResult<TaskId> {
        let mut state = self.write("update task")?;
        let stored = state
            .tasks
            .get_mut(&id)
            .ok_or(RepositoryError::TaskNotFound(id))?;
        stored.replace_fields(changes);
        debug!(task_id = %id, "task replaced");
        Ok(id)
    }

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<TaskId> {
        let mut state = self.write("delete task")?;
        state
            .tasks
            .remove(&id)
            .ok_or(RepositoryError::TaskNotFound(id))?;
        debug!(task_id = %id, "task deleted");
        Ok(id)
    }
}
