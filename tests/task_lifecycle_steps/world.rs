//! Shared world state for in-memory task lifecycle scenarios.

use rstest::fixture;
use tasktrack::task::{adapters::memory::InMemoryTaskRepository, domain::TaskId};

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskWorld {
    pub repository: InMemoryTaskRepository,
    pub last_task_id: Option<TaskId>,
}

impl TaskWorld {
    /// Creates a world around an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            repository: InMemoryTaskRepository::new(),
            last_task_id: None,
        }
    }

    /// Returns the id of the most recently created task.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn current_id(&self) -> Result<TaskId, eyre::Report> {
        self.last_task_id
            .ok_or_else(|| eyre::eyre!("no task created in scenario world"))
    }
}

impl Default for TaskWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskWorld {
    TaskWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
