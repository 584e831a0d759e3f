//! Domain model for task tracking.
//!
//! Tasks are plain value records optionally owned by a user. Identifiers and
//! timestamps are assigned by repositories; the domain only validates caller
//! input and carries data between layers.

mod error;
mod ids;
mod task;
mod user;

pub use error::TaskDomainError;
pub use ids::{TaskId, UserId};
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges};
pub use user::{NewUser, Username};
