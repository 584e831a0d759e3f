//! Port contracts for task and user persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

pub use repository::{
    ErrorKind, RepositoryError, RepositoryResult, TaskRepository, UserRepository,
};

#[cfg(test)]
pub use repository::{MockTaskRepository, MockUserRepository};
