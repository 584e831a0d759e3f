//! Error types for task and user domain validation.

use thiserror::Error;

/// Errors returned while constructing domain values from caller input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// A task owner was required but not supplied.
    #[error("user id is required")]
    MissingUserId,

    /// An identifier is zero or negative where a positive value is required.
    #[error("invalid identifier {0}, expected a positive integer")]
    InvalidId(i64),

    /// An identifier could not be parsed as an integer.
    #[error("malformed identifier '{0}'")]
    MalformedId(String),
}
