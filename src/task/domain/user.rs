//! User account values.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty, trimmed account name. Unique across users in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyUsername`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload for creating a user.
///
/// The password is an opaque credential stored exactly as given; hashing is
/// the caller's concern.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    username: Username,
    password: String,
}

impl NewUser {
    /// Creates a user payload.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyPassword`] when the password is empty.
    pub fn new(username: Username, password: impl Into<String>) -> Result<Self, TaskDomainError> {
        let password = password.into();
        if password.is_empty() {
            return Err(TaskDomainError::EmptyPassword);
        }
        Ok(Self { username, password })
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the stored credential.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
