//! Connection pool type and per-connection session settings.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use std::time::Duration;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Applies a server-side `statement_timeout` to each new pooled connection.
///
/// A statement running past the limit is cancelled by the server and the
/// repository call fails with a persistence error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementTimeout(Duration);

impl StatementTimeout {
    /// Creates a timeout of `millis` milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Returns the `SET` statement issued on connection setup.
    #[must_use]
    pub fn to_sql(self) -> String {
        format!("SET statement_timeout = {}", self.0.as_millis())
    }
}

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for StatementTimeout {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&self.to_sql())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}
