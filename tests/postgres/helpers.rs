//! Shared test helpers for `PostgreSQL` integration tests.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use rstest::fixture;
use tasktrack::task::{
    adapters::postgres::{PostgresTaskRepository, TaskPgPool},
    domain::{NewUser, UserId, Username},
    ports::UserRepository,
};
use uuid::Uuid;

/// SQL to create the tables.
pub const CREATE_TABLES_SQL: &str =
    include_str!("../../migrations/2026-10-19-000000_create_users_and_tasks/up.sql");

/// Drops the per-test schema when the context goes away.
pub struct SchemaGuard {
    url: String,
    schema: String,
}

impl Drop for SchemaGuard {
    fn drop(&mut self) {
        let Ok(mut conn) = PgConnection::establish(&self.url) else {
            return;
        };
        drop(conn.batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema)));
    }
}

/// Repository bound to a freshly migrated schema.
pub struct PgTestContext {
    /// Repository under test.
    pub repository: PostgresTaskRepository,
    _guard: SchemaGuard,
}

/// Appends a libpq `options` parameter that pins `search_path` to `schema`.
#[must_use]
pub fn scoped_url(url: &str, schema: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}options=-csearch_path%3D{schema}")
}

fn create_schema(url: &str, schema: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(&format!("CREATE SCHEMA {schema}; SET search_path TO {schema};"))
        .map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_TABLES_SQL)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(())
}

/// Creates a migrated schema and a repository whose connections use it.
///
/// # Errors
///
/// Returns an error if schema creation or pool construction fails.
pub fn setup_repository(url: &str) -> Result<PgTestContext, BoxError> {
    let schema = format!("tasktrack_{}", Uuid::new_v4().simple());
    create_schema(url, &schema)?;
    let guard = SchemaGuard {
        url: url.to_owned(),
        schema: schema.clone(),
    };

    let manager = ConnectionManager::<PgConnection>::new(scoped_url(url, &schema));
    let pool: TaskPgPool = Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(PgTestContext {
        repository: PostgresTaskRepository::new(pool),
        _guard: guard,
    })
}

/// Provides a repository bound to a fresh schema on the shared cluster.
///
/// # Errors
///
/// Returns an error if the schema or the pool cannot be prepared.
#[fixture]
pub async fn context() -> Result<PgTestContext, BoxError> {
    let prepared = tokio::task::spawn_blocking(|| {
        let cluster = postgres_cluster();
        setup_repository(cluster.admin_url())
    })
    .await
    .map_err(|err| Box::new(err) as BoxError)??;
    Ok(prepared)
}

/// Inserts a user and returns its identifier.
///
/// # Errors
///
/// Returns an error if the username is invalid or the insert fails.
pub async fn create_user(
    repository: &PostgresTaskRepository,
    username: &str,
) -> Result<UserId, BoxError> {
    let user = NewUser::new(Username::new(username)?, "secret")?;
    Ok(repository.create_user(&user).await?)
}
