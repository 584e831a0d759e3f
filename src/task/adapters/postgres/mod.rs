//! `PostgreSQL` adapters for task and user persistence.

mod models;
mod pool;
mod queries;
mod repository;
mod schema;

pub use pool::{StatementTimeout, TaskPgPool};
pub use repository::PostgresTaskRepository;
