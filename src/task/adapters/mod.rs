//! Storage adapters implementing the task ports.
//!
//! - [`memory::InMemoryTaskRepository`]: process-local map for the
//!   standalone deployment; no users, nothing persisted
//! - [`postgres::PostgresTaskRepository`]: durable storage with users, built
//!   on Diesel and an r2d2 connection pool

pub mod memory;
pub mod postgres;
