//! Task tracking: tasks, their owners, and the repositories that store them.
//!
//! Two deployments share the same task port. The durable one stores users
//! and tasks in `PostgreSQL` and enforces ownership; the standalone one keeps
//! tasks in a process-local map with no users and no persistence. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Request handling in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
