//! Tasktrack: task-tracking data access.
//!
//! This crate provides the storage core of a task-tracking backend: task and
//! user records, the repository contracts that store them, and the service
//! layer that validates requests before they reach storage.
//!
//! # Architecture
//!
//! Tasktrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types with no infrastructure dependencies
//! - **Ports**: Abstract repository traits
//! - **Adapters**: `PostgreSQL` and in-memory implementations of the ports
//!
//! # Modules
//!
//! - [`config`]: Database settings and connection pool construction
//! - [`task`]: Task and user domain, ports, adapters, and services

pub mod config;
pub mod task;
