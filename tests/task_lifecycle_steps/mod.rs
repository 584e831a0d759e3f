//! Step definitions for in-memory task lifecycle scenarios.

pub mod world;
