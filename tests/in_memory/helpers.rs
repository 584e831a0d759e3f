//! Shared test helpers for in-memory repository integration tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::Arc;
use tasktrack::task::{
    adapters::memory::InMemoryTaskRepository, domain::NewTask, ports::TaskRepository,
};

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Instant used by [`fixed_clock`].
#[must_use]
pub fn frozen_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Provides a clock frozen at [`frozen_instant`].
#[fixture]
pub fn fixed_clock() -> FixedClock {
    FixedClock(frozen_instant())
}

/// Provides a fresh in-memory repository behind the port trait.
#[fixture]
pub fn repo(fixed_clock: FixedClock) -> Arc<dyn TaskRepository> {
    Arc::new(InMemoryTaskRepository::with_clock(fixed_clock))
}

/// Builds a task payload, panicking on an invalid title.
#[must_use]
pub fn task(title: &str) -> NewTask {
    NewTask::new(title).expect("valid task title")
}
