//! Concurrent access to a shared in-memory repository.

use crate::in_memory::helpers::task;
use std::collections::BTreeSet;
use tasktrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskChanges, TaskId},
    ports::TaskRepository,
};

const WRITERS: i64 = 64;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_assign_distinct_sequential_ids() {
    let repo = InMemoryTaskRepository::new();

    let handles: Vec<_> = (0..WRITERS)
        .map(|n| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create_task(&task(&format!("task {n}"))).await })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for handle in handles {
        let id = handle
            .await
            .expect("writer should not panic")
            .expect("create should succeed");
        ids.insert(id);
    }

    let expected: BTreeSet<_> = (1..=WRITERS).map(TaskId::new).collect();
    assert_eq!(ids, expected);
    assert_eq!(
        repo.all_tasks().expect("store is populated").len(),
        usize::try_from(WRITERS).expect("small count")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_observe_whole_records_during_updates() {
    let repo = InMemoryTaskRepository::new();
    let id = repo
        .create_task(&task("initial"))
        .await
        .expect("create should succeed");

    let writer = {
        let repo = repo.clone();
        tokio::spawn(async move {
            for round in 0..200 {
                let label = format!("round {round}");
                repo.update_task(
                    id,
                    &TaskChanges::new()
                        .with_title(label.clone())
                        .with_status(label),
                )
                .await
                .expect("update should succeed");
            }
        })
    };
    let reader = {
        let repo = repo.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let stored = repo.find_task(id).await.expect("task should exist");
                if stored.title() != "initial" {
                    assert_eq!(stored.title(), stored.status());
                }
            }
        })
    };

    writer.await.expect("writer should not panic");
    reader.await.expect("reader should not panic");
}
