//! User operations against `PostgreSQL`.

use crate::postgres::helpers::{BoxError, PgTestContext, context, create_user};
use rstest::rstest;
use tasktrack::task::{
    domain::{NewTask, NewUser, UserId, Username},
    ports::{ErrorKind, RepositoryError, TaskRepository, UserRepository},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_username_is_rejected(
    #[future] context: Result<PgTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let repo = &ctx.repository;
    let first = create_user(repo, "alice").await?;

    let duplicate = NewUser::new(Username::new("alice")?, "other")?;
    let err = repo
        .create_user(&duplicate)
        .await
        .expect_err("username must be unique");

    assert!(matches!(&err, RepositoryError::DuplicateUsername(name) if name.as_str() == "alice"));
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(repo.user_exists(first).await?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_exists_reports_absence_without_error(
    #[future] context: Result<PgTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let repo = &ctx.repository;

    assert!(!repo.user_exists(UserId::new(1)).await?);

    let alice = create_user(repo, "alice").await?;
    assert!(repo.user_exists(alice).await?);

    assert_eq!(repo.delete_user(alice).await?, alice);
    assert!(!repo.user_exists(alice).await?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_user_removes_their_tasks(
    #[future] context: Result<PgTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;
    let repo = &ctx.repository;
    let alice = create_user(repo, "alice").await?;
    let task_id = repo
        .create_task(&NewTask::new("buy milk")?.with_user(alice))
        .await?;

    repo.delete_user(alice).await?;

    assert!(matches!(
        repo.find_task(task_id).await,
        Err(RepositoryError::TaskNotFound(_))
    ));
    assert!(
        repo.tasks_by_username(&Username::new("alice")?)
            .await?
            .is_empty()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_missing_user_is_not_found(
    #[future] context: Result<PgTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;

    let result = ctx.repository.delete_user(UserId::new(31)).await;

    assert!(matches!(result, Err(RepositoryError::UserNotFound(id)) if id == UserId::new(31)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_for_unknown_user_is_empty(
    #[future] context: Result<PgTestContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = context.await?;

    let tasks = ctx
        .repository
        .tasks_by_username(&Username::new("nobody")?)
        .await?;

    assert!(tasks.is_empty());
    Ok(())
}
