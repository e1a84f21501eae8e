//! `TaskStore` contract tests for the `SQLite` adapter.

use super::helpers::{ScratchDatabase, database};
use crate::test_helpers::{ManualClock, start_of_day, task_in_status};
use diesel::connection::SimpleConnection;
use diesel::Connection;
use diesel::sqlite::SqliteConnection;
use rstest::rstest;
use taskboard::task::{
    domain::{Priority, Task, TaskId, TaskStatus},
    ports::{StoreError, TaskStore},
};

fn sorted_by_id(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by_key(Task::id);
    tasks
}

fn mixed_tasks() -> eyre::Result<Vec<Task>> {
    let clock = ManualClock::at(start_of_day());
    Ok(vec![
        task_in_status("Draft copy", TaskStatus::New, Priority::Low, &clock)?,
        task_in_status("Fix login", TaskStatus::Ongoing, Priority::High, &clock)?,
        task_in_status("Ship beta", TaskStatus::Done, Priority::Medium, &clock)?,
    ])
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replace_all_then_load_all_round_trips(database: ScratchDatabase) -> eyre::Result<()> {
    let store = database.store();
    let tasks = mixed_tasks()?;

    store.initialize().await?;
    store.replace_all(&tasks).await?;
    let loaded = store.load_all().await?;

    eyre::ensure!(sorted_by_id(loaded) == sorted_by_id(tasks));
    store.close().await;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replace_all_discards_previous_records(database: ScratchDatabase) -> eyre::Result<()> {
    let store = database.store();
    let tasks = mixed_tasks()?;
    store.replace_all(&tasks).await?;

    let kept: Vec<Task> = tasks.iter().skip(1).take(1).cloned().collect();
    store.replace_all(&kept).await?;

    eyre::ensure!(store.load_all().await? == kept);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initialize_twice_is_harmless(database: ScratchDatabase) -> eyre::Result<()> {
    let store = database.store();

    store.initialize().await?;
    store.initialize().await?;

    eyre::ensure!(store.is_open());
    eyre::ensure!(store.load_all().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_one_removes_only_the_named_record(database: ScratchDatabase) -> eyre::Result<()> {
    let store = database.store();
    let tasks = mixed_tasks()?;
    store.replace_all(&tasks).await?;
    let removed = tasks
        .first()
        .map(Task::id)
        .ok_or_else(|| eyre::eyre!("fixture has tasks"))?;

    store.delete_one(removed).await?;
    store.delete_one(TaskId::new()).await?;

    let remaining = store.load_all().await?;
    eyre::ensure!(remaining.len() == tasks.len() - 1);
    eyre::ensure!(remaining.iter().all(|task| task.id() != removed));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn data_survives_close_and_a_new_store(database: ScratchDatabase) -> eyre::Result<()> {
    let tasks = mixed_tasks()?;
    let store = database.store();
    store.replace_all(&tasks).await?;
    store.close().await;
    store.close().await;
    eyre::ensure!(!store.is_open());

    let reopened = database.store();
    let loaded = reopened.load_all().await?;

    eyre::ensure!(sorted_by_id(loaded) == sorted_by_id(tasks));
    eyre::ensure!(store.load_all().await?.len() == 3, "closed store reopens on use");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn corrupt_rows_fail_with_read_error(database: ScratchDatabase) -> eyre::Result<()> {
    let store = database.store();
    store.initialize().await?;
    let path = database.path();
    tokio::task::spawn_blocking(move || -> eyre::Result<()> {
        let mut connection = SqliteConnection::establish(&path.to_string_lossy())?;
        connection.batch_execute(
            "INSERT INTO tasks (id, title, description, status, priority, created_at) \
             VALUES ('not-a-uuid', 'Broken', 'Bad id', 'New', 'low', '2026-03-02T09:00:00Z');",
        )?;
        Ok(())
    })
    .await??;

    let result = store.load_all().await;

    eyre::ensure!(
        matches!(result, Err(StoreError::Read(_))),
        "expected read error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_database_is_unavailable_without_waiting(
    database: ScratchDatabase,
) -> eyre::Result<()> {
    let store = database.unreachable_store();
    let started = std::time::Instant::now();

    let result = store.initialize().await;

    eyre::ensure!(
        matches!(result, Err(StoreError::Unavailable(_))),
        "expected unavailable, got {result:?}"
    );
    eyre::ensure!(
        started.elapsed() < std::time::Duration::from_secs(5),
        "initialize took {:?}",
        started.elapsed()
    );
    eyre::ensure!(!store.is_open());
    Ok(())
}
