//! `TaskStore` contract tests for the in-memory adapter.

use crate::test_helpers::{ManualClock, start_of_day, task_in_status};
use rstest::{fixture, rstest};
use taskboard::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Priority, Task, TaskId, TaskStatus},
    ports::TaskStore,
};

#[fixture]
fn store() -> InMemoryTaskStore {
    InMemoryTaskStore::new()
}

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
async fn replace_all_then_load_all_round_trips(store: InMemoryTaskStore) -> eyre::Result<()> {
    let tasks = mixed_tasks()?;

    store.initialize().await?;
    store.replace_all(&tasks).await?;
    let loaded = store.load_all().await?;

    eyre::ensure!(sorted_by_id(loaded) == sorted_by_id(tasks));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replace_all_discards_previous_records(store: InMemoryTaskStore) -> eyre::Result<()> {
    let tasks = mixed_tasks()?;
    store.replace_all(&tasks).await?;

    let kept: Vec<Task> = tasks.iter().take(1).cloned().collect();
    store.replace_all(&kept).await?;

    eyre::ensure!(store.load_all().await? == kept);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initialize_twice_opens_once(store: InMemoryTaskStore) -> eyre::Result<()> {
    store.initialize().await?;
    store.initialize().await?;

    eyre::ensure!(store.opened_count() == 1);
    eyre::ensure!(store.is_open());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_one_ignores_missing_records(store: InMemoryTaskStore) -> eyre::Result<()> {
    let tasks = mixed_tasks()?;
    store.replace_all(&tasks).await?;

    store.delete_one(TaskId::new()).await?;

    eyre::ensure!(store.len() == tasks.len());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_store_reopens_on_next_use(store: InMemoryTaskStore) -> eyre::Result<()> {
    let tasks = mixed_tasks()?;
    store.replace_all(&tasks).await?;

    store.close().await;
    store.close().await;
    eyre::ensure!(!store.is_open());

    let loaded = store.load_all().await?;
    eyre::ensure!(loaded.len() == tasks.len());
    eyre::ensure!(store.is_open());
    eyre::ensure!(store.opened_count() == 2);
    Ok(())
}
