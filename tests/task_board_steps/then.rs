//! Then steps for task board BDD scenarios.

use super::world::TaskBoardWorld;
use rstest_bdd_macros::then;
use taskboard::task::{
    domain::{TaskDomainError, TaskStatus},
    services::BoardError,
};

#[then(r#"the overdue tasks are exactly "{title}""#)]
fn overdue_tasks_are(world: &TaskBoardWorld, title: String) -> Result<(), eyre::Report> {
    let overdue = world.board()?.overdue();
    let titles: Vec<&str> = overdue.iter().map(|task| task.title()).collect();
    eyre::ensure!(titles == [title.as_str()], "overdue titles were {titles:?}");
    Ok(())
}

#[then("no task is overdue")]
fn no_task_is_overdue(world: &TaskBoardWorld) -> Result<(), eyre::Report> {
    let overdue = world.board()?.overdue();
    eyre::ensure!(overdue.is_empty(), "unexpected overdue tasks {overdue:?}");
    Ok(())
}

#[then("the request succeeds")]
fn request_succeeds(world: &TaskBoardWorld) -> Result<(), eyre::Report> {
    match &world.last_result {
        Some(Ok(_)) => Ok(()),
        other => Err(eyre::eyre!("expected success, got {other:?}")),
    }
}

#[then("the request fails with a validation error")]
fn request_fails_with_validation_error(world: &TaskBoardWorld) -> Result<(), eyre::Report> {
    match &world.last_result {
        Some(Err(BoardError::Domain(err))) if err.is_validation() => Ok(()),
        other => Err(eyre::eyre!("expected validation error, got {other:?}")),
    }
}

#[then("the request fails with an invalid transition error")]
fn request_fails_with_invalid_transition(world: &TaskBoardWorld) -> Result<(), eyre::Report> {
    match &world.last_result {
        Some(Err(BoardError::Domain(TaskDomainError::InvalidStateTransition { .. }))) => Ok(()),
        other => Err(eyre::eyre!("expected invalid transition, got {other:?}")),
    }
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskBoardWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let id = world.current_task()?.id();
    let actual = world
        .board()?
        .get(id)
        .map(|task| task.status())
        .ok_or_else(|| eyre::eyre!("task {id} missing from board"))?;
    eyre::ensure!(actual == expected, "expected {expected}, found {actual}");
    Ok(())
}

#[then("the task has no due date")]
fn task_has_no_due_date(world: &TaskBoardWorld) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    eyre::ensure!(task.due_date().is_none(), "due date is {:?}", task.due_date());
    Ok(())
}

#[then("the board holds {count:usize} tasks")]
fn board_holds(world: &TaskBoardWorld, count: usize) -> Result<(), eyre::Report> {
    let held = world.board()?.all().len();
    eyre::ensure!(held == count, "board holds {held} tasks");
    Ok(())
}
