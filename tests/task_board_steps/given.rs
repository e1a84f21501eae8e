//! Given steps for task board BDD scenarios.

use super::world::TaskBoardWorld;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::task::services::CreateTaskRequest;

#[given("an empty task board")]
fn empty_task_board(world: &mut TaskBoardWorld) {
    world.open_board();
}

#[given(r#"a task titled "{title}" has been created"#)]
fn task_has_been_created(world: &mut TaskBoardWorld, title: String) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(title, "Created by a scenario");
    let created = world
        .board_mut()?
        .create(request)
        .wrap_err("create task in scenario setup")?;
    world.current_task = Some(created);
    Ok(())
}
