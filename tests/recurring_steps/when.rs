//! When steps for recurring task BDD scenarios.

use super::world::{RecurringTaskWorld, run_async};
use cadence::task::domain::TaskUpdate;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the task is marked completed")]
fn mark_completed(world: &mut RecurringTaskWorld) -> Result<(), eyre::Report> {
    let task_id = world
        .task
        .as_ref()
        .map(cadence::task::domain::Task::id)
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let outcome = run_async(
        world
            .service()?
            .update_task(task_id, TaskUpdate::complete()),
    )
    .wrap_err("complete task in scenario")?;
    world.outcome = Some(outcome);
    Ok(())
}
