//! Then steps for recurring task BDD scenarios.

use super::world::{RecurringTaskWorld, parse_date, run_async};
use cadence::task::{domain::Task, services::TaskUpdateOutcome};
use rstest_bdd_macros::then;

fn outcome(world: &RecurringTaskWorld) -> Result<&TaskUpdateOutcome, eyre::Report> {
    world
        .outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update outcome in scenario world"))
}

fn next_instance(world: &RecurringTaskWorld) -> Result<&Task, eyre::Report> {
    outcome(world)?
        .next_instance
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected a next instance to be created"))
}

#[then(r#"a next instance is created due on "{due}""#)]
fn next_instance_due_on(world: &RecurringTaskWorld, due: String) -> Result<(), eyre::Report> {
    let expected = parse_date(&due)?;
    let next = next_instance(world)?;
    if next.due_date() != Some(expected) {
        return Err(eyre::eyre!(
            "expected next instance due on {expected}, found {:?}",
            next.due_date()
        ));
    }
    Ok(())
}

#[then("the next instance references the completed task")]
fn next_instance_references_parent(world: &RecurringTaskWorld) -> Result<(), eyre::Report> {
    let parent = outcome(world)?.task.id();
    let next = next_instance(world)?;
    if next.parent_task_id() != Some(parent) {
        return Err(eyre::eyre!(
            "expected parent {parent}, found {:?}",
            next.parent_task_id()
        ));
    }
    Ok(())
}

#[then("the next instance is not completed")]
fn next_instance_is_open(world: &RecurringTaskWorld) -> Result<(), eyre::Report> {
    if next_instance(world)?.is_completed() {
        return Err(eyre::eyre!("next instance must start incomplete"));
    }
    Ok(())
}

#[then("no next instance is created")]
fn no_next_instance(world: &RecurringTaskWorld) -> Result<(), eyre::Report> {
    let update = outcome(world)?;
    if let Some(next) = update.next_instance.as_ref() {
        return Err(eyre::eyre!("unexpected next instance {}", next.id()));
    }
    let instances = run_async(world.service()?.find_instances(update.task.id()))
        .map_err(|err| eyre::eyre!("instance lookup failed: {err}"))?;
    if !instances.is_empty() {
        return Err(eyre::eyre!("expected no stored instances, found {}", instances.len()));
    }
    Ok(())
}

#[then("the task is stored as completed")]
fn task_stored_completed(world: &RecurringTaskWorld) -> Result<(), eyre::Report> {
    let task_id = outcome(world)?.task.id();
    let stored = run_async(world.service()?.find_by_id(task_id))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("task {task_id} missing from storage"))?;
    if !stored.is_completed() {
        return Err(eyre::eyre!("task {task_id} is not completed"));
    }
    Ok(())
}
