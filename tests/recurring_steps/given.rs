//! Given steps for recurring task BDD scenarios.

use std::sync::Arc;

use super::world::{RecurringTaskWorld, ScenarioClock, parse_date, run_async};
use cadence::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{RecurrencePattern, UserId},
    services::{CreateTaskRequest, TaskService},
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"the current date is "{date}""#)]
fn current_date(world: &mut RecurringTaskWorld, date: String) -> Result<(), eyre::Report> {
    let clock = ScenarioClock(parse_date(&date)?);
    world.service = Some(TaskService::new(
        Arc::new(InMemoryTaskRepository::with_clock(Arc::new(clock))),
        Arc::new(clock),
    ));
    Ok(())
}

#[given(r#"a weekly task on weekdays "{weekdays}" due on "{due}""#)]
fn weekly_task(
    world: &mut RecurringTaskWorld,
    weekdays: String,
    due: String,
) -> Result<(), eyre::Report> {
    let selected = weekdays
        .split(',')
        .map(|day| day.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .wrap_err("parse weekday list")?;
    let pattern = RecurrencePattern::weekly().with_weekdays(selected)?;
    create_task(world, &due, pattern)
}

#[given(r#"a daily task due on "{due}""#)]
fn daily_task(world: &mut RecurringTaskWorld, due: String) -> Result<(), eyre::Report> {
    create_task(world, &due, RecurrencePattern::daily())
}

#[given(r#"a daily task ending on "{end}" due on "{due}""#)]
fn daily_task_with_end(
    world: &mut RecurringTaskWorld,
    end: String,
    due: String,
) -> Result<(), eyre::Report> {
    let pattern = RecurrencePattern::daily().with_end_date(parse_date(&end)?);
    create_task(world, &due, pattern)
}

#[given(r#"a monthly task on day {day:u32} due on "{due}""#)]
fn monthly_task(world: &mut RecurringTaskWorld, day: u32, due: String) -> Result<(), eyre::Report> {
    let month_day = u8::try_from(day).wrap_err("month day out of range")?;
    let pattern = RecurrencePattern::monthly().with_month_day(month_day)?;
    create_task(world, &due, pattern)
}

fn create_task(
    world: &mut RecurringTaskWorld,
    due: &str,
    pattern: RecurrencePattern,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(UserId::new(), "Review budget")
        .with_due_date(parse_date(due)?)
        .with_tags(vec!["finance".to_owned()])
        .with_recurring_pattern(pattern);
    let created = run_async(world.service()?.create_task(request))
        .wrap_err("create recurring task for scenario")?;
    world.task = Some(created);
    Ok(())
}
