//! In-memory integration tests for recurring task completion.

use super::helpers::{TestService, day, service_at};
use cadence::config::SchedulerConfig;
use cadence::task::{
    domain::{RecurrencePattern, Task, TaskUpdate, UserId, next_occurrence},
    services::CreateTaskRequest,
};
use eyre::{ensure, eyre};
use rstest::{fixture, rstest};

#[fixture]
fn service() -> TestService {
    let now = day(2024, 6, 1).unwrap_or_default();
    service_at(now, SchedulerConfig::default())
}

async fn create_recurring(
    service: &TestService,
    due: chrono::DateTime<chrono::Utc>,
    pattern: RecurrencePattern,
) -> Result<Task, eyre::Report> {
    let request = CreateTaskRequest::new(UserId::new(), "Pay rent")
        .with_due_date(due)
        .with_priority(1)
        .with_tags(vec!["bills".to_owned()])
        .with_recurring_pattern(pattern);
    Ok(service.create_task(request).await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_each_instance_walks_the_series(
    service: TestService,
) -> Result<(), eyre::Report> {
    let pattern = RecurrencePattern::weekly().with_weekdays([1, 5])?;
    let first = create_recurring(&service, day(2024, 6, 3)?, pattern).await?;

    let second = service
        .update_task(first.id(), TaskUpdate::complete())
        .await?
        .next_instance
        .ok_or_else(|| eyre!("first completion should spawn"))?;
    let third = service
        .update_task(second.id(), TaskUpdate::complete())
        .await?
        .next_instance
        .ok_or_else(|| eyre!("second completion should spawn"))?;

    ensure!(second.due_date() == Some(day(2024, 6, 7)?), "second due date");
    ensure!(third.due_date() == Some(day(2024, 6, 10)?), "third due date");
    ensure!(third.parent_task_id() == Some(second.id()), "chain link");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completing_twice_creates_one_instance(service: TestService) -> Result<(), eyre::Report> {
    let task = create_recurring(&service, day(2024, 6, 2)?, RecurrencePattern::daily()).await?;

    service
        .update_task(task.id(), TaskUpdate::complete())
        .await?;
    let repeat = service
        .update_task(task.id(), TaskUpdate::complete())
        .await?;

    ensure!(repeat.next_instance.is_none(), "repeat completion spawned");
    ensure!(
        service.find_instances(task.id()).await?.len() == 1,
        "expected a single instance"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopening_does_not_spawn(service: TestService) -> Result<(), eyre::Report> {
    let task = create_recurring(&service, day(2024, 6, 2)?, RecurrencePattern::daily()).await?;
    let reopen = TaskUpdate {
        completed: Some(false),
        ..TaskUpdate::default()
    };

    let outcome = service.update_task(task.id(), reopen).await?;

    ensure!(outcome.next_instance.is_none(), "reopen must not spawn");
    ensure!(outcome.spawn_warning.is_none(), "no warning expected");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn corrected_policy_clamps_end_of_month() -> Result<(), eyre::Report> {
    let service = service_at(day(2024, 1, 30)?, SchedulerConfig::corrected());
    let task = create_recurring(&service, day(2024, 1, 31)?, RecurrencePattern::monthly()).await?;

    let next = service
        .update_task(task.id(), TaskUpdate::complete())
        .await?
        .next_instance
        .ok_or_else(|| eyre!("completion should spawn"))?;

    ensure!(next.due_date() == Some(day(2024, 2, 29)?), "clamped date expected");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn compatible_policy_matches_calculator() -> Result<(), eyre::Report> {
    let service = service_at(day(2024, 1, 30)?, SchedulerConfig::compatible());
    let pattern = RecurrencePattern::monthly();
    let due = day(2024, 1, 31)?;
    let task = create_recurring(&service, due, pattern.clone()).await?;

    let next = service
        .update_task(task.id(), TaskUpdate::complete())
        .await?
        .next_instance
        .ok_or_else(|| eyre!("completion should spawn"))?;

    ensure!(next.due_date() == next_occurrence(due, &pattern), "calculator mismatch");
    ensure!(next.due_date() == Some(day(2024, 3, 2)?), "overflowed date expected");
    Ok(())
}
