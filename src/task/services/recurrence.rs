//! Generation of follow-up instances for recurring tasks.

use crate::config::SchedulerConfig;
use crate::task::{
    domain::{Task, TaskId, next_occurrence_with_policy},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Errors raised while generating the next instance of a recurring task.
#[derive(Debug, Clone, Error)]
pub enum RecurrenceError {
    /// The completed task could not be re-read from storage.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for recurrence operations.
pub type RecurrenceResult<T> = Result<T, RecurrenceError>;

/// Decides whether a completed task should spawn its next instance.
///
/// True when the task carries both a recurrence rule and a due date, and the
/// due date is at most `look_ahead_days` whole days after `now`. Whole days
/// are the millisecond difference floored, so anything overdue qualifies.
#[must_use]
pub fn should_spawn_next(task: &Task, now: DateTime<Utc>, look_ahead_days: i64) -> bool {
    let (Some(_), Some(due_date)) = (task.recurring_pattern(), task.due_date()) else {
        return false;
    };
    whole_days_between(now, due_date) <= look_ahead_days
}

fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Recurrence orchestration service.
///
/// Holds no state between calls beyond its collaborators. Each operation
/// awaits its storage round-trips in sequence.
#[derive(Clone)]
pub struct RecurrenceService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: SchedulerConfig,
}

impl<R, C> RecurrenceService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default [`SchedulerConfig`].
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_config(repository, clock, SchedulerConfig::default())
    }

    /// Creates a service with an explicit configuration.
    #[must_use]
    pub const fn with_config(repository: Arc<R>, clock: Arc<C>, config: SchedulerConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns the due date the next instance of `task` would carry.
    ///
    /// `None` when the task does not repeat, has no due date, or its series
    /// has ended.
    #[must_use]
    pub fn next_due_date(&self, task: &Task) -> Option<DateTime<Utc>> {
        let pattern = task.recurring_pattern()?;
        let due_date = task.due_date()?;
        next_occurrence_with_policy(due_date, pattern, self.config.month_day_policy)
    }

    /// Evaluates [`should_spawn_next`] against the service clock and window.
    #[must_use]
    pub fn should_spawn_next(&self, task: &Task) -> bool {
        should_spawn_next(task, self.clock.utc(), self.config.look_ahead_days)
    }

    /// Creates the next instance of a recurring task.
    ///
    /// Returns `Ok(None)` without touching storage when the task lacks a rule
    /// or due date, or when the series has no further occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::Repository`] when storage rejects the new
    /// row.
    pub async fn create_next_instance(&self, task: &Task) -> RecurrenceResult<Option<Task>> {
        let Some(next_due) = self.next_due_date(task) else {
            debug!(task_id = %task.id(), "no further occurrence, skipping next instance");
            return Ok(None);
        };

        let created = self.repository.create(task.next_instance(next_due)).await?;
        info!(
            task_id = %task.id(),
            next_task_id = %created.id(),
            due_date = %next_due,
            "created next instance of recurring task"
        );
        Ok(Some(created))
    }

    /// Handles a task that has just been marked completed.
    ///
    /// The triggering update may carry only some fields, so the full row is
    /// re-read before deciding. Nothing is created when the stored row is not
    /// completed, falls outside the look-ahead window, or already has a
    /// generated instance.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::TaskNotFound`] when the row has vanished,
    /// or [`RecurrenceError::Repository`] when a read or write fails.
    pub async fn on_task_completed(&self, task_id: TaskId) -> RecurrenceResult<Option<Task>> {
        let task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(RecurrenceError::TaskNotFound(task_id))?;

        if !task.is_completed() {
            debug!(%task_id, "task is not completed, skipping next instance");
            return Ok(None);
        }
        if !self.should_spawn_next(&task) {
            debug!(%task_id, "task is not due within the look-ahead window");
            return Ok(None);
        }
        if !self.repository.find_by_parent(task_id).await?.is_empty() {
            debug!(%task_id, "next instance already exists");
            return Ok(None);
        }

        self.create_next_instance(&task).await
    }
}
