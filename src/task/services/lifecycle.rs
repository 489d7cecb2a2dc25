//! Service layer for task creation, updates, and completion handling.

use crate::config::SchedulerConfig;
use crate::task::{
    domain::{NewTask, RecurrencePattern, Task, TaskDomainError, TaskId, TaskUpdate, UserId},
    ports::{TaskRepository, TaskRepositoryError},
    services::{RecurrenceError, RecurrenceService},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    user_id: UserId,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    priority: i32,
    tags: Vec<String>,
    recurring_pattern: Option<RecurrencePattern>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            description: None,
            due_date: None,
            priority: 0,
            tags: Vec::new(),
            recurring_pattern: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due instant.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the priority rank.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Makes the task repeat.
    #[must_use]
    pub fn with_recurring_pattern(mut self, pattern: RecurrencePattern) -> Self {
        self.recurring_pattern = Some(pattern);
        self
    }

    fn into_new_task(self) -> NewTask {
        NewTask {
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            tags: self.tags,
            recurring_pattern: self.recurring_pattern,
            parent_task_id: None,
        }
    }
}

/// Result of a task update.
///
/// The update itself is durable once this value exists. Generating the next
/// instance of a recurring task is best-effort: a failure there is reported
/// in `spawn_warning` rather than failing the update.
#[derive(Debug, Clone)]
pub struct TaskUpdateOutcome {
    /// The task as stored after the update.
    pub task: Task,
    /// Next instance created because the update completed a recurring task.
    pub next_instance: Option<Task>,
    /// Why the next instance could not be created, if generation failed.
    pub spawn_warning: Option<RecurrenceError>,
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task workflow service.
///
/// Wraps storage with validation and triggers next-instance generation when
/// an update completes a task.
#[derive(Clone)]
pub struct TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    recurrence: RecurrenceService<R, C>,
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default [`SchedulerConfig`].
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_config(repository, clock, SchedulerConfig::default())
    }

    /// Creates a service with an explicit scheduler configuration.
    #[must_use]
    pub fn with_config(repository: Arc<R>, clock: Arc<C>, config: SchedulerConfig) -> Self {
        let recurrence =
            RecurrenceService::with_config(Arc::clone(&repository), Arc::clone(&clock), config);
        Self {
            repository,
            clock,
            recurrence,
        }
    }

    /// Returns the recurrence service used on completion.
    #[must_use]
    pub const fn recurrence(&self) -> &RecurrenceService<R, C> {
        &self.recurrence
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for a blank title or invalid
    /// recurrence rule and [`TaskServiceError::Repository`] when storage
    /// rejects the row.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let new_task = request.into_new_task();
        new_task.validate()?;
        Ok(self.repository.create(new_task).await?)
    }

    /// Applies a partial update and persists it.
    ///
    /// When the update marks the task completed, the next instance of a
    /// recurring task is generated afterwards. That step never fails the
    /// update; its error is logged and returned in
    /// [`TaskUpdateOutcome::spawn_warning`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for an unknown task,
    /// [`TaskServiceError::Domain`] when the update is invalid, and
    /// [`TaskServiceError::Repository`] when the update cannot be stored.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        update: TaskUpdate,
    ) -> TaskServiceResult<TaskUpdateOutcome> {
        let mut task = self
            .repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(task_id))?;

        let completes = update.marks_completed();
        task.apply(update, &*self.clock)?;
        self.repository.update(&task).await?;

        let mut outcome = TaskUpdateOutcome {
            task,
            next_instance: None,
            spawn_warning: None,
        };
        if completes {
            match self.recurrence.on_task_completed(task_id).await {
                Ok(next_instance) => outcome.next_instance = next_instance,
                Err(err) => {
                    warn!(
                        %task_id,
                        error = %err,
                        "failed to create next instance of recurring task"
                    );
                    outcome.spawn_warning = Some(err);
                }
            }
        }
        Ok(outcome)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the task does not exist
    /// or storage fails.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskServiceResult<()> {
        Ok(self.repository.delete(task_id).await?)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskServiceResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Returns the instances generated from a recurring task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the lookup fails.
    pub async fn find_instances(&self, parent_id: TaskId) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repository.find_by_parent(parent_id).await?)
    }
}
