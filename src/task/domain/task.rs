//! Task aggregate root and creation/update payloads.

use super::{RecurrencePattern, TaskDomainError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    user_id: UserId,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    priority: i32,
    tags: Vec<String>,
    recurring_pattern: Option<RecurrencePattern>,
    parent_task_id: Option<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning user.
    pub user_id: UserId,
    /// Task title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Due instant, if scheduled.
    pub due_date: Option<DateTime<Utc>>,
    /// Completion flag.
    pub completed: bool,
    /// Completion instant, set while `completed` is true.
    pub completed_at: Option<DateTime<Utc>>,
    /// Priority rank.
    pub priority: i32,
    /// Free-form labels.
    pub tags: Vec<String>,
    /// Recurrence rule, for repeating tasks.
    pub recurring_pattern: Option<RecurrencePattern>,
    /// Task this row was generated from, for recurrence instances.
    pub parent_task_id: Option<TaskId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Materialises a stored row from a creation payload.
    ///
    /// Storage adapters call this when inserting; the identifier and both
    /// timestamps are assigned here.
    #[must_use]
    pub fn from_new(new_task: NewTask, clock: &(impl Clock + ?Sized)) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            user_id: new_task.user_id,
            title: new_task.title,
            description: new_task.description,
            due_date: new_task.due_date,
            completed: false,
            completed_at: None,
            priority: new_task.priority,
            tags: new_task.tags,
            recurring_pattern: new_task.recurring_pattern,
            parent_task_id: new_task.parent_task_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            completed: data.completed,
            completed_at: data.completed_at,
            priority: data.priority,
            tags: data.tags,
            recurring_pattern: data.recurring_pattern,
            parent_task_id: data.parent_task_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the due instant, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the completion instant, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the priority rank.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the recurrence rule, if the task repeats.
    #[must_use]
    pub const fn recurring_pattern(&self) -> Option<&RecurrencePattern> {
        self.recurring_pattern.as_ref()
    }

    /// Returns the task this row was generated from, if any.
    #[must_use]
    pub const fn parent_task_id(&self) -> Option<TaskId> {
        self.parent_task_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Builds the creation payload for the next instance of this series.
    ///
    /// Title, description, priority, tags, owner and rule carry over; the new
    /// row points back here through `parent_task_id` and starts incomplete.
    #[must_use]
    pub fn next_instance(&self, due_date: DateTime<Utc>) -> NewTask {
        NewTask {
            user_id: self.user_id,
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: Some(due_date),
            priority: self.priority,
            tags: self.tags.clone(),
            recurring_pattern: self.recurring_pattern.clone(),
            parent_task_id: Some(self.id),
        }
    }

    /// Applies a partial update.
    ///
    /// Setting `completed` to `true` stamps `completed_at` unless the task was
    /// already complete; setting it to `false` clears the stamp.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the new title is blank or the new
    /// recurrence rule is invalid. The task is left untouched on error.
    pub fn apply(
        &mut self,
        update: TaskUpdate,
        clock: &(impl Clock + ?Sized),
    ) -> Result<(), TaskDomainError> {
        if let Some(title) = update.title.as_deref() {
            ensure_title(title)?;
        }
        if let Some(Some(pattern)) = update.recurring_pattern.as_ref() {
            pattern.validate()?;
        }

        let now = clock.utc();
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(pattern) = update.recurring_pattern {
            self.recurring_pattern = pattern;
        }
        match update.completed {
            Some(true) if !self.completed => {
                self.completed = true;
                self.completed_at = Some(now);
            }
            Some(false) => {
                self.completed = false;
                self.completed_at = None;
            }
            _ => {}
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Creation payload for a task row.
///
/// Carries no identifier or timestamps; storage assigns those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Owning user.
    pub user_id: UserId,
    /// Task title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Due instant, if scheduled.
    pub due_date: Option<DateTime<Utc>>,
    /// Priority rank.
    pub priority: i32,
    /// Free-form labels.
    pub tags: Vec<String>,
    /// Recurrence rule, for repeating tasks.
    pub recurring_pattern: Option<RecurrencePattern>,
    /// Task this row is generated from, for recurrence instances.
    pub parent_task_id: Option<TaskId>,
}

impl NewTask {
    /// Checks the payload before it is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title, or the
    /// recurrence rule's validation error.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        ensure_title(&self.title)?;
        self.recurring_pattern
            .as_ref()
            .map_or(Ok(()), RecurrencePattern::validate)
    }
}

/// Partial update of a task row.
///
/// `None` leaves a field unchanged. Nullable fields use a nested `Option`
/// so that `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<Option<String>>,
    /// Replacement due instant.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// New completion flag.
    pub completed: Option<bool>,
    /// Replacement priority.
    pub priority: Option<i32>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
    /// Replacement recurrence rule.
    pub recurring_pattern: Option<Option<RecurrencePattern>>,
}

impl TaskUpdate {
    /// Update that only marks the task as completed.
    #[must_use]
    pub fn complete() -> Self {
        Self {
            completed: Some(true),
            ..Self::default()
        }
    }

    /// Returns `true` when this update sets the completion flag.
    #[must_use]
    pub const fn marks_completed(&self) -> bool {
        matches!(self.completed, Some(true))
    }
}

fn ensure_title(title: &str) -> Result<(), TaskDomainError> {
    if title.trim().is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(())
}
