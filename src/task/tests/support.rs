//! Shared fixtures for task unit tests.

use crate::task::domain::{PersistedTaskData, RecurrencePattern, Task, TaskId, UserId};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Midnight UTC on the given calendar day.
pub fn utc_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    utc_at(year, month, day, 0, 0)
}

/// The given calendar day and time of day in UTC.
pub fn utc_at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid test timestamp")
}

/// A stored task with the given schedule and no completion.
pub fn stored_task(
    due_date: Option<DateTime<Utc>>,
    recurring_pattern: Option<RecurrencePattern>,
) -> Task {
    let created_at = utc_date(2024, 5, 1);
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        user_id: UserId::new(),
        title: "Water the plants".to_owned(),
        description: Some("Balcony and kitchen".to_owned()),
        due_date,
        completed: false,
        completed_at: None,
        priority: 2,
        tags: vec!["home".to_owned(), "weekly".to_owned()],
        recurring_pattern,
        parent_task_id: None,
        created_at,
        updated_at: created_at,
    })
}

/// A stored task already marked completed.
pub fn completed_task(
    due_date: Option<DateTime<Utc>>,
    recurring_pattern: Option<RecurrencePattern>,
) -> Task {
    let task = stored_task(due_date, recurring_pattern);
    let completed_at = utc_date(2024, 6, 1);
    Task::from_persisted(PersistedTaskData {
        id: task.id(),
        user_id: task.user_id(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        due_date: task.due_date(),
        completed: true,
        completed_at: Some(completed_at),
        priority: task.priority(),
        tags: task.tags().to_vec(),
        recurring_pattern: task.recurring_pattern().cloned(),
        parent_task_id: None,
        created_at: task.created_at(),
        updated_at: completed_at,
    })
}

/// Decodes a pattern from its stored JSON form.
pub fn pattern_from_json(value: serde_json::Value) -> RecurrencePattern {
    RecurrencePattern::try_from(value).expect("valid stored pattern")
}
