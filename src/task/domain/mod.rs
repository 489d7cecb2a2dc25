//! Domain model for recurring task scheduling.
//!
//! Tasks, their recurrence rules, and the pure next-occurrence calculation
//! live here. Storage and orchestration stay outside the domain boundary.

mod error;
mod ids;
mod occurrence;
mod recurrence;
mod task;

pub use error::TaskDomainError;
pub use ids::{TaskId, UserId};
pub use occurrence::{
    MonthDayPolicy, next_occurrence, next_occurrence_with_policy, upcoming_occurrences,
};
pub use recurrence::{Frequency, RecurrencePattern};
pub use task::{NewTask, PersistedTaskData, Task, TaskUpdate};
