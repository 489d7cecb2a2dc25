//! Application services for task workflows and recurrence.

mod lifecycle;
mod recurrence;

pub use lifecycle::{
    CreateTaskRequest, TaskService, TaskServiceError, TaskServiceResult, TaskUpdateOutcome,
};
pub use recurrence::{RecurrenceError, RecurrenceResult, RecurrenceService, should_spawn_next};
