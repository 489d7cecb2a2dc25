//! Error types for task domain validation.

use thiserror::Error;

/// Errors returned while constructing or validating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The recurrence interval is zero.
    #[error("invalid recurrence interval {0}, expected a positive integer")]
    InvalidInterval(u32),

    /// A weekday lies outside `0..=6`.
    #[error("invalid weekday {0}, expected 0 (Sunday) through 6 (Saturday)")]
    InvalidWeekday(u8),

    /// A month day lies outside `1..=31`.
    #[error("invalid month day {0}, expected 1 through 31")]
    InvalidMonthDay(u8),

    /// A stored recurrence pattern could not be decoded.
    #[error("malformed recurrence pattern: {0}")]
    MalformedPattern(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
}
