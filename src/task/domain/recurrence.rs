//! Recurrence rules attached to repeating tasks.

use super::TaskDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest weekday value accepted in a weekly rule (Saturday).
const MAX_WEEKDAY: u8 = 6;

/// Valid range for a pinned day of the month.
const MONTH_DAY_RANGE: std::ops::RangeInclusive<u8> = 1..=31;

/// How often a recurring task repeats.
///
/// Stored rows carry the frequency as a free-form string. Values outside the
/// four supported units are kept verbatim as [`Frequency::Unrecognized`] so
/// that a row round-trips unchanged; such rules never produce an occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    /// Repeats every `interval` days.
    Daily,
    /// Repeats every `interval` weeks, or on selected weekdays.
    Weekly,
    /// Repeats every `interval` months.
    Monthly,
    /// Repeats every `interval` years.
    Yearly,
    /// A stored value this crate does not understand.
    Unrecognized(String),
}

impl Frequency {
    /// Returns the canonical storage representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Returns the plural unit name shown next to an interval.
    ///
    /// Unrecognized frequencies have no unit and return `None`.
    #[must_use]
    pub const fn unit_label(&self) -> Option<&'static str> {
        match self {
            Self::Daily => Some("days"),
            Self::Weekly => Some("weeks"),
            Self::Monthly => Some("months"),
            Self::Yearly => Some("years"),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns `true` for the four supported frequencies.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        match value.as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for Frequency {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        match value {
            Frequency::Unrecognized(raw) => raw,
            recognized => recognized.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recurrence rule attached to a task.
///
/// The serialised form matches the JSON column used by task storage:
/// `frequency`, `interval`, `weekdays`, `monthDay` and `endDate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePattern {
    frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interval: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "nullable_weekdays"
    )]
    weekdays: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    month_day: Option<u8>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "end_date_format"
    )]
    end_date: Option<DateTime<Utc>>,
}

impl RecurrencePattern {
    /// Creates a rule repeating every single unit of `frequency`.
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: Some(1),
            weekdays: Vec::new(),
            month_day: None,
            end_date: None,
        }
    }

    /// Convenience constructor for [`Frequency::Daily`].
    #[must_use]
    pub const fn daily() -> Self {
        Self::new(Frequency::Daily)
    }

    /// Convenience constructor for [`Frequency::Weekly`].
    #[must_use]
    pub const fn weekly() -> Self {
        Self::new(Frequency::Weekly)
    }

    /// Convenience constructor for [`Frequency::Monthly`].
    #[must_use]
    pub const fn monthly() -> Self {
        Self::new(Frequency::Monthly)
    }

    /// Convenience constructor for [`Frequency::Yearly`].
    #[must_use]
    pub const fn yearly() -> Self {
        Self::new(Frequency::Yearly)
    }

    /// Sets the number of frequency units between occurrences.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidInterval`] when `interval` is zero.
    pub fn with_interval(mut self, interval: u32) -> Result<Self, TaskDomainError> {
        if interval == 0 {
            return Err(TaskDomainError::InvalidInterval(interval));
        }
        self.interval = Some(interval);
        Ok(self)
    }

    /// Adds `weekday` to the selected set, or removes it when present.
    ///
    /// The set stays sorted and free of duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidWeekday`] when `weekday` exceeds 6.
    pub fn toggle_weekday(mut self, weekday: u8) -> Result<Self, TaskDomainError> {
        if weekday > MAX_WEEKDAY {
            return Err(TaskDomainError::InvalidWeekday(weekday));
        }
        if let Some(position) = self.weekdays.iter().position(|day| *day == weekday) {
            self.weekdays.remove(position);
        } else {
            self.weekdays.push(weekday);
            self.weekdays.sort_unstable();
            self.weekdays.dedup();
        }
        Ok(self)
    }

    /// Replaces the selected weekdays.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidWeekday`] for the first value above 6.
    pub fn with_weekdays(
        mut self,
        weekdays: impl IntoIterator<Item = u8>,
    ) -> Result<Self, TaskDomainError> {
        let mut selected: Vec<u8> = weekdays.into_iter().collect();
        if let Some(invalid) = selected.iter().find(|day| **day > MAX_WEEKDAY) {
            return Err(TaskDomainError::InvalidWeekday(*invalid));
        }
        selected.sort_unstable();
        selected.dedup();
        self.weekdays = selected;
        Ok(self)
    }

    /// Pins monthly occurrences to a day of the month.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidMonthDay`] outside `1..=31`.
    pub fn with_month_day(mut self, month_day: u8) -> Result<Self, TaskDomainError> {
        if !MONTH_DAY_RANGE.contains(&month_day) {
            return Err(TaskDomainError::InvalidMonthDay(month_day));
        }
        self.month_day = Some(month_day);
        Ok(self)
    }

    /// Sets the instant after which the series produces no occurrence.
    #[must_use]
    pub fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Checks the invariants of a rule loaded from storage.
    ///
    /// An unrecognized frequency is not a validation failure; it simply
    /// never yields an occurrence.
    ///
    /// # Errors
    ///
    /// Returns the [`TaskDomainError`] for the first violated invariant.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        if self.interval == Some(0) {
            return Err(TaskDomainError::InvalidInterval(0));
        }
        if let Some(invalid) = self.weekdays.iter().find(|day| **day > MAX_WEEKDAY) {
            return Err(TaskDomainError::InvalidWeekday(*invalid));
        }
        match self.month_day {
            Some(day) if !MONTH_DAY_RANGE.contains(&day) => {
                Err(TaskDomainError::InvalidMonthDay(day))
            }
            _ => Ok(()),
        }
    }

    /// Returns the rule frequency.
    #[must_use]
    pub const fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    /// Returns the stored interval, if any.
    #[must_use]
    pub const fn interval(&self) -> Option<u32> {
        self.interval
    }

    /// Returns the interval used for stepping: absent or zero counts as 1.
    #[must_use]
    pub fn effective_interval(&self) -> u32 {
        self.interval.filter(|interval| *interval > 0).unwrap_or(1)
    }

    /// Returns the selected weekdays (0 = Sunday).
    #[must_use]
    pub fn weekdays(&self) -> &[u8] {
        &self.weekdays
    }

    /// Returns the pinned day of the month, if any.
    #[must_use]
    pub const fn month_day(&self) -> Option<u8> {
        self.month_day
    }

    /// Returns the series end instant, if any.
    #[must_use]
    pub const fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }
}

impl TryFrom<serde_json::Value> for RecurrencePattern {
    type Error = TaskDomainError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
            .map_err(|err| TaskDomainError::MalformedPattern(err.to_string()))
    }
}

/// Reads `weekdays`, treating an explicit `null` as no selection.
fn nullable_weekdays<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<u8>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde adapter for `endDate`, which storage holds either as a full RFC 3339
/// timestamp or as a bare `YYYY-MM-DD` date meaning midnight UTC. A blank
/// string is read as no end date.
mod end_date_format {
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) => {
                serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.filter(|text| !text.trim().is_empty())
            .map(|text| {
                parse(&text).ok_or_else(|| D::Error::custom(format!("invalid endDate '{text}'")))
            })
            .transpose()
    }

    fn parse(text: &str) -> Option<DateTime<Utc>> {
        let trimmed = text.trim();
        DateTime::parse_from_rfc3339(trimmed)
            .map(|instant| instant.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|midnight| midnight.and_utc())
            })
    }
}
