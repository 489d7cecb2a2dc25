//! Next-occurrence calculation for recurrence rules.
//!
//! Every function here is pure: the same base instant and rule always give
//! the same answer, and `None` means the series has no further occurrence.
//! The time of day of the base instant is carried through unchanged.

use super::{Frequency, RecurrencePattern};
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Number of days scanned when searching for the next selected weekday.
const WEEKDAY_SCAN_DAYS: u64 = 7;

/// Days per week used for interval-based weekly stepping.
const DAYS_PER_WEEK: u64 = 7;

/// How a day of the month that does not exist in the target month is handled
/// by monthly and yearly rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthDayPolicy {
    /// Lenient calendar arithmetic: the pinned day is applied to the base
    /// month first and the month advanced afterwards, with surplus days
    /// rolling into the following month (January 31 plus one month lands in
    /// early March). This matches rows produced by existing clients.
    #[default]
    Overflow,
    /// Advance the month or year first, then clamp the day to the length of
    /// the target month (January 31 plus one month is the last day of
    /// February).
    Clamp,
}

/// Returns the next occurrence after `base`, or `None` when the series ends.
///
/// Uses [`MonthDayPolicy::Overflow`].
#[must_use]
pub fn next_occurrence(
    base: DateTime<Utc>,
    pattern: &RecurrencePattern,
) -> Option<DateTime<Utc>> {
    next_occurrence_with_policy(base, pattern, MonthDayPolicy::Overflow)
}

/// Returns the next occurrence after `base` under the given month-day policy.
///
/// An occurrence falling exactly on the rule's end date is still returned;
/// only occurrences strictly later than it are suppressed. Unrecognized
/// frequencies and results outside the representable calendar give `None`.
#[must_use]
pub fn next_occurrence_with_policy(
    base: DateTime<Utc>,
    pattern: &RecurrencePattern,
    policy: MonthDayPolicy,
) -> Option<DateTime<Utc>> {
    let interval = pattern.effective_interval();
    let next = match pattern.frequency() {
        Frequency::Daily => base.checked_add_days(Days::new(u64::from(interval))),
        Frequency::Weekly if pattern.weekdays().is_empty() => {
            base.checked_add_days(Days::new(DAYS_PER_WEEK * u64::from(interval)))
        }
        Frequency::Weekly => next_selected_weekday(base, pattern.weekdays()),
        Frequency::Monthly => advance_months(base, interval, pattern.month_day(), policy),
        Frequency::Yearly => advance_years(base, interval, policy),
        Frequency::Unrecognized(_) => None,
    }?;

    if pattern.end_date().is_some_and(|end| next > end) {
        return None;
    }
    Some(next)
}

/// Returns up to `limit` successive occurrences following `base`.
///
/// Stops early when the series ends.
#[must_use]
pub fn upcoming_occurrences(
    base: DateTime<Utc>,
    pattern: &RecurrencePattern,
    policy: MonthDayPolicy,
    limit: usize,
) -> Vec<DateTime<Utc>> {
    std::iter::successors(
        next_occurrence_with_policy(base, pattern, policy),
        |previous| next_occurrence_with_policy(*previous, pattern, policy),
    )
    .take(limit)
    .collect()
}

/// Scans the seven days after `base` for the first selected weekday.
///
/// `base` itself is never selected, even when its weekday is in the set.
fn next_selected_weekday(base: DateTime<Utc>, weekdays: &[u8]) -> Option<DateTime<Utc>> {
    (1..=WEEKDAY_SCAN_DAYS).find_map(|offset| {
        let candidate = base.checked_add_days(Days::new(offset))?;
        let weekday = u8::try_from(candidate.weekday().num_days_from_sunday()).ok()?;
        weekdays.contains(&weekday).then_some(candidate)
    })
}

fn advance_months(
    base: DateTime<Utc>,
    interval: u32,
    month_day: Option<u8>,
    policy: MonthDayPolicy,
) -> Option<DateTime<Utc>> {
    let base_date = base.date_naive();
    // A stored day of 0 pins nothing.
    let pinned_day = month_day.filter(|day| *day > 0);
    let target = match policy {
        MonthDayPolicy::Overflow => {
            let anchor = match pinned_day {
                Some(day) => lenient_date(
                    base_date.year(),
                    i64::from(base_date.month0()),
                    i64::from(day),
                )?,
                None => base_date,
            };
            lenient_date(
                anchor.year(),
                i64::from(anchor.month0()) + i64::from(interval),
                i64::from(anchor.day()),
            )?
        }
        MonthDayPolicy::Clamp => {
            let first_of_month = base_date.with_day(1)?;
            let shifted = first_of_month.checked_add_months(Months::new(interval))?;
            let day = pinned_day.map_or(base_date.day(), u32::from);
            clamped_date(shifted.year(), shifted.month(), day)?
        }
    };
    Some(at_time_of(base, target))
}

fn advance_years(
    base: DateTime<Utc>,
    interval: u32,
    policy: MonthDayPolicy,
) -> Option<DateTime<Utc>> {
    let base_date = base.date_naive();
    let year = base_date.year().checked_add(i32::try_from(interval).ok()?)?;
    let target = match policy {
        MonthDayPolicy::Overflow => lenient_date(
            year,
            i64::from(base_date.month0()),
            i64::from(base_date.day()),
        )?,
        MonthDayPolicy::Clamp => clamped_date(year, base_date.month(), base_date.day())?,
    };
    Some(at_time_of(base, target))
}

/// Builds a date from a year, a zero-based month that may exceed 11, and a
/// day that may exceed the month length or fall below 1.
///
/// Out-of-range months carry into the year and out-of-range days carry into
/// neighbouring months, so `(2024, 1, 31)` is 2 March 2024 and `(2024, 2, 0)`
/// is 29 February 2024.
fn lenient_date(year: i32, month0: i64, day: i64) -> Option<NaiveDate> {
    let months_total = i64::from(year).checked_mul(12)?.checked_add(month0)?;
    let normalized_year = i32::try_from(months_total.div_euclid(12)).ok()?;
    let normalized_month = u32::try_from(months_total.rem_euclid(12)).ok()? + 1;
    let first_of_month = NaiveDate::from_ymd_opt(normalized_year, normalized_month, 1)?;
    first_of_month.checked_add_signed(TimeDelta::try_days(day.checked_sub(1)?)?)
}

/// Builds a date in the given month with `day` limited to the month length.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last_of_month = first_of_month
        .checked_add_months(Months::new(1))?
        .pred_opt()?;
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last_of_month.day()))
}

fn at_time_of(base: DateTime<Utc>, date: NaiveDate) -> DateTime<Utc> {
    date.and_time(base.time()).and_utc()
}
