//! Scheduler configuration.
//!
//! Settings can be built in code or loaded from a TOML table:
//!
//! ```toml
//! look_ahead_days = 7
//! month_day_policy = "overflow"
//! ```

use crate::task::domain::MonthDayPolicy;
use serde::Deserialize;
use thiserror::Error;

/// Default number of days before the due date at which the next instance of
/// a recurring task is generated.
pub const DEFAULT_LOOK_AHEAD_DAYS: i64 = 7;

/// Tunables for recurring-task scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// A completed task spawns its next instance when its due date is at most
    /// this many whole days away. Overdue tasks always qualify.
    pub look_ahead_days: i64,
    /// Handling of month days that do not exist in the target month.
    pub month_day_policy: MonthDayPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            look_ahead_days: DEFAULT_LOOK_AHEAD_DAYS,
            month_day_policy: MonthDayPolicy::Overflow,
        }
    }
}

impl SchedulerConfig {
    /// Configuration reproducing the dates existing clients compute.
    #[must_use]
    pub fn compatible() -> Self {
        Self::default()
    }

    /// Configuration that clamps month days instead of rolling them over.
    #[must_use]
    pub fn corrected() -> Self {
        Self {
            month_day_policy: MonthDayPolicy::Clamp,
            ..Self::default()
        }
    }

    /// Sets the look-ahead window.
    #[must_use]
    pub const fn with_look_ahead_days(mut self, days: i64) -> Self {
        self.look_ahead_days = days;
        self
    }

    /// Parses and validates a TOML document.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::NegativeLookAhead`] for a negative window.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NegativeLookAhead`] when `look_ahead_days` is
    /// below zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.look_ahead_days < 0 {
            return Err(ConfigError::NegativeLookAhead(self.look_ahead_days));
        }
        Ok(())
    }
}

/// Errors raised while loading a [`SchedulerConfig`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid TOML for this configuration.
    #[error("invalid scheduler configuration: {0}")]
    Parse(String),

    /// The look-ahead window is negative.
    #[error("look_ahead_days must not be negative, got {0}")]
    NegativeLookAhead(i64),
}
