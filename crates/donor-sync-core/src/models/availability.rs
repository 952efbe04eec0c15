//! Weekly availability windows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Last representable minute of a day (23:59).
pub const MAX_MINUTE_OF_DAY: u16 = 24 * 60 - 1;

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Errors converting between `HH:MM` and minutes since midnight.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Expected HH:MM, got {0:?}")]
    Format(String),

    #[error("Time out of range: {0:?}")]
    OutOfRange(String),
}

/// One availability window. A donor may hold several per weekday.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    /// 0 = Sunday ... 6 = Saturday
    pub weekday: u8,
    /// Start, minutes since midnight
    pub time_from_min: u16,
    /// End, minutes since midnight
    pub time_to_min: u16,
}

impl AvailabilitySlot {
    pub fn new(weekday: u8, time_from_min: u16, time_to_min: u16) -> Self {
        Self {
            weekday,
            time_from_min,
            time_to_min,
        }
    }

    /// Start strictly before end.
    pub fn is_well_ordered(&self) -> bool {
        self.time_from_min < self.time_to_min
    }

    /// Weekday and both bounds inside their domains.
    pub fn is_in_range(&self) -> bool {
        self.weekday <= 6
            && self.time_from_min <= MAX_MINUTE_OF_DAY
            && self.time_to_min <= MAX_MINUTE_OF_DAY
    }

    pub fn weekday_name(&self) -> Option<&'static str> {
        WEEKDAY_NAMES.get(self.weekday as usize).copied()
    }

    pub fn start_hhmm(&self) -> String {
        minutes_to_hhmm(self.time_from_min)
    }

    pub fn end_hhmm(&self) -> String {
        minutes_to_hhmm(self.time_to_min)
    }
}

/// Format minutes since midnight as zero-padded `HH:MM`.
pub fn minutes_to_hhmm(minutes: u16) -> String {
    let minutes = minutes.min(MAX_MINUTE_OF_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse `H:MM` or `HH:MM` into minutes since midnight.
pub fn hhmm_to_minutes(value: &str) -> Result<u16, TimeParseError> {
    let trimmed = value.trim();
    let (hours, minutes) = trimmed
        .split_once(':')
        .ok_or_else(|| TimeParseError::Format(value.to_string()))?;

    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return Err(TimeParseError::Format(value.to_string()));
    }

    let hours: u16 = hours
        .parse()
        .map_err(|_| TimeParseError::Format(value.to_string()))?;
    let minutes: u16 = minutes
        .parse()
        .map_err(|_| TimeParseError::Format(value.to_string()))?;

    if hours > 23 || minutes > 59 {
        return Err(TimeParseError::OutOfRange(value.to_string()));
    }

    Ok(hours * 60 + minutes)
}
