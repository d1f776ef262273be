//! Recorded time entries as delivered by the `/entries` endpoint.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{TaskId, flag_from_wire};

/// Date format used by the service for entry dates and query ranges.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A time entry's duration field is not a non-negative whole number of seconds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid duration {value:?} on time entry {entry_id}")]
pub struct DurationParseError {
    pub entry_id: u64,
    pub value: String,
}

/// A time entry's date field is not a `YYYY-MM-DD` date.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid date {value:?} on time entry {entry_id}")]
pub struct DateParseError {
    pub entry_id: u64,
    pub value: String,
}

/// A recorded duration attached to exactly one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: u64,

    pub task_id: TaskId,

    /// Seconds, string-encoded. See [`TimeEntry::duration`].
    pub duration: String,

    #[serde(default, deserialize_with = "flag_from_wire")]
    pub billable: bool,

    /// `YYYY-MM-DD`. See [`TimeEntry::date`].
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub user_name: String,

    #[serde(default)]
    pub description: String,
}

impl TimeEntry {
    /// Creates an entry with no date, user or description.
    pub fn new(id: u64, task_id: TaskId, duration: impl Into<String>, billable: bool) -> Self {
        Self {
            id,
            task_id,
            duration: duration.into(),
            billable,
            date: String::new(),
            user_name: String::new(),
            description: String::new(),
        }
    }

    /// Parses the string-encoded duration.
    pub fn duration(&self) -> Result<Duration, DurationParseError> {
        self.duration
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| DurationParseError {
                entry_id: self.id,
                value: self.duration.clone(),
            })
    }

    /// Parses the entry date.
    pub fn date(&self) -> Result<NaiveDate, DateParseError> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).map_err(|_| DateParseError {
            entry_id: self.id,
            value: self.date.clone(),
        })
    }

    pub const fn is_billable(&self) -> bool {
        self.billable
    }

    /// True if the description holds more than spaces.
    pub fn has_description(&self) -> bool {
        !self.description.trim_matches(' ').is_empty()
    }
}
