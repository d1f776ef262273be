//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A numeric wire field held something that is not a number.
    #[error("invalid {field}: {value:?}")]
    NotANumber { field: &'static str, value: String },
}

/// Identifier of the "parent" of a top-level task.
pub const NO_PARENT: &str = "0";

/// Wire representation of an identifier.
///
/// The tasks endpoint sends IDs as integers, the entries endpoint as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

/// A validated task identifier.
///
/// Task IDs must be non-empty. They compare as exact strings, so `"12"` from
/// a time entry matches the integer `12` from a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::Empty { field: "task ID" });
        }
        Ok(Self(id))
    }

    /// The parent ID carried by top-level tasks.
    pub fn no_parent() -> Self {
        Self(NO_PARENT.to_string())
    }

    /// Returns true for the "no parent" sentinel.
    pub fn is_no_parent(&self) -> bool {
        self.0 == NO_PARENT
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        };
        Self::new(id).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<String> for TaskId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TaskId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wire representation of numbers and flags, which arrive as strings,
/// integers or booleans depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Bool(bool),
    Number(u64),
    Text(String),
}

/// Deserializes a `u32` sent either as a JSON number or a numeric string.
pub(crate) fn u32_from_wire<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match RawScalar::deserialize(deserializer)? {
        RawScalar::Number(n) => u32::try_from(n).map_err(serde::de::Error::custom),
        RawScalar::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(ValidationError::NotANumber {
                field: "level",
                value: text,
            })
        }),
        RawScalar::Bool(_) => Err(serde::de::Error::custom("expected a number, got a boolean")),
    }
}

/// Deserializes a 0/1 flag sent as a number, a string or a boolean.
///
/// Any non-zero number counts as set.
pub(crate) fn flag_from_wire<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match RawScalar::deserialize(deserializer)? {
        RawScalar::Bool(flag) => Ok(flag),
        RawScalar::Number(n) => Ok(n > 0),
        RawScalar::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(false);
            }
            trimmed.parse::<u64>().map(|n| n > 0).map_err(|_| {
                serde::de::Error::custom(ValidationError::NotANumber {
                    field: "flag",
                    value: text,
                })
            })
        }
    }
}
