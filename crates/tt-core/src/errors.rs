//! Structured error types shared across the timetable crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`TimetableError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (course ids, section ids, paths, ...).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the timetable engine.
///
/// Infeasible requests, cache misses and early cancellation are not errors;
/// they are reported through the search status and `Option` results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum TimetableError {
    /// Malformed sections, slots, requests or policies.
    #[error("data error: {0}")]
    Data(ErrorInfo),
    /// Search runtime failures (worker pool construction).
    #[error("search error: {0}")]
    Search(ErrorInfo),
    /// Cache backend failures on write or maintenance.
    #[error("cache error: {0}")]
    Cache(ErrorInfo),
    /// History log failures.
    #[error("history error: {0}")]
    History(ErrorInfo),
    /// Engine configuration errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl TimetableError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            TimetableError::Data(info)
            | TimetableError::Search(info)
            | TimetableError::Cache(info)
            | TimetableError::History(info)
            | TimetableError::Config(info)
            | TimetableError::Serde(info) => info,
        }
    }

    /// Shorthand for a [`TimetableError::Data`] error.
    pub fn data(code: impl Into<String>, message: impl Into<String>) -> Self {
        TimetableError::Data(ErrorInfo::new(code, message))
    }

    /// Returns true for errors caused by malformed input data.
    pub fn is_data(&self) -> bool {
        matches!(self, TimetableError::Data(_))
    }
}
