//! Records flowing through the engine and the reports produced for them.

use crate::SourceError;
use serde::{Deserialize, Serialize};

/// One unit read from a record source.
///
/// A record either carries a raw body (typically one line of JSON) or the
/// terminal error that ended the source stream. A source emits at most one
/// `Failed` record and closes the stream right after it.
#[derive(Debug)]
pub enum Record {
    /// Raw record payload
    Body(Vec<u8>),
    /// Terminal read failure
    Failed(SourceError),
}

impl Record {
    /// Creates a record from a payload.
    pub fn body(bytes: impl Into<Vec<u8>>) -> Self {
        Record::Body(bytes.into())
    }

    /// Returns the payload, if this is not an error record.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Record::Body(bytes) => Some(bytes),
            Record::Failed(_) => None,
        }
    }

    /// Returns true if this record carries a source error.
    pub fn is_error(&self) -> bool {
        matches!(self, Record::Failed(_))
    }
}

impl From<SourceError> for Record {
    fn from(err: SourceError) -> Self {
        Record::Failed(err)
    }
}

/// Failures collected for a single record.
///
/// Only built when at least one rule failed; records that pass every rule
/// produce no report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Original record body as text
    pub message: String,

    /// Failure reasons in rule declaration order
    pub failures: Vec<String>,
}

impl FailureReport {
    /// Builds a report for `body`, or `None` when there are no failures.
    pub fn from_failures(body: &[u8], failures: Vec<String>) -> Option<Self> {
        if failures.is_empty() {
            return None;
        }
        Some(Self {
            message: String::from_utf8_lossy(body).into_owned(),
            failures,
        })
    }
}
