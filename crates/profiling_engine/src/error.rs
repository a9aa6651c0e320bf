//! Error types for rule processing.

use profiling_core::{ConfigError, EvaluationError};
use thiserror::Error;

/// A single rule failure recorded against a record.
///
/// The `Display` output is what ends up in a report's failure list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// The rule's configuration does not fit the record
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The record failed the dimension's validity rule
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    /// The rule names a dimension that is not registered
    #[error("config error: unknown dimension '{0}'")]
    UnknownDimension(String),
}

impl ProfileError {
    /// Returns true for configuration problems (including unknown dimensions).
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnknownDimension(_))
    }
}

/// Failure to obtain a concurrency permit for a record.
///
/// Admission errors stop intake; they never abort records already dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// The run was cancelled
    #[error("run cancelled, no further records admitted")]
    Cancelled,

    /// The permit pool was closed
    #[error("permit pool closed")]
    Closed,
}
