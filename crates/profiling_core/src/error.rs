//! Error types for rule evaluation.
//!
//! This module defines the errors a dimension can raise while checking a rule's
//! configuration against a record, the errors raised when a record fails a
//! dimension's validity rule, and the terminal errors a record source can emit.

use crate::FieldKind;
use thiserror::Error;

/// A rule's `inputFields` mapping does not fit the dimension or the record.
///
/// Config errors are non-fatal: the engine records them as one failure entry
/// and moves on to the next rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A field role required by the dimension is absent from `inputFields`
    #[error("input field '{role}' is missing")]
    MissingRole {
        /// Field role expected by the dimension
        role: String,
    },

    /// The value mapped to a field role is not a usable path expression
    #[error("input field '{role}' is not a path string: {value}")]
    NotAPath {
        /// Field role expected by the dimension
        role: String,
        /// The offending value, rendered as JSON
        value: String,
    },

    /// The path does not exist in the record
    #[error("field '{path}' for '{role}' is missing")]
    FieldMissing {
        /// Field role expected by the dimension
        role: String,
        /// Path the role points at
        path: String,
    },

    /// The path exists but holds a value of the wrong type
    #[error("field '{path}' for '{role}' is not a {expected} (found {actual})")]
    WrongType {
        /// Field role expected by the dimension
        role: String,
        /// Path the role points at
        path: String,
        /// Type required by the dimension
        expected: FieldKind,
        /// Type found in the record
        actual: FieldKind,
    },
}

impl ConfigError {
    /// Creates a new missing role error.
    pub fn missing_role(role: impl Into<String>) -> Self {
        Self::MissingRole { role: role.into() }
    }

    /// Creates a new missing field error.
    pub fn field_missing(role: impl Into<String>, path: impl Into<String>) -> Self {
        Self::FieldMissing {
            role: role.into(),
            path: path.into(),
        }
    }

    /// Returns the field role this error refers to.
    pub fn role(&self) -> &str {
        match self {
            Self::MissingRole { role }
            | Self::NotAPath { role, .. }
            | Self::FieldMissing { role, .. }
            | Self::WrongType { role, .. } => role,
        }
    }
}

/// A record's field values fail a dimension's validity rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// String value is empty
    #[error("{path} value is empty")]
    Empty { path: String },

    /// String value contains characters outside `a-z` (case-folded)
    #[error("{path} has invalid characters")]
    InvalidCharacters { path: String },

    /// Numeric value is below zero
    #[error("{path} value is negative")]
    Negative { path: String },

    /// Value is not in the allowed set
    #[error("{path} value '{value}' is not one of [{allowed}]")]
    NotAllowed {
        path: String,
        value: String,
        allowed: String,
    },

    /// Numeric value must be strictly positive
    #[error("{path} value is not positive")]
    NotPositive { path: String },

    /// Declared BMI does not match weight / height²
    #[error("{path} value {actual} is not equal to weight / (height * height) = {expected}")]
    BmiMismatch {
        path: String,
        actual: f64,
        expected: f64,
    },

    /// The checked fields carry no value of the requested type for a role.
    ///
    /// Only reachable when a dimension asks for a role it did not declare.
    #[error("no checked {expected} value for '{role}'")]
    Unresolved { role: String, expected: FieldKind },
}

/// The record source could not produce further data.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The backing store could not be opened
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from the backing store failed mid-stream
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_and_wrong_type_messages_differ() {
        let missing = ConfigError::field_missing("age", "person.age");
        let wrong = ConfigError::WrongType {
            role: "age".to_string(),
            path: "person.age".to_string(),
            expected: FieldKind::Number,
            actual: FieldKind::String,
        };

        assert_eq!(missing.to_string(), "field 'person.age' for 'age' is missing");
        assert_eq!(
            wrong.to_string(),
            "field 'person.age' for 'age' is not a number (found string)"
        );
        assert_eq!(missing.role(), "age");
    }

    #[test]
    fn test_evaluation_messages() {
        let err = EvaluationError::Empty {
            path: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name value is empty");

        let err = EvaluationError::NotAllowed {
            path: "gender".to_string(),
            value: "X".to_string(),
            allowed: "M, F".to_string(),
        };
        assert_eq!(err.to_string(), "gender value 'X' is not one of [M, F]");
    }
}
