//! Rule definitions.
//!
//! A rule binds a dimension name to the record paths its field roles should
//! read from. Rule sets are loaded once at startup and shared read-only by
//! every processing task.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mapping from a dimension's field roles to path expressions.
///
/// Values are kept as raw JSON so a non-string entry surfaces as a config
/// error at evaluation time instead of rejecting the whole rule set.
pub type InputFields = Map<String, Value>;

/// A single rule: which dimension to run and where its inputs live.
///
/// # Example
///
/// ```rust
/// use profiling_core::Rule;
///
/// let rule: Rule = serde_json::from_str(
///     r#"{"dimension": "AgeValidity", "inputFields": {"age": "person.age"}}"#,
/// ).unwrap();
///
/// assert_eq!(rule.dimension, "AgeValidity");
/// assert_eq!(rule.path("age"), Some("person.age"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Name of the dimension to run (e.g. "Completeness", "BMIValidity")
    pub dimension: String,

    /// Field role to path mapping
    #[serde(default)]
    pub input_fields: InputFields,
}

impl Rule {
    /// Creates a new rule.
    pub fn new(dimension: impl Into<String>, input_fields: InputFields) -> Self {
        Self {
            dimension: dimension.into(),
            input_fields,
        }
    }

    /// Returns the path mapped to `role`, if it is a string.
    pub fn path(&self, role: &str) -> Option<&str> {
        self.input_fields.get(role).and_then(Value::as_str)
    }

    /// Returns the field roles declared by this rule.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.input_fields.keys().map(String::as_str)
    }
}
