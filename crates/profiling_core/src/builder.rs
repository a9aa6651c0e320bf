//! Builder pattern for creating rules.
//!
//! This module provides an ergonomic builder for constructing rules and rule
//! sets with a fluent API.

use crate::{InputFields, Rule};
use serde_json::Value;

/// Builder for creating a `Rule`.
///
/// # Example
///
/// ```rust
/// use profiling_core::RuleBuilder;
///
/// let rule = RuleBuilder::new("BMIValidity")
///     .field("weight", "body.weight")
///     .field("height", "body.height")
///     .field("bmi", "body.bmi")
///     .build();
///
/// assert_eq!(rule.path("height"), Some("body.height"));
/// ```
#[derive(Debug)]
pub struct RuleBuilder {
    dimension: String,
    input_fields: InputFields,
}

impl RuleBuilder {
    /// Creates a new rule builder for a dimension.
    pub fn new(dimension: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            input_fields: InputFields::new(),
        }
    }

    /// Maps a field role to a record path.
    pub fn field(mut self, role: impl Into<String>, path: impl Into<String>) -> Self {
        self.input_fields
            .insert(role.into(), Value::String(path.into()));
        self
    }

    /// Maps a field role to an arbitrary JSON value.
    ///
    /// Mostly useful for building deliberately malformed rules.
    pub fn raw_field(mut self, role: impl Into<String>, value: Value) -> Self {
        self.input_fields.insert(role.into(), value);
        self
    }

    /// Builds the rule.
    pub fn build(self) -> Rule {
        Rule::new(self.dimension, self.input_fields)
    }
}

/// Convenience constructors for the built-in dimensions.
impl RuleBuilder {
    /// A `Completeness` rule checking that `path` exists.
    pub fn completeness(path: impl Into<String>) -> Rule {
        Self::new("Completeness").field("emptyCheck", path).build()
    }

    /// A `NameValidity` rule reading the name from `path`.
    pub fn name_validity(path: impl Into<String>) -> Rule {
        Self::new("NameValidity").field("name", path).build()
    }

    /// An `AgeValidity` rule reading the age from `path`.
    pub fn age_validity(path: impl Into<String>) -> Rule {
        Self::new("AgeValidity").field("age", path).build()
    }

    /// A `GenderValidity` rule reading the gender from `path`.
    pub fn gender_validity(path: impl Into<String>) -> Rule {
        Self::new("GenderValidity").field("gender", path).build()
    }

    /// A `BMIValidity` rule reading weight, height and bmi from their paths.
    pub fn bmi_validity(
        weight: impl Into<String>,
        height: impl Into<String>,
        bmi: impl Into<String>,
    ) -> Rule {
        Self::new("BMIValidity")
            .field("weight", weight)
            .field("height", height)
            .field("bmi", bmi)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builder_fields() {
        let rule = RuleBuilder::new("NameValidity")
            .field("name", "person.first_name")
            .build();

        assert_eq!(rule.dimension, "NameValidity");
        assert_eq!(rule.path("name"), Some("person.first_name"));
    }

    #[test]
    fn test_raw_field() {
        let rule = RuleBuilder::new("AgeValidity")
            .raw_field("age", json!(["a", "b"]))
            .build();

        assert_eq!(rule.path("age"), None);
        assert_eq!(rule.input_fields.len(), 1);
    }

    #[test]
    fn test_shortcuts_match_builder() {
        assert_eq!(
            RuleBuilder::bmi_validity("w", "h", "b"),
            RuleBuilder::new("BMIValidity")
                .field("weight", "w")
                .field("height", "h")
                .field("bmi", "b")
                .build()
        );
        assert_eq!(RuleBuilder::completeness("name").path("emptyCheck"), Some("name"));
    }
}
