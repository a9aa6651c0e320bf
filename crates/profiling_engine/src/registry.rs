//! Dimension registry.
//!
//! Maps the dimension names used in rules to their implementations. The
//! registry is assembled once before processing starts and is read-only
//! afterwards, so it can be shared across tasks behind an `Arc` without locks.

use crate::{ProfileError, Validator};
use profiling_core::{
    ConfigError, Dimension, FieldRequirement, Rule, ValidationContext, validator::is_path_shaped,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dimensions::{AgeValidity, BmiValidity, Completeness, GenderValidity, NameValidity};

/// What to do with a rule whose dimension is not registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownDimensionPolicy {
    /// Ignore the rule for every record (a warning is logged once per rule)
    #[default]
    Skip,
    /// Record a config failure against every record
    Fail,
}

/// A problem found by statically checking a rule against the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleIssue {
    /// The rule's dimension is not registered
    UnknownDimension(String),
    /// The rule's `inputFields` mapping does not fit the dimension
    Config(ConfigError),
}

impl fmt::Display for RuleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleIssue::UnknownDimension(name) => write!(f, "unknown dimension '{}'", name),
            RuleIssue::Config(err) => write!(f, "{}", err),
        }
    }
}

/// Registry of available dimensions, keyed by name.
///
/// # Example
///
/// ```rust
/// use profiling_engine::DimensionRegistry;
///
/// let registry = DimensionRegistry::with_defaults();
/// assert!(registry.lookup("BMIValidity").is_some());
/// assert!(registry.lookup("Freshness").is_none());
/// ```
#[derive(Clone, Default)]
pub struct DimensionRegistry {
    dimensions: HashMap<String, Arc<dyn Dimension>>,
}

impl DimensionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in dimension.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(Completeness)
            .register(NameValidity)
            .register(AgeValidity)
            .register(GenderValidity)
            .register(BmiValidity)
    }

    /// Adds a dimension, replacing any previous one with the same name.
    pub fn register(mut self, dimension: impl Dimension + 'static) -> Self {
        let dimension: Arc<dyn Dimension> = Arc::new(dimension);
        self.dimensions
            .insert(dimension.name().to_string(), dimension);
        self
    }

    /// Returns the dimension registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&dyn Dimension> {
        self.dimensions.get(name).map(|dimension| dimension.as_ref())
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.dimensions.contains_key(name)
    }

    /// Returns the registered dimension names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dimensions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the field requirements of a registered dimension.
    pub fn requirements(&self, name: &str) -> Option<&[FieldRequirement]> {
        self.lookup(name).map(|dimension| dimension.requirements())
    }

    /// Returns the number of registered dimensions.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns true if no dimension is registered.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Builds a validator for one (record, rule) pair.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::UnknownDimension` when the rule's dimension is
    /// not registered. Callers decide whether that is skipped or reported.
    pub fn validator<'r, 'a>(
        &'r self,
        rule: &Rule,
        context: ValidationContext<'a>,
    ) -> Result<Validator<'r, 'a>, ProfileError> {
        self.lookup(&rule.dimension)
            .map(|dimension| Validator::new(dimension, context))
            .ok_or_else(|| ProfileError::UnknownDimension(rule.dimension.clone()))
    }

    /// Checks a rule's shape without a record.
    ///
    /// Reports an unknown dimension, missing field roles and role values that
    /// are not path expressions. Record-dependent problems (missing paths,
    /// wrong types) can only be found during processing.
    pub fn check_rule(&self, rule: &Rule) -> Vec<RuleIssue> {
        let Some(dimension) = self.lookup(&rule.dimension) else {
            return vec![RuleIssue::UnknownDimension(rule.dimension.clone())];
        };

        dimension
            .requirements()
            .iter()
            .filter_map(|requirement| {
                let role = requirement.role;
                match rule.input_fields.get(role) {
                    None => Some(RuleIssue::Config(ConfigError::missing_role(role))),
                    Some(value) if !value.as_str().is_some_and(is_path_shaped) => {
                        Some(RuleIssue::Config(ConfigError::NotAPath {
                            role: role.to_string(),
                            value: value.to_string(),
                        }))
                    }
                    Some(_) => None,
                }
            })
            .collect()
    }
}

impl fmt::Debug for DimensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DimensionRegistry")
            .field("dimensions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use profiling_core::{CheckedFields, EvaluationError, RuleBuilder};
    use serde_json::json;

    struct AlwaysValid;

    impl Dimension for AlwaysValid {
        fn name(&self) -> &str {
            "AlwaysValid"
        }

        fn requirements(&self) -> &[FieldRequirement] {
            &[]
        }

        fn evaluate(&self, _fields: &CheckedFields<'_>) -> Result<(), EvaluationError> {
            Ok(())
        }
    }

    #[test]
    fn test_defaults() {
        let registry = DimensionRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec![
                "AgeValidity",
                "BMIValidity",
                "Completeness",
                "GenderValidity",
                "NameValidity"
            ]
        );
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.requirements("BMIValidity").map(<[_]>::len), Some(3));
    }

    #[test]
    fn test_register_custom_dimension() {
        let registry = DimensionRegistry::with_defaults().register(AlwaysValid);
        assert!(registry.contains("AlwaysValid"));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_unknown_lookup() {
        let registry = DimensionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("Completeness").is_none());

        let rule = RuleBuilder::completeness("name");
        let record = json!({"name": "John"});
        let context = ValidationContext::new(&record, &rule.input_fields);
        let err = registry.validator(&rule, context).unwrap_err();
        assert_eq!(err, ProfileError::UnknownDimension("Completeness".to_string()));
    }

    #[test]
    fn test_check_rule() {
        let registry = DimensionRegistry::with_defaults();

        assert!(registry.check_rule(&RuleBuilder::age_validity("age")).is_empty());

        let unknown = RuleBuilder::new("Freshness").build();
        assert_eq!(
            registry.check_rule(&unknown),
            vec![RuleIssue::UnknownDimension("Freshness".to_string())]
        );

        let broken = RuleBuilder::new("BMIValidity")
            .field("weight", "weight")
            .raw_field("height", json!(1.8))
            .build();
        let issues = registry.check_rule(&broken);
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0].to_string(),
            "input field 'height' is not a path string: 1.8"
        );
        assert_eq!(issues[1], RuleIssue::Config(ConfigError::missing_role("bmi")));
    }

    #[test]
    fn test_keys_with_spaces_need_escaping() {
        let registry = DimensionRegistry::with_defaults();

        assert!(registry.check_rule(&RuleBuilder::name_validity("first\\ name")).is_empty());
        assert_eq!(
            registry.check_rule(&RuleBuilder::name_validity("first name")),
            vec![RuleIssue::Config(ConfigError::NotAPath {
                role: "name".to_string(),
                value: r#""first name""#.to_string(),
            })]
        );

        let rule = RuleBuilder::name_validity("first\\ name");
        let record = json!({"first name": "Ada"});
        let context = ValidationContext::new(&record, &rule.input_fields);
        assert_eq!(registry.validator(&rule, context).unwrap().run(), Ok(()));
    }
}
