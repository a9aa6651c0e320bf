//! Per-record validator enforcing the two-phase protocol.
//!
//! A [`Validator`] pairs a dimension with one record's context. Its config
//! check consumes it and yields a [`ConfiguredValidator`], the only type able
//! to evaluate, so evaluation cannot run before a successful config check.

use crate::ProfileError;
use profiling_core::{CheckedFields, ConfigError, Dimension, ValidationContext, Verdict};
use std::fmt;

/// A dimension bound to one (record, rule) pair, not yet checked.
pub struct Validator<'r, 'a> {
    dimension: &'r dyn Dimension,
    context: ValidationContext<'a>,
}

impl<'r, 'a> Validator<'r, 'a> {
    /// Creates a validator for `dimension` over `context`.
    pub fn new(dimension: &'r dyn Dimension, context: ValidationContext<'a>) -> Self {
        Self { dimension, context }
    }

    /// Returns the dimension's name.
    pub fn dimension(&self) -> &str {
        self.dimension.name()
    }

    /// Phase one: checks the rule's configuration against the record.
    pub fn check_config(self) -> Result<ConfiguredValidator<'r, 'a>, ConfigError> {
        let fields = self.dimension.check_config(&self.context)?;
        Ok(ConfiguredValidator {
            dimension: self.dimension,
            fields,
        })
    }

    /// Runs both phases and returns the first failure, if any.
    pub fn run(self) -> Result<(), ProfileError> {
        match self.check_config()?.evaluate() {
            Verdict::Valid => Ok(()),
            Verdict::Invalid(reason) => Err(ProfileError::Evaluation(reason)),
        }
    }
}

impl fmt::Debug for Validator<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("dimension", &self.dimension.name())
            .field("input_fields", self.context.input_fields())
            .finish()
    }
}

/// A validator whose configuration passed the check.
pub struct ConfiguredValidator<'r, 'a> {
    dimension: &'r dyn Dimension,
    fields: CheckedFields<'a>,
}

impl<'r, 'a> ConfiguredValidator<'r, 'a> {
    /// Returns the checked field bindings.
    pub fn fields(&self) -> &CheckedFields<'a> {
        &self.fields
    }

    /// Phase two: applies the dimension's validity rule.
    pub fn evaluate(self) -> Verdict {
        Verdict::from(self.dimension.evaluate(&self.fields))
    }
}

impl fmt::Debug for ConfiguredValidator<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredValidator")
            .field("dimension", &self.dimension.name())
            .field("fields", &self.fields)
            .finish()
    }
}
