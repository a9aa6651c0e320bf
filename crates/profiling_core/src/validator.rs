//! Dimension traits and the two-phase validation protocol.
//!
//! Every dimension is checked in two phases:
//!
//! 1. **Config check**: each field role the dimension requires must be mapped
//!    by the rule to a path that exists in the record with the expected type.
//!    A successful check yields [`CheckedFields`].
//! 2. **Evaluation**: the dimension applies its validity rule to the checked
//!    fields and produces a [`Verdict`].
//!
//! `CheckedFields` can only be produced by [`ValidationContext::check_all`],
//! so evaluation cannot run on an unchecked configuration.

use crate::accessor::{self, FieldKind, Resolved};
use crate::{ConfigError, EvaluationError, InputFields};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Dot-separated segments, no bare whitespace, no empty segments. `\x`
/// escapes any character, so `first\ name` addresses the key `"first name"`.
static PATH_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^.\s\\]|\\.)+(?:\.(?:[^.\s\\]|\\.)+)*$").expect("path regex is valid")
});

/// Returns true if `path` is a well-formed path expression.
pub fn is_path_shaped(path: &str) -> bool {
    PATH_SHAPE.is_match(path)
}

/// Type a dimension expects at a field role's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Any value, including `null`; only presence is checked
    Any,
    /// A JSON string
    String,
    /// A JSON number
    Number,
}

impl Expect {
    /// Returns the concrete kind required, or `None` for [`Expect::Any`].
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Expect::Any => None,
            Expect::String => Some(FieldKind::String),
            Expect::Number => Some(FieldKind::Number),
        }
    }
}

/// A field role required by a dimension and the type it must resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRequirement {
    /// Field role name as it appears in `inputFields`
    pub role: &'static str,
    /// Expected type at the resolved path
    pub expect: Expect,
}

impl FieldRequirement {
    /// A role whose path only has to exist.
    pub const fn any(role: &'static str) -> Self {
        Self {
            role,
            expect: Expect::Any,
        }
    }

    /// A role whose path must hold a string.
    pub const fn string(role: &'static str) -> Self {
        Self {
            role,
            expect: Expect::String,
        }
    }

    /// A role whose path must hold a number.
    pub const fn number(role: &'static str) -> Self {
        Self {
            role,
            expect: Expect::Number,
        }
    }
}

/// Inputs for evaluating one rule against one record.
///
/// Created fresh for every (record, rule) pair and borrowed only by the
/// validator handling that pair.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    record: &'a Value,
    input_fields: &'a InputFields,
}

impl<'a> ValidationContext<'a> {
    /// Creates a new validation context.
    pub fn new(record: &'a Value, input_fields: &'a InputFields) -> Self {
        Self {
            record,
            input_fields,
        }
    }

    /// Returns the parsed record.
    pub fn record(&self) -> &'a Value {
        self.record
    }

    /// Returns the rule's role to path mapping.
    pub fn input_fields(&self) -> &'a InputFields {
        self.input_fields
    }

    /// Returns the path mapped to `role` without touching the record.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRole` when the role is not mapped and
    /// `ConfigError::NotAPath` when the mapped value is not a path string.
    pub fn path(&self, role: &str) -> Result<&'a str, ConfigError> {
        let raw = self
            .input_fields
            .get(role)
            .ok_or_else(|| ConfigError::missing_role(role))?;

        match raw.as_str() {
            Some(path) if is_path_shaped(path) => Ok(path),
            _ => Err(ConfigError::NotAPath {
                role: role.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Checks a single requirement against the rule and the record.
    pub fn check(&self, requirement: &FieldRequirement) -> Result<ResolvedField<'a>, ConfigError> {
        let role = requirement.role;
        let path = self.path(role)?;

        let (kind, value) = match accessor::resolve(self.record, path) {
            Resolved::Missing => return Err(ConfigError::field_missing(role, path)),
            Resolved::Present { kind, value } => (kind, value),
        };

        match requirement.expect.kind() {
            Some(expected) if expected != kind => Err(ConfigError::WrongType {
                role: role.to_string(),
                path: path.to_string(),
                expected,
                actual: kind,
            }),
            _ => Ok(ResolvedField { role, path, value }),
        }
    }

    /// Checks all requirements in order, stopping at the first failure.
    pub fn check_all(
        &self,
        requirements: &[FieldRequirement],
    ) -> Result<CheckedFields<'a>, ConfigError> {
        let fields = requirements
            .iter()
            .map(|requirement| self.check(requirement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CheckedFields { fields })
    }
}

/// A field role bound to its path and the value found there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedField<'a> {
    /// Field role name
    pub role: &'static str,
    /// Path expression from the rule
    pub path: &'a str,
    /// Value found in the record
    pub value: &'a Value,
}

/// Field bindings that passed the config check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedFields<'a> {
    fields: Vec<ResolvedField<'a>>,
}

impl<'a> CheckedFields<'a> {
    /// Returns the binding for `role`.
    pub fn get(&self, role: &str) -> Option<&ResolvedField<'a>> {
        self.fields.iter().find(|field| field.role == role)
    }

    /// Returns the path and string value bound to `role`.
    pub fn string(&self, role: &str) -> Result<(&'a str, &'a str), EvaluationError> {
        self.get(role)
            .and_then(|field| field.value.as_str().map(|s| (field.path, s)))
            .ok_or_else(|| EvaluationError::Unresolved {
                role: role.to_string(),
                expected: FieldKind::String,
            })
    }

    /// Returns the path and numeric value bound to `role`.
    pub fn number(&self, role: &str) -> Result<(&'a str, f64), EvaluationError> {
        self.get(role)
            .and_then(|field| field.value.as_f64().map(|n| (field.path, n)))
            .ok_or_else(|| EvaluationError::Unresolved {
                role: role.to_string(),
                expected: FieldKind::Number,
            })
    }

    /// Iterates over the bindings in requirement order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedField<'a>> {
        self.fields.iter()
    }
}

/// Result of evaluating a dimension against one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The record satisfies the dimension
    Valid,
    /// The record violates the dimension
    Invalid(EvaluationError),
}

impl Verdict {
    /// Returns true if the record satisfies the dimension.
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// Returns the reason the record was rejected, if any.
    pub fn reason(&self) -> Option<&EvaluationError> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid(reason) => Some(reason),
        }
    }
}

impl From<Result<(), EvaluationError>> for Verdict {
    fn from(result: Result<(), EvaluationError>) -> Self {
        match result {
            Ok(()) => Verdict::Valid,
            Err(reason) => Verdict::Invalid(reason),
        }
    }
}

/// A named data quality check over one record.
///
/// Implementations declare the field roles they need via
/// [`requirements`](Dimension::requirements) and apply their validity rule in
/// [`evaluate`](Dimension::evaluate). Dimensions are stateless and shared
/// across all processing tasks.
///
/// # Example
///
/// ```rust
/// use profiling_core::{CheckedFields, Dimension, EvaluationError, FieldRequirement};
///
/// struct NonEmptyCity;
///
/// impl Dimension for NonEmptyCity {
///     fn name(&self) -> &str {
///         "CityValidity"
///     }
///
///     fn requirements(&self) -> &[FieldRequirement] {
///         const REQUIRED: &[FieldRequirement] = &[FieldRequirement::string("city")];
///         REQUIRED
///     }
///
///     fn evaluate(&self, fields: &CheckedFields<'_>) -> Result<(), EvaluationError> {
///         let (path, city) = fields.string("city")?;
///         if city.is_empty() {
///             return Err(EvaluationError::Empty { path: path.to_string() });
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Dimension: Send + Sync {
    /// Name used to reference the dimension from rules.
    fn name(&self) -> &str;

    /// Field roles this dimension needs, in check order.
    fn requirements(&self) -> &[FieldRequirement];

    /// Validates the rule's configuration against the record.
    ///
    /// Default implementation checks every requirement in order.
    fn check_config<'a>(
        &self,
        context: &ValidationContext<'a>,
    ) -> Result<CheckedFields<'a>, ConfigError> {
        context.check_all(self.requirements())
    }

    /// Applies the validity rule to fields that passed the config check.
    fn evaluate(&self, fields: &CheckedFields<'_>) -> Result<(), EvaluationError>;
}
