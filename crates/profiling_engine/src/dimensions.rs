//! Built-in data quality dimensions.
//!
//! - `Completeness`: the configured path exists in the record
//! - `NameValidity`: a non-empty name made of letters only
//! - `AgeValidity`: a non-negative age
//! - `GenderValidity`: `"M"` or `"F"`
//! - `BMIValidity`: declared BMI matches weight / height², rounded to one decimal

use profiling_core::{CheckedFields, Dimension, EvaluationError, FieldRequirement};

/// Checks that a field is present in the record.
///
/// Presence is fully verified by the config check, so evaluation always
/// passes once the check succeeds. A JSON `null` counts as present.
#[derive(Debug, Default, Clone, Copy)]
pub struct Completeness;

impl Completeness {
    pub const NAME: &'static str = "Completeness";
    const REQUIRED: &'static [FieldRequirement] = &[FieldRequirement::any("emptyCheck")];
}

impl Dimension for Completeness {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requirements(&self) -> &[FieldRequirement] {
        Self::REQUIRED
    }

    fn evaluate(&self, _fields: &CheckedFields<'_>) -> Result<(), EvaluationError> {
        Ok(())
    }
}

/// Checks that a name is non-empty and contains only letters `a-z` (any case).
#[derive(Debug, Default, Clone, Copy)]
pub struct NameValidity;

impl NameValidity {
    pub const NAME: &'static str = "NameValidity";
    const REQUIRED: &'static [FieldRequirement] = &[FieldRequirement::string("name")];
}

impl Dimension for NameValidity {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requirements(&self) -> &[FieldRequirement] {
        Self::REQUIRED
    }

    fn evaluate(&self, fields: &CheckedFields<'_>) -> Result<(), EvaluationError> {
        let (path, name) = fields.string("name")?;

        if name.is_empty() {
            return Err(EvaluationError::Empty {
                path: path.to_string(),
            });
        }

        if !name.to_lowercase().chars().all(|c| c.is_ascii_lowercase()) {
            return Err(EvaluationError::InvalidCharacters {
                path: path.to_string(),
            });
        }

        Ok(())
    }
}

/// Checks that an age is not negative.
#[derive(Debug, Default, Clone, Copy)]
pub struct AgeValidity;

impl AgeValidity {
    pub const NAME: &'static str = "AgeValidity";
    const REQUIRED: &'static [FieldRequirement] = &[FieldRequirement::number("age")];
}

impl Dimension for AgeValidity {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requirements(&self) -> &[FieldRequirement] {
        Self::REQUIRED
    }

    fn evaluate(&self, fields: &CheckedFields<'_>) -> Result<(), EvaluationError> {
        let (path, age) = fields.number("age")?;

        if age < 0.0 {
            return Err(EvaluationError::Negative {
                path: path.to_string(),
            });
        }

        Ok(())
    }
}

/// Checks that a gender code is exactly `"M"` or `"F"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenderValidity;

impl GenderValidity {
    pub const NAME: &'static str = "GenderValidity";
    const REQUIRED: &'static [FieldRequirement] = &[FieldRequirement::string("gender")];
    const ALLOWED: &'static [&'static str] = &["M", "F"];
}

impl Dimension for GenderValidity {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requirements(&self) -> &[FieldRequirement] {
        Self::REQUIRED
    }

    fn evaluate(&self, fields: &CheckedFields<'_>) -> Result<(), EvaluationError> {
        let (path, gender) = fields.string("gender")?;

        if !Self::ALLOWED.contains(&gender) {
            return Err(EvaluationError::NotAllowed {
                path: path.to_string(),
                value: gender.to_string(),
                allowed: Self::ALLOWED.join(", "),
            });
        }

        Ok(())
    }
}

/// Checks that a declared BMI equals weight / height² rounded to one decimal.
///
/// The comparison is exact after rounding; there is no tolerance.
#[derive(Debug, Default, Clone, Copy)]
pub struct BmiValidity;

impl BmiValidity {
    pub const NAME: &'static str = "BMIValidity";
    const REQUIRED: &'static [FieldRequirement] = &[
        FieldRequirement::number("weight"),
        FieldRequirement::number("height"),
        FieldRequirement::number("bmi"),
    ];

    /// Computes weight / height², rounded half away from zero to one decimal.
    pub fn expected_bmi(weight: f64, height: f64) -> f64 {
        (weight / (height * height) * 10.0).round() / 10.0
    }
}

impl Dimension for BmiValidity {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requirements(&self) -> &[FieldRequirement] {
        Self::REQUIRED
    }

    fn evaluate(&self, fields: &CheckedFields<'_>) -> Result<(), EvaluationError> {
        let (weight_path, weight) = fields.number("weight")?;
        let (height_path, height) = fields.number("height")?;
        let (bmi_path, bmi) = fields.number("bmi")?;

        if weight <= 0.0 {
            return Err(EvaluationError::NotPositive {
                path: weight_path.to_string(),
            });
        }
        if height <= 0.0 {
            return Err(EvaluationError::NotPositive {
                path: height_path.to_string(),
            });
        }

        let expected = Self::expected_bmi(weight, height);
        if bmi != expected {
            return Err(EvaluationError::BmiMismatch {
                path: bmi_path.to_string(),
                actual: bmi,
                expected,
            });
        }

        Ok(())
    }
}
