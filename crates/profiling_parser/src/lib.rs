//! Loader for rule sets (JSON/YAML/TOML formats).
//!
//! This crate parses rule set files into the ordered list of `Rule`s the
//! profiling engine evaluates for every record. JSON and YAML files hold a
//! top-level sequence of rules; TOML files hold a `[[rules]]` array of tables.
//!
//! # Example
//!
//! ```rust
//! use profiling_parser::parse_json;
//!
//! let json = r#"[
//!     {"dimension": "Completeness", "inputFields": {"emptyCheck": "name"}},
//!     {"dimension": "AgeValidity", "inputFields": {"age": "age"}}
//! ]"#;
//!
//! let rules = parse_json(json).expect("Failed to parse rules");
//! assert_eq!(rules.len(), 2);
//! assert_eq!(rules[1].dimension, "AgeValidity");
//! ```

use profiling_core::Rule;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a rule set.
#[derive(Debug, Error)]
pub enum ParserError {
    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported rule file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// TOML documents cannot have a top-level array.
#[derive(Debug, Deserialize)]
struct TomlRuleSet {
    #[serde(default)]
    rules: Vec<Rule>,
}

/// Parse a rule set from a JSON string.
///
/// The document must be a JSON array of `{dimension, inputFields}` objects.
pub fn parse_json(content: &str) -> Result<Vec<Rule>> {
    let rules: Vec<Rule> = serde_json::from_str(content)?;
    Ok(rules)
}

/// Parse a rule set from a YAML string.
///
/// # Example
///
/// ```rust
/// use profiling_parser::parse_yaml;
///
/// let yaml = r#"
/// - dimension: GenderValidity
///   inputFields:
///     gender: person.gender
/// "#;
///
/// let rules = parse_yaml(yaml).unwrap();
/// assert_eq!(rules[0].path("gender"), Some("person.gender"));
/// ```
pub fn parse_yaml(content: &str) -> Result<Vec<Rule>> {
    let rules: Vec<Rule> = serde_yaml_ng::from_str(content)?;
    Ok(rules)
}

/// Parse a rule set from a TOML string.
///
/// # Example
///
/// ```rust
/// use profiling_parser::parse_toml;
///
/// let toml = r#"
/// [[rules]]
/// dimension = "NameValidity"
///
/// [rules.inputFields]
/// name = "name"
/// "#;
///
/// let rules = parse_toml(toml).unwrap();
/// assert_eq!(rules[0].dimension, "NameValidity");
/// ```
pub fn parse_toml(content: &str) -> Result<Vec<Rule>> {
    let rule_set: TomlRuleSet =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(rule_set.rules)
}

/// Detect the rule file format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.json` → `RuleFormat::Json`
/// * `.yaml`, `.yml` → `RuleFormat::Yaml`
/// * `.toml` → `RuleFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<RuleFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "json" => Ok(RuleFormat::Json),
        "yaml" | "yml" => Ok(RuleFormat::Yaml),
        "toml" => Ok(RuleFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a rule set from a string in the given format.
pub fn parse_str(content: &str, format: RuleFormat) -> Result<Vec<Rule>> {
    match format {
        RuleFormat::Json => parse_json(content),
        RuleFormat::Yaml => parse_yaml(content),
        RuleFormat::Toml => parse_toml(content),
    }
}

/// Parse a rule set from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use profiling_parser::parse_file;
/// use std::path::Path;
///
/// let rules = parse_file(Path::new("rules.json")).unwrap();
/// println!("Loaded {} rules", rules.len());
/// ```
pub fn parse_file(path: &Path) -> Result<Vec<Rule>> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const RULES_JSON: &str = r#"[
        {"dimension": "Completeness", "inputFields": {"emptyCheck": "name"}},
        {"dimension": "NameValidity", "inputFields": {"name": "name"}},
        {"dimension": "AgeValidity", "inputFields": {"age": "age"}},
        {"dimension": "GenderValidity", "inputFields": {"gender": "gender"}},
        {"dimension": "BMIValidity", "inputFields": {"weight": "weight", "height": "height", "bmi": "bmi"}}
    ]"#;

    #[test]
    fn test_parse_json_keeps_order() {
        let rules = parse_json(RULES_JSON).unwrap();

        let dimensions: Vec<&str> = rules.iter().map(|r| r.dimension.as_str()).collect();
        assert_eq!(
            dimensions,
            vec![
                "Completeness",
                "NameValidity",
                "AgeValidity",
                "GenderValidity",
                "BMIValidity"
            ]
        );
        assert_eq!(rules[4].path("bmi"), Some("bmi"));
    }

    #[test]
    fn test_parse_json_non_string_role_is_accepted() {
        let rules =
            parse_json(r#"[{"dimension": "AgeValidity", "inputFields": {"age": 3}}]"#).unwrap();
        assert_eq!(rules[0].path("age"), None);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_json(r#"{"dimension": "AgeValidity"}"#);
        assert!(matches!(result.unwrap_err(), ParserError::JsonError(_)));

        let result = parse_json(r#"[{"inputFields": {}}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_valid_yaml() {
        let yaml = r#"
- dimension: Completeness
  inputFields:
    emptyCheck: address.city
- dimension: BMIValidity
  inputFields:
    weight: body.weight
    height: body.height
    bmi: body.bmi
"#;

        let rules = parse_yaml(yaml).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].path("emptyCheck"), Some("address.city"));
        assert_eq!(rules[1].input_fields.len(), 3);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let yaml = r#"
- dimension: [unclosed
"#;
        let result = parse_yaml(yaml);
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_valid_toml() {
        let toml = r#"
[[rules]]
dimension = "AgeValidity"
inputFields = { age = "person.age" }

[[rules]]
dimension = "GenderValidity"
inputFields = { gender = "person.gender" }
"#;

        let rules = parse_toml(toml).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].path("age"), Some("person.age"));
        assert_eq!(rules[1].dimension, "GenderValidity");
    }

    #[test]
    fn test_parse_empty_toml() {
        assert!(parse_toml("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_toml("[[rules]\ndimension = ");
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("rules.json")).unwrap(), RuleFormat::Json);
        assert_eq!(detect_format(Path::new("rules.yml")).unwrap(), RuleFormat::Yaml);
        assert_eq!(detect_format(Path::new("rules.YAML")).unwrap(), RuleFormat::Yaml);
        assert_eq!(detect_format(Path::new("rules.toml")).unwrap(), RuleFormat::Toml);

        assert!(matches!(
            detect_format(Path::new("rules")).unwrap_err(),
            ParserError::InvalidExtension
        ));
        assert!(matches!(
            detect_format(Path::new("rules.xml")).unwrap_err(),
            ParserError::UnsupportedFormat(ext) if ext == "xml"
        ));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(RULES_JSON.as_bytes()).unwrap();

        let rules = parse_file(&path).unwrap();
        assert_eq!(rules.len(), 5);
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_file(Path::new("does/not/exist.json"));
        assert!(matches!(result.unwrap_err(), ParserError::IoError(_)));
    }
}
