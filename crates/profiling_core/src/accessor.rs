//! Path-based field access for JSON records.
//!
//! Paths are dot-separated keys (`address.city`). A numeric segment indexes
//! into an array (`children.0.name`) and `\.` escapes a literal dot inside a
//! key (`meta\.version`).
//!
//! Rule paths may not contain bare whitespace. Keys with spaces are written
//! with `\ ` (`first\ name` reads the key `"first name"`); any character
//! after a backslash is taken literally.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Primitive type of a resolved JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// JSON string
    String,
    /// JSON number (integer or float)
    Number,
    /// JSON boolean
    Bool,
    /// JSON `null`
    Null,
    /// JSON object
    Object,
    /// JSON array
    Array,
}

impl FieldKind {
    /// Returns the kind of a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => FieldKind::String,
            Value::Number(_) => FieldKind::Number,
            Value::Bool(_) => FieldKind::Bool,
            Value::Null => FieldKind::Null,
            Value::Object(_) => FieldKind::Object,
            Value::Array(_) => FieldKind::Array,
        }
    }

    /// Returns the lowercase name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Bool => "boolean",
            FieldKind::Null => "null",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving a path against a JSON document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// Nothing exists at the path
    Missing,
    /// A value exists at the path
    Present {
        /// Type of the value
        kind: FieldKind,
        /// The value itself
        value: &'a Value,
    },
}

impl<'a> Resolved<'a> {
    /// Returns true if a value exists at the path.
    pub fn exists(&self) -> bool {
        matches!(self, Resolved::Present { .. })
    }

    /// Returns the kind of the value, if present.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Resolved::Present { kind, .. } => Some(*kind),
            Resolved::Missing => None,
        }
    }

    /// Returns the value, if present.
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Resolved::Present { value, .. } => Some(value),
            Resolved::Missing => None,
        }
    }
}

/// Splits a path into its key segments, honoring `\.` escapes.
pub fn segments(path: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next) => current.push(next),
                None => current.push('\\'),
            },
            '.' => parts.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    parts.push(current);
    parts
}

/// Looks up the value at `path`, returning `None` when it does not exist.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = root;
    for segment in segments(path) {
        current = match current {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Resolves `path` into a [`Resolved`] carrying the value's type.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Resolved<'a> {
    match lookup(root, path) {
        Some(value) => Resolved::Present {
            kind: FieldKind::of(value),
            value,
        },
        None => Resolved::Missing,
    }
}
