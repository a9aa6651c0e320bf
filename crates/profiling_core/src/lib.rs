//! # Data Quality Profiler Core
//!
//! Core data structures and types for the Data Quality Profiler.
//!
//! This crate provides the building blocks for declaring data quality rules
//! and evaluating them against semi-structured (JSON) records. Concrete
//! dimensions and the processing engine live in `profiling_engine`.
//!
//! ## Key Concepts
//!
//! - **Rule**: binds a dimension name to the record paths of its field roles
//! - **Dimension**: a named check with a two-phase protocol (config check, then evaluation)
//! - **Record**: one raw unit from a record source, or the error that ended it
//! - **FailureReport**: every failure reason collected for a single record
//!
//! ## Example
//!
//! ```rust
//! use profiling_core::{RuleBuilder, ValidationContext};
//! use serde_json::json;
//!
//! let rule = RuleBuilder::age_validity("person.age");
//! let record = json!({"person": {"age": 30}});
//!
//! let context = ValidationContext::new(&record, &rule.input_fields);
//! assert_eq!(context.path("age").unwrap(), "person.age");
//! ```

pub mod accessor;
pub mod builder;
pub mod error;
pub mod record;
pub mod rule;
pub mod validator;

pub use accessor::{FieldKind, Resolved};
pub use builder::*;
pub use error::*;
pub use record::*;
pub use rule::*;
pub use validator::*;
