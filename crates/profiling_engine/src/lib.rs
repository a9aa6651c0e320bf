//! # Data Quality Profiling Engine
//!
//! Runs data quality dimensions over streamed records. This crate provides:
//!
//! - Built-in dimensions (completeness, name, age, gender and BMI validity)
//! - A dimension registry that rules are resolved against
//! - A bounded-concurrency engine with cooperative cancellation
//! - Record sources (JSON lines files, in-memory queues) and report sinks
//!
//! ## Example
//!
//! ```rust
//! use profiling_engine::{CancellationToken, CollectingSink, DimensionRegistry, MemorySource, ProfilingEngine};
//! use profiling_core::RuleBuilder;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sink = Arc::new(CollectingSink::new());
//! let engine = ProfilingEngine::new(
//!     vec![RuleBuilder::name_validity("name")],
//!     DimensionRegistry::with_defaults(),
//!     sink.clone(),
//! );
//!
//! let source = MemorySource::new().with_queue("people", [r#"{"name": "John"}"#, r#"{"name": ""}"#]);
//! let stats = engine.run_source(&source, "people", &CancellationToken::new()).await;
//!
//! assert_eq!(stats.records_dispatched, 2);
//! assert_eq!(sink.reports()[0].failures, vec!["evaluation error: name value is empty"]);
//! # }
//! ```

mod cancel;
pub mod dimensions;
mod engine;
mod error;
mod registry;
mod sink;
mod source;
mod validator;

pub use cancel::*;
pub use engine::*;
pub use error::*;
pub use registry::*;
pub use sink::*;
pub use source::*;
pub use validator::*;
