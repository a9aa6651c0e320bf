//! Main processing engine.
//!
//! This module provides the `ProfilingEngine` that consumes a record stream,
//! fans records out to a bounded number of concurrent tasks, runs every rule
//! against each record and hands failure reports to a sink.

use crate::{
    AdmissionError, CancellationToken, DimensionRegistry, ProfileError, RecordSource, ReportSink,
    UnknownDimensionPolicy,
};
use futures::{Stream, StreamExt};
use profiling_core::{FailureReport, Record, Rule, ValidationContext};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

/// Default number of records processed concurrently.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of records in flight at once, see [`EngineConfig::permits`]
    pub concurrency: usize,

    /// Handling of rules whose dimension is not registered
    pub unknown_dimensions: UnknownDimensionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            unknown_dimensions: UnknownDimensionPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the concurrency limit, clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    /// Returns the number of permits a run uses: `concurrency` clamped to
    /// `1..=Semaphore::MAX_PERMITS`.
    pub fn permits(&self) -> usize {
        self.concurrency.clamp(1, Semaphore::MAX_PERMITS)
    }

    /// Sets the unknown dimension policy.
    pub fn with_unknown_dimensions(mut self, policy: UnknownDimensionPolicy) -> Self {
        self.unknown_dimensions = policy;
        self
    }
}

/// Statistics about a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records pulled from the source, including error records
    pub records_received: usize,

    /// Records handed to a processing task
    pub records_dispatched: usize,

    /// Processing tasks that ran to completion
    pub records_completed: usize,

    /// Failure reports handed to the sink
    pub reports_emitted: usize,

    /// Error records received from the source
    pub source_errors: usize,

    /// Whether intake stopped because of cancellation
    pub cancelled: bool,

    /// Run duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    fn record_completion(&mut self, joined: Result<bool, JoinError>) {
        match joined {
            Ok(emitted) => {
                self.records_completed += 1;
                if emitted {
                    self.reports_emitted += 1;
                }
            }
            Err(err) => error!("Processing task failed: {}", err),
        }
    }
}

/// State shared read-only by every processing task.
struct Shared {
    rules: Vec<Rule>,
    registry: DimensionRegistry,
    sink: Arc<dyn ReportSink>,
    unknown_dimensions: UnknownDimensionPolicy,
}

impl Shared {
    fn failures(&self, body: &[u8]) -> Vec<ProfileError> {
        // Unparseable bodies resolve every path as missing.
        let record: Value = serde_json::from_slice(body).unwrap_or_else(|err| {
            debug!("Record is not valid JSON: {}", err);
            Value::Null
        });

        let mut failures = Vec::new();
        for rule in &self.rules {
            let context = ValidationContext::new(&record, &rule.input_fields);
            let outcome = match self.registry.validator(rule, context) {
                Ok(validator) => validator.run(),
                Err(_) if self.unknown_dimensions == UnknownDimensionPolicy::Skip => continue,
                Err(err) => Err(err),
            };
            if let Err(err) = outcome {
                failures.push(err);
            }
        }
        failures
    }

    fn process(&self, body: &[u8]) -> Option<FailureReport> {
        let failures = self
            .failures(body)
            .iter()
            .map(ToString::to_string)
            .collect();
        FailureReport::from_failures(body, failures)
    }
}

/// Processing engine for streamed records.
///
/// # Example
///
/// ```rust
/// use profiling_engine::{CollectingSink, DimensionRegistry, ProfilingEngine};
/// use profiling_core::RuleBuilder;
/// use std::sync::Arc;
///
/// let sink = Arc::new(CollectingSink::new());
/// let engine = ProfilingEngine::new(
///     vec![RuleBuilder::age_validity("age")],
///     DimensionRegistry::with_defaults(),
///     sink.clone(),
/// );
///
/// let report = engine.process(br#"{"age": -3}"#).expect("age is negative");
/// assert_eq!(report.failures, vec!["evaluation error: age value is negative"]);
/// assert!(engine.process(br#"{"age": 3}"#).is_none());
/// ```
pub struct ProfilingEngine {
    shared: Arc<Shared>,
    config: EngineConfig,
}

impl ProfilingEngine {
    /// Creates an engine with the default configuration.
    pub fn new(rules: Vec<Rule>, registry: DimensionRegistry, sink: Arc<dyn ReportSink>) -> Self {
        Self::with_config(rules, registry, sink, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    pub fn with_config(
        rules: Vec<Rule>,
        registry: DimensionRegistry,
        sink: Arc<dyn ReportSink>,
        config: EngineConfig,
    ) -> Self {
        for rule in rules.iter().filter(|rule| !registry.contains(&rule.dimension)) {
            match config.unknown_dimensions {
                UnknownDimensionPolicy::Skip => warn!(
                    "Rule references unknown dimension '{}', skipping it for every record",
                    rule.dimension
                ),
                UnknownDimensionPolicy::Fail => warn!(
                    "Rule references unknown dimension '{}', every record will report it",
                    rule.dimension
                ),
            }
        }

        Self {
            shared: Arc::new(Shared {
                rules,
                registry,
                sink,
                unknown_dimensions: config.unknown_dimensions,
            }),
            config,
        }
    }

    /// Returns the configured rules.
    pub fn rules(&self) -> &[Rule] {
        &self.shared.rules
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs every rule against one record and returns its failures.
    pub fn failures(&self, body: &[u8]) -> Vec<ProfileError> {
        self.shared.failures(body)
    }

    /// Runs every rule against one record, without concurrency or a sink.
    ///
    /// Returns `None` when the record passes every rule.
    pub fn process(&self, body: &[u8]) -> Option<FailureReport> {
        self.shared.process(body)
    }

    /// Opens `name` on `source` and processes the resulting stream.
    pub async fn run_source(
        &self,
        source: &dyn RecordSource,
        name: &str,
        cancel: &CancellationToken,
    ) -> RunStats {
        info!("Consuming record stream '{}'", name);
        self.run(source.open(name), cancel).await
    }

    /// Processes a record stream until it ends or the run is cancelled.
    ///
    /// At most `concurrency` records are processed at once. Once intake
    /// stops, every dispatched record is still processed and reported
    /// before this returns.
    pub async fn run<S>(&self, records: S, cancel: &CancellationToken) -> RunStats
    where
        S: Stream<Item = Record>,
    {
        let start = Instant::now();
        let limit = self.config.permits();
        let permits = Arc::new(Semaphore::new(limit));
        let mut tasks = JoinSet::new();
        let mut stats = RunStats::default();
        let mut records = std::pin::pin!(records);

        info!(
            "Starting run: {} rules, concurrency {}",
            self.shared.rules.len(),
            limit
        );

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Run cancelled, stopping intake");
                    stats.cancelled = true;
                    break;
                }
                next = records.next() => next,
            };

            let Some(record) = next else {
                debug!("Record stream exhausted");
                break;
            };
            stats.records_received += 1;

            let body = match record {
                Record::Body(body) => body,
                Record::Failed(err) => {
                    error!("Record source failed: {}", err);
                    stats.source_errors += 1;
                    continue;
                }
            };

            let permit = match admit(&permits, cancel).await {
                Ok(permit) => permit,
                Err(err) => {
                    warn!("Failed to acquire permit: {}", err);
                    stats.cancelled = err == AdmissionError::Cancelled;
                    break;
                }
            };

            stats.records_dispatched += 1;
            let shared = Arc::clone(&self.shared);
            tasks.spawn(async move { process_with_permit(&shared, &body, permit) });

            while let Some(joined) = tasks.try_join_next() {
                stats.record_completion(joined);
            }
        }

        debug!("Draining {} in-flight records", tasks.len());
        while let Some(joined) = tasks.join_next().await {
            stats.record_completion(joined);
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Run finished: {} records received, {} dispatched, {} reports, {} source errors{}",
            stats.records_received,
            stats.records_dispatched,
            stats.reports_emitted,
            stats.source_errors,
            if stats.cancelled { " (cancelled)" } else { "" }
        );
        stats
    }
}

/// Waits for a permit unless the run has been cancelled.
async fn admit(
    permits: &Arc<Semaphore>,
    cancel: &CancellationToken,
) -> Result<OwnedSemaphorePermit, AdmissionError> {
    if cancel.is_cancelled() {
        return Err(AdmissionError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AdmissionError::Cancelled),
        permit = Arc::clone(permits).acquire_owned() => {
            permit.map_err(|_| AdmissionError::Closed)
        }
    }
}

/// Processes one record and reports it; the permit is released afterwards.
fn process_with_permit(shared: &Shared, body: &[u8], permit: OwnedSemaphorePermit) -> bool {
    let report = shared.process(body);
    let emitted = match &report {
        Some(report) => {
            shared.sink.emit(report);
            true
        }
        None => false,
    };
    drop(permit);
    emitted
}
