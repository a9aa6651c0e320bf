use anyhow::{Context, Result};
use futures::stream::BoxStream;
use profiling_core::Record;
use profiling_engine::{
    CancellationToken, DimensionRegistry, EngineConfig, JsonLinesSink, JsonLinesSource,
    ProfilingEngine, RecordSource, ReportSink, TracingSink, UnknownDimensionPolicy,
};
use profiling_parser::parse_file;
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::OutputFormat;
use crate::output;

pub async fn execute(
    rules_path: &str,
    input: Option<&str>,
    concurrency: usize,
    format: OutputFormat,
    strict_dimensions: bool,
) -> Result<()> {
    info!("Loading rules: {}", rules_path);

    let rules = parse_file(Path::new(rules_path))
        .with_context(|| format!("Failed to parse rules file: {}", rules_path))?;

    if format == OutputFormat::Text {
        output::print_info(&format!("Loaded {} rules from {}", rules.len(), rules_path));
    }

    let policy = if strict_dimensions {
        UnknownDimensionPolicy::Fail
    } else {
        UnknownDimensionPolicy::Skip
    };
    let config = EngineConfig::new()
        .with_concurrency(concurrency)
        .with_unknown_dimensions(policy);

    let sink: Arc<dyn ReportSink> = match format {
        OutputFormat::Json => Arc::new(JsonLinesSink::new(std::io::stdout())),
        OutputFormat::Text => Arc::new(TracingSink),
    };

    let rule_count = rules.len();
    let engine = ProfilingEngine::with_config(rules, DimensionRegistry::with_defaults(), sink, config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight records");
            on_interrupt.cancel();
        }
    });

    let stats = engine.run(open_input(input), &cancel).await;

    if format == OutputFormat::Text {
        output::print_run_summary(&stats, rule_count);
    }

    Ok(())
}

fn open_input(input: Option<&str>) -> BoxStream<'static, Record> {
    match input {
        Some(path) => {
            info!("Reading records from {}", path);
            JsonLinesSource::new("").open(path)
        }
        None => {
            info!("Reading records from stdin");
            profiling_engine::lines(BufReader::new(tokio::io::stdin()), "stdin")
        }
    }
}
