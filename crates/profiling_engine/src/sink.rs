//! Reporting sinks for failure reports.

use profiling_core::FailureReport;
use std::io::Write;
use std::sync::Mutex;
use tracing::{error, warn};

/// Receives one report per failing record.
///
/// Sinks are shared by every processing task and may be called concurrently.
pub trait ReportSink: Send + Sync {
    /// Emits a report.
    fn emit(&self, report: &FailureReport);
}

/// Logs each report as pretty-printed JSON at `WARN` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&self, report: &FailureReport) {
        match serde_json::to_string_pretty(report) {
            Ok(formatted) => warn!("Failure Report: {}", formatted),
            Err(err) => error!("Error formatting report: {}", err),
        }
    }
}

/// Writes each report as one compact JSON line.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> ReportSink for JsonLinesSink<W> {
    fn emit(&self, report: &FailureReport) {
        let line = match serde_json::to_string(report) {
            Ok(line) => line,
            Err(err) => {
                error!("Error formatting report: {}", err);
                return;
            }
        };

        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = writeln!(writer, "{}", line).and_then(|()| writer.flush()) {
            error!("Error writing report: {}", err);
        }
    }
}

/// Keeps reports in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<FailureReport>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the reports collected so far.
    pub fn reports(&self) -> Vec<FailureReport> {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the number of reports collected so far.
    pub fn len(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns true if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportSink for CollectingSink {
    fn emit(&self, report: &FailureReport) {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(report.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report() -> FailureReport {
        FailureReport {
            message: r#"{"age":-1}"#.to_string(),
            failures: vec!["evaluation error: age value is negative".to_string()],
        }
    }

    #[test]
    fn test_json_lines_sink() {
        let sink = JsonLinesSink::new(Vec::new());
        sink.emit(&report());
        sink.emit(&report());

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: FailureReport = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, report());
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        assert!(sink.is_empty());

        sink.emit(&report());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.reports(), vec![report()]);
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.emit(&report());
    }
}
