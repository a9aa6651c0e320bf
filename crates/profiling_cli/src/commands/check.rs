use anyhow::{Context, Result};
use profiling_engine::DimensionRegistry;
use profiling_parser::parse_file;
use std::path::Path;
use tracing::info;

use crate::OutputFormat;
use crate::output::{self, RuleFinding};

pub async fn execute(rules_path: &str, format: OutputFormat) -> Result<()> {
    info!("Checking rules: {}", rules_path);

    let path = Path::new(rules_path);
    let rules = parse_file(path)
        .with_context(|| format!("Failed to parse rules file: {}", rules_path))?;

    let registry = DimensionRegistry::with_defaults();
    let findings: Vec<RuleFinding> = rules
        .iter()
        .enumerate()
        .flat_map(|(index, rule)| {
            registry
                .check_rule(rule)
                .into_iter()
                .map(move |issue| RuleFinding {
                    index,
                    dimension: rule.dimension.clone(),
                    issue: issue.to_string(),
                })
        })
        .collect();

    output::print_check_report(rules_path, &rules, &findings, format)?;

    if !findings.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
