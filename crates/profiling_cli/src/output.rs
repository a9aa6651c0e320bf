use anyhow::Result;
use colored::*;
use profiling_core::{FieldRequirement, Rule};
use profiling_engine::{DimensionRegistry, RunStats};
use serde_json::{Value, json};

use crate::OutputFormat;

/// A problem found in one rule by the `check` command.
pub struct RuleFinding {
    pub index: usize,
    pub dimension: String,
    pub issue: String,
}

pub fn print_run_summary(stats: &RunStats, rule_count: usize) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  PROFILING SUMMARY".bold());
    println!("{}", "═".repeat(60));

    if stats.reports_emitted == 0 {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "All records passed".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            format!("{} records failed", stats.reports_emitted).red().bold()
        );
    }

    if stats.cancelled {
        println!(
            "\n{}",
            "Run was cancelled before the input was exhausted".yellow()
        );
    }

    println!("\n{}", "Summary:".bold());
    println!("  Rules:              {}", rule_count);
    println!("  Records received:   {}", stats.records_received);
    println!("  Records processed:  {}", stats.records_completed);
    println!("  Failure reports:    {}", stats.reports_emitted);
    println!("  Source errors:      {}", stats.source_errors);
    println!("  Duration:           {} ms", stats.duration_ms);
    println!("{}", "═".repeat(60));
}

pub fn print_check_report(
    rules_path: &str,
    rules: &[Rule],
    findings: &[RuleFinding],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = json!({
                "valid": findings.is_empty(),
                "rules": rules.len(),
                "issues": findings
                    .iter()
                    .map(|finding| json!({
                        "rule": finding.index + 1,
                        "dimension": finding.dimension,
                        "issue": finding.issue,
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            print_info(&format!("Rules loaded: {} from {}", rules.len(), rules_path));

            println!("\nRules:");
            for (i, rule) in rules.iter().enumerate() {
                let fields = rule
                    .input_fields
                    .iter()
                    .map(|(role, path)| format!("{}={}", role, display_path(path)))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("  {}. {} ({})", i + 1, rule.dimension.bold(), fields);
            }
            println!();

            if findings.is_empty() {
                print_success("Rule set is valid");
            } else {
                println!("{}", "Issues:".red().bold());
                for finding in findings {
                    println!(
                        "  rule {} ({}): {}",
                        finding.index + 1,
                        finding.dimension,
                        finding.issue.red()
                    );
                }
                print_error(&format!("Rule set has {} issues", findings.len()));
            }
        }
    }
    Ok(())
}

pub fn print_dimensions(registry: &DimensionRegistry, format: OutputFormat) -> Result<()> {
    let dimensions = registry.names().into_iter().map(|name| {
        let requirements = registry.requirements(name).unwrap_or_default();
        (name, requirements)
    });

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = dimensions
                .map(|(name, requirements)| {
                    json!({
                        "dimension": name,
                        "inputFields": requirements
                            .iter()
                            .map(|requirement| json!({
                                "role": requirement.role,
                                "type": describe(requirement),
                            }))
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("{}", "Registered dimensions:".bold());
            for (name, requirements) in dimensions {
                let roles = requirements
                    .iter()
                    .map(|requirement| format!("{} ({})", requirement.role, describe(requirement)))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("  {:<16} {}", name.bold(), roles);
            }
        }
    }
    Ok(())
}

/// Path strings print bare; any other JSON value prints as JSON.
fn display_path(value: &Value) -> String {
    match value {
        Value::String(path) => path.clone(),
        other => other.to_string(),
    }
}

fn describe(requirement: &FieldRequirement) -> &'static str {
    requirement
        .expect
        .kind()
        .map_or("any", |kind| kind.as_str())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
