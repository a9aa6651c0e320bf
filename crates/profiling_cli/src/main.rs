mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use profiling_engine::DEFAULT_CONCURRENCY;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dqp")]
#[command(version, about = "Data Quality Profiler CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile a stream of JSON records against a rule set
    Run {
        /// Path to the rule set file (JSON, YAML or TOML)
        rules: String,

        /// JSON lines file to read records from (defaults to stdin)
        #[arg(short, long)]
        input: Option<String>,

        /// Maximum number of records processed concurrently
        #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Output format: text, json
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Report rules with unknown dimensions as failures instead of skipping them
        #[arg(long)]
        strict_dimensions: bool,
    },

    /// Check a rule set against the registered dimensions without reading records
    Check {
        /// Path to the rule set file (JSON, YAML or TOML)
        rules: String,

        /// Output format: text, json
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the registered dimensions and their field roles
    Dimensions {
        /// Output format: text, json
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// How results are printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so that stdout only carries results
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Run {
            rules,
            input,
            concurrency,
            format,
            strict_dimensions,
        } => {
            commands::run::execute(
                &rules,
                input.as_deref(),
                concurrency,
                format,
                strict_dimensions,
            )
            .await
        }

        Commands::Check { rules, format } => commands::check::execute(&rules, format).await,

        Commands::Dimensions { format } => commands::dimensions::execute(format),
    }
}
