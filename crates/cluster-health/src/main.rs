//! Cluster health CLI - evaluate a cluster snapshot and print the report.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cluster_health::{ClusterSnapshot, HealthConfig, HealthEvaluator, HealthReport};

/// Cluster health - machine, node and operator checks ordered by dependency.
#[derive(Parser)]
#[command(name = "cluster-health")]
#[command(about = "Evaluate cluster health from a snapshot of machines, nodes and operators")]
struct Cli {
    /// Snapshot file (YAML or JSON) with machines, nodes and cluster_operators.
    #[arg(long, env = "CLUSTER_HEALTH_SNAPSHOT")]
    snapshot: PathBuf,

    /// Configuration file with operator dependencies (or set `CLUSTER_HEALTH_CONFIG`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so stdout only carries the report)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = HealthConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let snapshot = ClusterSnapshot::from_path(&cli.snapshot).context("Failed to load snapshot")?;

    let input = snapshot.into_input(&config);
    debug!(
        "Evaluating {} operators against {} dependency entries",
        input.operators.len(),
        config.dependencies.len()
    );
    let report = HealthEvaluator::new(config.dependencies).run(&input);

    match cli.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_text(report: &HealthReport) {
    let checks = report.checks();
    let failed = checks.iter().filter(|c| !c.passed).count();

    for check in &checks {
        let label = if check.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        println!("{label} {} - {}", check.name.bold(), check.message);
    }

    println!();
    if failed == 0 {
        println!("{}", format!("All {} checks passed", checks.len()).green());
    } else {
        println!(
            "{}",
            format!("{failed} of {} checks failed", checks.len()).red()
        );
    }
}
