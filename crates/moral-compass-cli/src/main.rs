//! Moral Compass CLI
//!
//! Command-line interface for moral scoring and philosophical evaluation.
//!
//! ## Usage
//!
//! ```bash
//! # Report on every decision in a scenario
//! moral-compass evaluate --input scenario.yaml
//!
//! # JSON output with a fixed timestamp
//! moral-compass evaluate --input scenario.yaml --format json --evaluated-at 2025-12-20T00:00:00Z
//!
//! # Compass geometry for a 600x600 canvas
//! moral-compass compass --input scenario.yaml --width 600 --height 600
//!
//! # Conversation summary
//! moral-compass context --input scenario.yaml
//!
//! # Validate a scenario
//! moral-compass scenario validate scenario.yaml
//! ```
//!
//! ## Exit Codes
//!
//! - 0: Success
//! - 1: Invalid scenario (validate only)
//! - 3: Error

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use moral_compass_core::{
    Canvas, CompassConfig, CompassLayout, CompassReport, ContextSummary, Scenario,
};

/// Moral Compass: score decisions along five moral dimensions
#[derive(Parser)]
#[command(name = "moral-compass")]
#[command(version)]
#[command(about = "Evaluate decisions against five ethical philosophies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report on every decision in a scenario
    Evaluate {
        /// Path to the scenario (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Path to a compass config (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Explicit timestamp for deterministic reports (ISO 8601 / RFC 3339).
        /// Overrides determinism.evaluated_at from the config.
        /// Example: --evaluated-at 2025-12-20T00:00:00Z
        #[arg(long, value_parser = parse_datetime)]
        evaluated_at: Option<DateTime<Utc>>,
    },

    /// Print compass geometry for every decision as JSON
    Compass {
        /// Path to the scenario (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Path to a compass config (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Canvas width (defaults to the config's canvas)
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height (defaults to the config's canvas)
        #[arg(long)]
        height: Option<f64>,
    },

    /// Summarize the scenario's conversation
    Context {
        /// Path to the scenario (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Scenario management commands
    Scenario {
        #[command(subcommand)]
        action: ScenarioAction,
    },
}

#[derive(Subcommand)]
enum ScenarioAction {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario file
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Parse ISO 8601 / RFC 3339 datetime string to DateTime<Utc>.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid datetime format: {}. Expected ISO 8601/RFC 3339 (e.g., 2025-12-20T00:00:00Z)", e))
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    match run() {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(3)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            input,
            config,
            format,
            evaluated_at,
        } => evaluate_command(input, config, format, evaluated_at),

        Commands::Compass {
            input,
            config,
            width,
            height,
        } => compass_command(input, config, width, height),

        Commands::Context { input, format } => context_command(input, format),

        Commands::Scenario { action } => match action {
            ScenarioAction::Validate { path } => validate_scenario(path),
        },
    }
}

fn load_scenario(path: &PathBuf) -> Result<Scenario> {
    Scenario::from_path(path).with_context(|| format!("Failed to load scenario from {:?}", path))
}

fn load_config(path: Option<PathBuf>) -> Result<CompassConfig> {
    match path {
        Some(path) => CompassConfig::from_yaml_file(&path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => Ok(CompassConfig::default()),
    }
}

fn evaluate_command(
    input: PathBuf,
    config_path: Option<PathBuf>,
    format: OutputFormat,
    evaluated_at: Option<DateTime<Utc>>,
) -> Result<ExitCode> {
    let scenario = load_scenario(&input)?;
    let config = load_config(config_path)?;

    let timestamp = evaluated_at
        .or(config.determinism.evaluated_at)
        .unwrap_or_else(Utc::now);
    let reports = moral_compass_core::analyze_scenario_at(&scenario, &config, timestamp)
        .context("Evaluation failed")?;

    if reports.is_empty() {
        tracing::warn!(path = ?input, "Scenario has no decisions to evaluate");
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            print_text_reports(&reports);
        }
    }

    Ok(ExitCode::from(0))
}

fn print_text_reports(reports: &[CompassReport]) {
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!("---");
            println!();
        }
        print!("{}", report.render_text());
        println!();
        match report.dominant_dimension {
            Some(dimension) => println!("Dominant dimension: {}", dimension),
            None => println!("Dominant dimension: none"),
        }
        match report.philosophical_evaluation.top() {
            Some((philosophy, score)) => {
                println!("Strongest perspective: {} ({:.2})", philosophy, score);
            }
            None => println!("Strongest perspective: none"),
        }
        println!(
            "Compass direction: {:.0}° from north (blended goodness {:.2})",
            report.direction.to_degrees(),
            report.combined_goodness
        );
        println!();
    }
}

fn compass_command(
    input: PathBuf,
    config_path: Option<PathBuf>,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<ExitCode> {
    let scenario = load_scenario(&input)?;
    let mut config = load_config(config_path)?;

    config.canvas = Canvas::new(
        width.unwrap_or(config.canvas.width),
        height.unwrap_or(config.canvas.height),
    );
    config.validate().context("Invalid canvas")?;

    let layouts: Vec<CompassLayout> = scenario
        .decisions()
        .context("Failed to build decisions")?
        .iter()
        .map(|decision| CompassLayout::project(decision, config.canvas, &config.geometry))
        .collect();

    println!("{}", serde_json::to_string_pretty(&layouts)?);
    Ok(ExitCode::from(0))
}

fn context_command(input: PathBuf, format: OutputFormat) -> Result<ExitCode> {
    let scenario = load_scenario(&input)?;
    let summary = scenario
        .conversation()
        .context("Failed to replay conversation")?
        .summary();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => print_text_summary(&summary),
    }

    Ok(ExitCode::from(0))
}

fn print_text_summary(summary: &ContextSummary) {
    println!("Messages: {}", summary.message_count);
    println!("Average sentiment: {:.2}", summary.average_sentiment);
    println!(
        "Dominant emotion: {}",
        summary.dominant_emotion.as_deref().unwrap_or("none")
    );
    println!();
    println!("Moral dimension averages:");
    for (dimension, average) in &summary.moral_dimension_averages {
        println!("  {}: {:.2}", dimension, average);
    }
}

fn validate_scenario(path: PathBuf) -> Result<ExitCode> {
    match Scenario::from_path(&path) {
        Ok(scenario) => {
            println!("Scenario is valid: {:?}", path);
            println!();
            println!("Decisions: {}", scenario.decisions.len());
            for entry in &scenario.decisions {
                let source = if entry.signals.is_some() { "signals" } else { "scores" };
                println!("  - {} ({})", entry.name, source);
            }
            println!("Conversation turns: {}", scenario.conversation.len());
            Ok(ExitCode::from(0))
        }
        Err(e) => {
            eprintln!("Scenario validation failed: {}", e);
            Ok(ExitCode::from(1))
        }
    }
}
