//! Deadlock Toolkit CLI - analyze resource allocation scenarios
//!
//! Usage:
//!   deadlock-toolkit analyze --scenario scenario.json
//!   deadlock-toolkit analyze --scenario scenario.json --format text
//!   deadlock-toolkit graph --scenario scenario.json
//!
//! A scenario file is JSON:
//!   {"allocation": [[1, 0], [0, 1]], "max_demand": [[1, 1], [1, 1]], "available": [0, 0]}
//!
//! Exit status is 2 when the scenario matrices are rejected, 1 on any other failure.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use deadlock_toolkit::{
    analyze, Error, ResourceAllocationGraph, ScenarioInput, ScenarioReport, ToolkitConfig,
    ValidationPolicy,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "deadlock-toolkit")]
#[command(
    about = "Safe-state and deadlock analysis for resource allocation snapshots",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (environment variables still override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the safety check and the cycle search on a scenario
    Analyze {
        /// Scenario file path
        #[arg(short, long)]
        scenario: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Accept allocations that exceed the declared max demand
        #[arg(long)]
        allow_inconsistent: bool,
    },

    /// Print the resource allocation graph of a scenario as JSON
    Graph {
        /// Scenario file path
        #[arg(short, long)]
        scenario: PathBuf,

        /// Accept allocations that exceed the declared max demand
        #[arg(long)]
        allow_inconsistent: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if err.downcast_ref::<Error>().is_some_and(Error::is_validation) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config);

    match cli.command {
        Commands::Analyze {
            scenario,
            format,
            allow_inconsistent,
        } => {
            let state = load_scenario(&scenario)?
                .to_state(policy(&config, allow_inconsistent))
                .context("invalid scenario")?;
            let report = analyze(&state);

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => print_text(&report),
            }
        }
        Commands::Graph {
            scenario,
            allow_inconsistent,
        } => {
            let state = load_scenario(&scenario)?
                .to_state(policy(&config, allow_inconsistent))
                .context("invalid scenario")?;
            let graph = ResourceAllocationGraph::from_state(&state);

            let nodes: Vec<_> = graph
                .nodes()
                .iter()
                .map(|n| json!({ "id": n, "kind": n.kind(), "index": n.index() }))
                .collect();
            let edges: Vec<_> = graph
                .edges()
                .iter()
                .map(|e| json!({ "from": e.from, "to": e.to, "kind": e.kind() }))
                .collect();

            let document = json!({ "nodes": nodes, "edges": edges });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ToolkitConfig> {
    match path {
        Some(path) => {
            let mut config = ToolkitConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            config.apply_env_overrides()?;
            config.validate()?;
            Ok(config)
        }
        None => Ok(ToolkitConfig::from_env()?),
    }
}

fn load_scenario(path: &Path) -> anyhow::Result<ScenarioInput> {
    ScenarioInput::from_file(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))
}

fn policy(config: &ToolkitConfig, allow_inconsistent: bool) -> ValidationPolicy {
    if allow_inconsistent {
        ValidationPolicy::permissive()
    } else {
        config.validation_policy()
    }
}

// Logs go to stderr; stdout carries only the report
fn init_tracing(config: &ToolkitConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_json_logging() {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn print_text(report: &ScenarioReport) {
    if report.safe {
        println!("safe: yes");
    } else {
        println!(
            "safe: no (blocked processes: {:?})",
            report.unfinished_processes
        );
    }

    if report.deadlock_detected {
        println!("cycle: {}", report.cycle);
    } else {
        println!("cycle: none");
    }
}
