//! jpd CLI tool
//!
//! Command-line interface for computing pairwise joint distributions and correlations between
//! the output variables of a belief network.
//!
//! ## Commands
//!
//! - `describe <net>`: Node-set membership of the network
//! - `pairs <net>`: Joint tables and correlations for every pair of output variables
//! - `conditional <net> --on VAR --state S...`: The same, once per conditioning state

use clap::{Parser, Subcommand};
use jpd_core::{
    batch::ResultSet,
    commands::{execute, Op, OpResult},
    config::{AnalysisConfig, AnalysisConfigProvider, RenderConfig, TomlConfigProvider},
    event::Event,
    network::BeliefNetwork,
    properties::VariableId,
    render::{CorrelationGrid, Heatmap},
};
use std::{path::PathBuf, sync::mpsc::channel};

#[derive(Parser)]
#[command(name = "jpd")]
#[command(author, version, about = "Pairwise joint distributions and correlations of a belief network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the input and output nodes of a network
    Describe {
        /// Path to the network definition (TOML)
        network: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute joint tables for all pairs of output nodes
    Pairs {
        /// Path to the network definition (TOML)
        network: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Print the heatmap/correlation grid
        #[arg(long)]
        grid: bool,
    },

    /// Compute joint tables for all pairs of output nodes, conditioned on each given state
    Conditional {
        /// Path to the network definition (TOML)
        network: PathBuf,

        /// Conditioning variable
        #[arg(long = "on")]
        variable: String,

        /// Conditioning state name (repeatable, processed in the given order)
        #[arg(short, long = "state", required = true)]
        states: Vec<String>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Print the heatmap/correlation grid
        #[arg(long)]
        grid: bool,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<AnalysisConfig, jpd_core::JpdError> {
    match path {
        Some(path) => TomlConfigProvider::new(path).get_config(),
        None => Ok(AnalysisConfig::default()),
    }
}

fn print_results(results: &ResultSet, render: &RenderConfig, grid: bool) {
    if let Some(condition) = &results.condition {
        println!("=== Given {condition} ===");
    }
    for pair in &results.pairs {
        println!("\n--- {} x {} ---", pair.a, pair.b);
        for row in pair.table.as_matrix() {
            println!(
                "{}",
                row.iter()
                    .map(|x| format!("{x:>9.4}"))
                    .collect::<Vec<String>>()
                    .join(" ")
            );
        }
        println!("covariance:  {:.6}", pair.covariance);
        println!("correlation: {:.6}", pair.correlation);
        for diagnostic in &pair.diagnostics {
            println!("note: {diagnostic}");
        }
        if grid {
            println!("{}", Heatmap::from_table(&pair.table, render));
        }
    }
    if grid {
        println!("\n{}", CorrelationGrid::from_results(results, render));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let (network, config, op, json, grid) = match cli.command {
        Commands::Describe { network, json } => (network, None, Op::Describe, json, false),
        Commands::Pairs {
            network,
            config,
            json,
            grid,
        } => (network, config, Op::AllPairs, json, grid),
        Commands::Conditional {
            network,
            variable,
            states,
            config,
            json,
            grid,
        } => (
            network,
            config,
            Op::ConditionalPairs {
                variable: VariableId::new(variable),
                states,
            },
            json,
            grid,
        ),
    };

    let network = BeliefNetwork::load(&network)?;
    let config = load_config(config)?;
    let render = config.render.clone();

    // Progress is reported through tracing by the sweep itself; the event stream only
    // surfaces diagnostics here.
    let (tx, rx) = channel::<Event>();
    let event_handle = std::thread::spawn(move || {
        for event in rx {
            if let Event::Diagnostic(d) = event {
                eprintln!("[Diagnostic] {d}");
            }
        }
    });

    let result = execute(network, config, op, Some(tx));
    // The sender was moved into the sweep and is gone once execute returns.
    let _ = event_handle.join();

    match result? {
        OpResult::Summary(summary) if json => {
            println!("{}", serde_json::to_string_pretty(&summary)?)
        }
        OpResult::Summary(summary) => println!("{summary}"),
        OpResult::Results(results) if json => {
            println!("{}", serde_json::to_string_pretty(&results)?)
        }
        OpResult::Results(results) => print_results(&results, &render, grid),
        OpResult::Batch(batch) if json => println!("{}", serde_json::to_string_pretty(&batch)?),
        OpResult::Batch(batch) => {
            for results in &batch {
                print_results(results, &render, grid);
                println!();
            }
        }
    }

    Ok(())
}
