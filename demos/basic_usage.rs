//! Basic usage example for jpd-core
//!
//! This example demonstrates:
//! - Loading a belief network from TOML
//! - Sweeping all pairs of output variables
//! - Repeating the sweep under each state of an input variable
//! - Rendering the correlation grid
//!
//! Run with: cargo run --example basic_usage

use jpd_core::{
    batch::PairSweep,
    config::AnalysisConfig,
    event::Event,
    network::BeliefNetwork,
    properties::VariableId,
    render::CorrelationGrid,
    JpdError,
};
use std::{path::PathBuf, sync::mpsc::channel};

fn main() -> Result<(), JpdError> {
    // Set up logging to see what's happening
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== jpd Basic Usage Example ===\n");

    // 1. Load the river network shipped with the integration tests
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/networks/river.toml");
    println!("1. Loading network from {path:?}...");
    let network = BeliefNetwork::load(&path)?;
    println!("{network}\n");

    // 2. Unconditioned sweep
    println!("2. Computing joint tables for all output pairs...");
    let config = AnalysisConfig::default();
    let mut sweep = PairSweep::new(network, config.clone(), None);
    let results = sweep.all_pairs()?;
    for pair in &results.pairs {
        println!(
            "   {} x {}: cov = {:.4}, cor = {:.4}",
            pair.a, pair.b, pair.covariance, pair.correlation
        );
    }
    println!("\n{}", CorrelationGrid::from_results(&results, &config.render));

    // 3. Conditional sweep, listening for diagnostics
    println!("3. Conditioning on each state of Rain...");
    let (tx, rx) = channel();
    let mut sweep = PairSweep::new(sweep.into_inner(), config, Some(tx));
    let batch = sweep.all_conditional_pairs(
        &VariableId::new("Rain"),
        &["dry".to_string(), "wet".to_string()],
    )?;
    drop(sweep);

    let diagnostics = rx
        .iter()
        .filter(|e| matches!(e, Event::Diagnostic(_)))
        .count();
    for results in &batch {
        if let Some(condition) = &results.condition {
            println!("   Given {condition}:");
        }
        for pair in &results.pairs {
            println!(
                "     {} x {}: cor = {:.4}",
                pair.a, pair.b, pair.correlation
            );
        }
    }
    println!("   {diagnostics} diagnostics reported");

    println!("\n=== Example Complete ===");
    Ok(())
}
