//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use jpd_core::network::BeliefNetwork;
use std::path::PathBuf;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Path of a network fixture under `tests/networks/`.
#[allow(dead_code)]
pub fn network_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("networks")
        .join(format!("{name}.toml"))
}

/// The river network: Rain (IN) drives Discharge, which drives Turbidity; Oxygen depends on
/// Turbidity and Rain. Discharge, Turbidity and Oxygen are outputs, Weir is disconnected.
#[allow(dead_code)]
pub fn river() -> BeliefNetwork {
    BeliefNetwork::load(network_path("river")).unwrap()
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
