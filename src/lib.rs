//! # jpd-core
//!
//! Pairwise joint probability distributions, covariances and correlations between the output
//! variables of a discrete belief network.
//!
//! ## Overview
//!
//! An inference engine answers one kind of question: the belief distribution over a variable
//! given the findings currently entered. jpd-core rebuilds full two-variable joint tables from
//! a sequence of such single-variable queries (chain rule: P(A = s, B) = P(A = s) · P(B | A = s)),
//! then derives moment statistics from them. Every unordered pair of output variables can be
//! swept at once, optionally repeated under each state of a conditioning variable.
//!
//! ## Architecture
//!
//! - **[`oracle`]**: The [`BeliefOracle`](oracle::BeliefOracle) trait and the
//!   [`BeliefSession`](oracle::BeliefSession) that scopes findings
//! - **[`stats`]**: Mean, standard deviation, covariance and correlation
//! - **[`jpd`]**: Unconditioned and conditional joint table builders
//! - **[`batch`]**: [`PairSweep`](batch::PairSweep), the pair enumerator
//! - **[`network`]**: A reference oracle, a TOML-defined discrete network with exact inference
//! - **[`render`]**: Text grid of heatmaps and correlations
//!
//! ## Quick Start
//!
//! ```rust
//! use jpd_core::{batch::PairSweep, network::BeliefNetwork};
//!
//! # fn main() -> Result<(), jpd_core::JpdError> {
//! let network: BeliefNetwork = r#"
//! name = "pair"
//!
//! [[nodes]]
//! name = "A"
//! nodeset = "OUT"
//! states = [{ name = "a0", title = "0" }, { name = "a1", title = "1" }]
//! cpt = [[0.6, 0.4]]
//!
//! [[nodes]]
//! name = "B"
//! nodeset = "OUT"
//! parents = ["A"]
//! states = [{ name = "b0", title = "0" }, { name = "b1", title = "1" }]
//! cpt = [[0.9, 0.1], [0.2, 0.8]]
//! "#
//! .parse()?;
//!
//! let results = PairSweep::simple(network).all_pairs()?;
//! let pair = &results.pairs[0];
//! assert!((pair.table.interior_sum() - 1.0).abs() < 1e-9);
//! println!("cov = {}, cor = {}", pair.covariance, pair.correlation);
//! # Ok(())
//! # }
//! ```
//!
//! ## Degenerate inputs
//!
//! Neither case below is an error:
//!
//! - A state of A with zero mass under the conditioning gets a zero row in the conditional
//!   table and a [`JpdDiagnostic::DegenerateConditioning`](diagnostic::JpdDiagnostic).
//! - A variable with zero standard deviation yields a correlation of `NaN`.

pub mod batch;
pub mod commands;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod event;
pub mod jpd;
pub mod network;
pub mod oracle;
pub mod properties;
pub mod render;
pub mod stats;
pub mod table;
#[cfg(test)]
mod tests;

pub use error::*;
