//! Reference [`BeliefOracle`] implementation: a discrete Bayesian network with exact inference.
//!
//! Networks are declared in TOML. Nodes may belong to the `IN` or `OUT` node set; the `OUT` set
//! is what a [`PairSweep`] iterates over. Every output node needs numeric state titles.
//!
//! ```toml
//! name = "river"
//!
//! [[nodes]]
//! name = "Rain"
//! nodeset = "IN"
//! states = [{ name = "dry", title = "0" }, { name = "wet", title = "1" }]
//! cpt = [[0.7, 0.3]]
//!
//! [[nodes]]
//! name = "Discharge"
//! nodeset = "OUT"
//! parents = ["Rain"]
//! states = [{ name = "low", title = "10" }, { name = "high", title = "40" }]
//! cpt = [[0.8, 0.2], [0.3, 0.7]]
//! ```
//!
//! [`BeliefOracle`]: crate::oracle::BeliefOracle
//! [`PairSweep`]: crate::batch::PairSweep

mod engine;
mod spec;


pub use engine::{BeliefNetwork, NetworkSummary, MAX_JOINT_STATES};
pub use spec::{NetworkSpec, NodeSet, NodeSpec, StateSpec};
