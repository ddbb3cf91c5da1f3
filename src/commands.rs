use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::mpsc::Sender;

use crate::{
    batch::{PairSweep, ResultSet},
    config::AnalysisConfig,
    error::JpdError,
    event::Event,
    network::{BeliefNetwork, NetworkSummary},
    properties::VariableId,
};

/// Command interface between the `jpd` CLI (or any other front end) and a loaded network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    /// Report node-set membership of the network
    Describe,
    /// Joint tables and correlations for every pair of output variables
    AllPairs,
    /// Joint tables and correlations for every pair of output variables, once per state of
    /// the conditioning variable
    ConditionalPairs {
        variable: VariableId,
        states: Vec<String>,
    },
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Op::Describe => write!(f, "Describe"),
            Op::AllPairs => write!(f, "AllPairs"),
            Op::ConditionalPairs { variable, states } => {
                write!(f, "ConditionalPairs({variable}: {})", states.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OpResult {
    Summary(NetworkSummary),
    Results(ResultSet),
    Batch(Vec<ResultSet>),
}

impl Display for OpResult {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            OpResult::Summary(s) => write!(
                f,
                "Summary({}: {} inputs, {} intermediates, {} outputs)",
                s.name,
                s.inputs.len(),
                s.intermediates,
                s.outputs.len()
            ),
            OpResult::Results(r) => write!(f, "Results({} pairs)", r.pairs.len()),
            OpResult::Batch(b) => write!(
                f,
                "Batch({} conditioning states, {} pairs)",
                b.len(),
                b.iter().map(|r| r.pairs.len()).sum::<usize>()
            ),
        }
    }
}

pub fn execute(
    network: BeliefNetwork,
    config: AnalysisConfig,
    op: Op,
    tx: Option<Sender<Event>>,
) -> Result<OpResult, JpdError> {
    tracing::debug!("Executing {op} on network '{}'", network.name());
    let result = match op {
        Op::Describe => OpResult::Summary(network.summary()),
        Op::AllPairs => OpResult::Results(PairSweep::new(network, config, tx).all_pairs()?),
        Op::ConditionalPairs { variable, states } => {
            if states.is_empty() {
                return Err(JpdError::Command(format!(
                    "no conditioning states given for {variable}"
                )));
            }
            OpResult::Batch(
                PairSweep::new(network, config, tx).all_conditional_pairs(&variable, &states)?,
            )
        }
    };
    tracing::debug!("{result}");
    Ok(result)
}
