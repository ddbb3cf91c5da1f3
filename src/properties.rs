//! Identifiers and evidence types shared by the oracle, the builders and the results.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Name of a discrete node in the belief network.
///
/// Ordering is lexicographic on the name, which is the order used when the output variables are
/// sorted for a conditional sweep.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(String);

impl VariableId {
    pub fn new<S: Into<String>>(name: S) -> Self {
        VariableId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VariableId {
    fn from(name: &str) -> Self {
        VariableId::new(name)
    }
}

impl From<String> for VariableId {
    fn from(name: String) -> Self {
        VariableId(name)
    }
}

/// Which label of a state to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateLabeling {
    /// The state name, used to enter findings.
    Symbolic,
    /// The state title, which must parse as a number and is used as a coordinate on an axis.
    Numeric,
}

/// How a finding selects the state of its variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateSelector {
    ByName(String),
    ByIndex(usize),
}

impl Display for StateSelector {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            StateSelector::ByName(name) => write!(f, "{name}"),
            StateSelector::ByIndex(idx) => write!(f, "#{idx}"),
        }
    }
}

/// One piece of evidence fixing a variable to one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub variable: VariableId,
    pub state: StateSelector,
}

impl Finding {
    pub fn by_name<S: Into<String>>(variable: VariableId, state: S) -> Self {
        Finding {
            variable,
            state: StateSelector::ByName(state.into()),
        }
    }

    pub fn by_index(variable: VariableId, index: usize) -> Self {
        Finding {
            variable,
            state: StateSelector::ByIndex(index),
        }
    }
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}={}", self.variable, self.state)
    }
}

/// The blanket evidence assumption of a conditional sweep: a variable held in a named state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditioning {
    pub variable: VariableId,
    pub state: String,
}

impl Conditioning {
    pub fn new<S: Into<String>>(variable: VariableId, state: S) -> Self {
        Conditioning {
            variable,
            state: state.into(),
        }
    }

    /// The conditioning state is user supplied, so it is always entered by name.
    pub fn as_finding(&self) -> Finding {
        Finding::by_name(self.variable.clone(), self.state.clone())
    }
}

impl Display for Conditioning {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}={}", self.variable, self.state)
    }
}
