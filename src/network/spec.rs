//! Serialized form of a belief network.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::JpdError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeSet {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSpec {
    /// Symbolic name, used when entering findings by name.
    pub name: String,
    /// Numeric title. Defaults to the name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl StateSpec {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodeset: Option<NodeSet>,
    pub states: Vec<StateSpec>,
    #[serde(default)]
    pub parents: Vec<String>,
    /// One row per parent configuration, the last parent varying fastest. Each row is a
    /// distribution over `states`.
    pub cpt: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

impl FromStr for NetworkSpec {
    type Err = JpdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
