use petgraph::{algo::toposort, graph::DiGraph};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

use super::spec::{NetworkSpec, NodeSet, StateSpec};
use crate::{
    config::get_content,
    error::JpdError,
    oracle::BeliefOracle,
    properties::{StateLabeling, StateSelector, VariableId},
};

/// Largest joint state space exact enumeration will accept.
pub const MAX_JOINT_STATES: usize = 1 << 20;

/// Conditional probability rows must sum to one within this bound.
const CPT_ROW_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    nodeset: Option<NodeSet>,
    states: Vec<StateSpec>,
    parents: Vec<usize>,
    cpt: Vec<Vec<f64>>,
}

impl Node {
    fn cpt_row(&self, assignment: &[usize], nodes: &[Node]) -> usize {
        self.parents
            .iter()
            .fold(0, |row, p| row * nodes[*p].states.len() + assignment[*p])
    }
}

/// A compiled discrete belief network holding one active finding context.
#[derive(Debug, Clone)]
pub struct BeliefNetwork {
    name: String,
    nodes: Vec<Node>,
    index: BTreeMap<String, usize>,
    findings: BTreeMap<usize, usize>,
}

/// Node-set membership overview of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub name: String,
    pub inputs: Vec<VariableId>,
    pub intermediates: usize,
    pub outputs: Vec<VariableId>,
}

impl BeliefNetwork {
    /// Validate `spec` and build the network.
    pub fn compile(spec: NetworkSpec) -> Result<Self, JpdError> {
        let mut index = BTreeMap::new();
        for (idx, node) in spec.nodes.iter().enumerate() {
            if node.states.is_empty() {
                return Err(JpdError::Network(format!(
                    "node '{}' has no states",
                    node.name
                )));
            }
            if index.insert(node.name.clone(), idx).is_some() {
                return Err(JpdError::Network(format!(
                    "duplicate node name '{}'",
                    node.name
                )));
            }
        }

        let mut graph = DiGraph::<usize, ()>::new();
        let graph_nodes: Vec<_> = (0..spec.nodes.len()).map(|i| graph.add_node(i)).collect();
        let mut nodes = Vec::with_capacity(spec.nodes.len());
        let mut joint_states: usize = 1;
        for (idx, node) in spec.nodes.into_iter().enumerate() {
            let parents = node
                .parents
                .iter()
                .map(|p| {
                    index.get(p).copied().ok_or_else(|| {
                        JpdError::Network(format!(
                            "node '{}' has unknown parent '{p}'",
                            node.name
                        ))
                    })
                })
                .collect::<Result<Vec<usize>, JpdError>>()?;
            for p in &parents {
                graph.add_edge(graph_nodes[*p], graph_nodes[idx], ());
            }
            joint_states = joint_states
                .checked_mul(node.states.len())
                .filter(|n| *n <= MAX_JOINT_STATES)
                .ok_or_else(|| {
                    JpdError::Network(format!(
                        "joint state space exceeds {MAX_JOINT_STATES} configurations"
                    ))
                })?;
            nodes.push(Node {
                name: node.name,
                nodeset: node.nodeset,
                states: node.states,
                parents,
                cpt: node.cpt,
            });
        }

        if let Err(cycle) = toposort(&graph, None) {
            return Err(JpdError::Network(format!(
                "parent graph has a cycle through '{}'",
                nodes[graph[cycle.node_id()]].name
            )));
        }

        for node in &nodes {
            let expected_rows: usize = node
                .parents
                .iter()
                .map(|p| nodes[*p].states.len())
                .product();
            if node.cpt.len() != expected_rows {
                return Err(JpdError::Network(format!(
                    "node '{}' needs {expected_rows} cpt rows, found {}",
                    node.name,
                    node.cpt.len()
                )));
            }
            for (r, row) in node.cpt.iter().enumerate() {
                if row.len() != node.states.len() {
                    return Err(JpdError::Network(format!(
                        "node '{}' cpt row {r} has {} entries for {} states",
                        node.name,
                        row.len(),
                        node.states.len()
                    )));
                }
                if row.iter().any(|p| !(0.0..=1.0).contains(p)) {
                    return Err(JpdError::Network(format!(
                        "node '{}' cpt row {r} has entries outside [0, 1]",
                        node.name
                    )));
                }
                let sum: f64 = row.iter().sum();
                if (sum - 1.0).abs() > CPT_ROW_TOLERANCE {
                    return Err(JpdError::Network(format!(
                        "node '{}' cpt row {r} sums to {sum}",
                        node.name
                    )));
                }
            }
        }

        tracing::debug!(
            "Compiled network '{}' with {} nodes and {joint_states} joint configurations",
            spec.name,
            nodes.len()
        );
        Ok(BeliefNetwork {
            name: spec.name,
            nodes,
            index,
            findings: BTreeMap::new(),
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, JpdError> {
        let content = get_content(path)?;
        content.parse()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_variables(&self) -> Vec<VariableId> {
        self.in_nodeset(NodeSet::In)
    }

    /// Number of input, intermediate (no node set) and output nodes.
    pub fn node_counts(&self) -> (usize, usize, usize) {
        let inputs = self.in_nodeset(NodeSet::In).len();
        let outputs = self.in_nodeset(NodeSet::Out).len();
        (inputs, self.nodes.len() - inputs - outputs, outputs)
    }

    pub fn summary(&self) -> NetworkSummary {
        let (_, intermediates, _) = self.node_counts();
        NetworkSummary {
            name: self.name.clone(),
            inputs: self.input_variables(),
            intermediates,
            outputs: self.in_nodeset(NodeSet::Out),
        }
    }

    /// Active findings as (variable, state name) pairs.
    pub fn findings(&self) -> Vec<(VariableId, String)> {
        self.findings
            .iter()
            .map(|(n, s)| {
                (
                    VariableId::new(self.nodes[*n].name.clone()),
                    self.nodes[*n].states[*s].name.clone(),
                )
            })
            .collect()
    }

    fn in_nodeset(&self, set: NodeSet) -> Vec<VariableId> {
        self.nodes
            .iter()
            .filter(|n| n.nodeset == Some(set))
            .map(|n| VariableId::new(n.name.clone()))
            .collect()
    }

    fn node_index(&self, variable: &VariableId) -> Result<usize, JpdError> {
        self.index
            .get(variable.as_str())
            .copied()
            .ok_or_else(|| JpdError::NotFound(format!("variable '{variable}'")))
    }

    fn joint_probability(&self, assignment: &[usize]) -> f64 {
        let mut p = 1.0;
        for (idx, node) in self.nodes.iter().enumerate() {
            p *= node.cpt[node.cpt_row(assignment, &self.nodes)][assignment[idx]];
            if p == 0.0 {
                break;
            }
        }
        p
    }

    /// Sum the joint distribution over every configuration consistent with the findings.
    fn posterior(&self, target: usize) -> Result<Vec<f64>, JpdError> {
        let mut assignment = vec![0; self.nodes.len()];
        for (node, state) in &self.findings {
            assignment[*node] = *state;
        }
        let free: Vec<usize> = (0..self.nodes.len())
            .filter(|n| !self.findings.contains_key(n))
            .collect();

        let mut belief = vec![0.0; self.nodes[target].states.len()];
        let mut evidence = 0.0;
        'configurations: loop {
            let p = self.joint_probability(&assignment);
            belief[assignment[target]] += p;
            evidence += p;

            for node in &free {
                assignment[*node] += 1;
                if assignment[*node] < self.nodes[*node].states.len() {
                    continue 'configurations;
                }
                assignment[*node] = 0;
            }
            break;
        }

        if evidence <= 0.0 {
            return Err(JpdError::Oracle(format!(
                "findings [{}] have zero probability in network '{}'",
                self.findings()
                    .iter()
                    .map(|(v, s)| format!("{v}={s}"))
                    .collect::<Vec<String>>()
                    .join(", "),
                self.name
            )));
        }
        Ok(belief.into_iter().map(|p| p / evidence).collect())
    }
}

impl FromStr for BeliefNetwork {
    type Err = JpdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BeliefNetwork::compile(s.parse::<NetworkSpec>()?)
    }
}

impl BeliefOracle for BeliefNetwork {
    fn output_variables(&self) -> Result<Vec<VariableId>, JpdError> {
        Ok(self.in_nodeset(NodeSet::Out))
    }

    fn states(
        &self,
        variable: &VariableId,
        labeling: StateLabeling,
    ) -> Result<Vec<String>, JpdError> {
        let node = &self.nodes[self.node_index(variable)?];
        Ok(node
            .states
            .iter()
            .map(|s| match labeling {
                StateLabeling::Symbolic => s.name.clone(),
                StateLabeling::Numeric => s.title().to_string(),
            })
            .collect())
    }

    fn retract_findings(&mut self) -> Result<(), JpdError> {
        self.findings.clear();
        Ok(())
    }

    fn set_finding(
        &mut self,
        variable: &VariableId,
        state: &StateSelector,
    ) -> Result<(), JpdError> {
        let node_idx = self.node_index(variable)?;
        let node = &self.nodes[node_idx];
        let state_idx = match state {
            StateSelector::ByName(name) => node
                .states
                .iter()
                .position(|s| &s.name == name)
                .ok_or_else(|| {
                    JpdError::NotFound(format!("state '{name}' of variable '{variable}'"))
                })?,
            StateSelector::ByIndex(idx) if *idx < node.states.len() => *idx,
            StateSelector::ByIndex(idx) => {
                return Err(JpdError::NotFound(format!(
                    "state #{idx} of variable '{variable}' ({} states)",
                    node.states.len()
                )))
            }
        };
        self.findings.insert(node_idx, state_idx);
        Ok(())
    }

    fn beliefs(&self, variable: &VariableId) -> Result<Vec<f64>, JpdError> {
        self.posterior(self.node_index(variable)?)
    }
}

impl Display for NetworkSummary {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let join = |vars: &[VariableId]| {
            vars.iter()
                .map(|v| v.to_string())
                .collect::<Vec<String>>()
                .join(",")
        };
        writeln!(f, " netname: {}", self.name)?;
        writeln!(
            f,
            " number of nodes (i,int,o): [{}, {}, {}]",
            self.inputs.len(),
            self.intermediates,
            self.outputs.len()
        )?;
        writeln!(f, " inputnodes: {}", join(&self.inputs))?;
        write!(f, " outputnodes: {}", join(&self.outputs))
    }
}

impl Display for BeliefNetwork {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}
