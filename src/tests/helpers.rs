//! Shared test utilities: a scripted oracle with fixed answers and a call log.

use crate::{
    error::JpdError,
    oracle::BeliefOracle,
    properties::{StateLabeling, StateSelector, VariableId},
};
use std::{cell::RefCell, collections::BTreeMap};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn var(name: &str) -> VariableId {
    VariableId::new(name)
}

#[derive(Debug, Clone, PartialEq)]
pub enum OracleCall {
    Retract,
    SetFinding(VariableId, StateSelector),
    Beliefs(VariableId, Vec<(VariableId, usize)>),
}

/// Evidence as sorted (variable, state index) pairs.
pub type Context = Vec<(VariableId, usize)>;

/// An oracle that answers from a lookup table keyed by the exact active context.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    pub outputs: Vec<VariableId>,
    /// (name, title) per state
    pub states: BTreeMap<VariableId, Vec<(String, String)>>,
    pub answers: BTreeMap<(Context, VariableId), Vec<f64>>,
    pub active: Context,
    pub log: RefCell<Vec<OracleCall>>,
}

impl ScriptedOracle {
    pub fn with_variable(mut self, name: &str, states: &[(&str, &str)]) -> Self {
        self.states.insert(
            var(name),
            states
                .iter()
                .map(|(n, t)| (n.to_string(), t.to_string()))
                .collect(),
        );
        self
    }

    pub fn with_outputs(mut self, names: &[&str]) -> Self {
        self.outputs = names.iter().map(|n| var(n)).collect();
        self
    }

    /// Beliefs over `target` given `context` (unsorted is fine).
    pub fn answer(mut self, context: &[(&str, usize)], target: &str, beliefs: &[f64]) -> Self {
        let mut key: Context = context.iter().map(|(v, s)| (var(v), *s)).collect();
        key.sort();
        self.answers.insert((key, var(target)), beliefs.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.log.borrow().clone()
    }

    pub fn belief_queries(&self) -> Vec<(VariableId, Context)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                OracleCall::Beliefs(v, ctx) => Some((v, ctx)),
                _ => None,
            })
            .collect()
    }
}

impl BeliefOracle for ScriptedOracle {
    fn output_variables(&self) -> Result<Vec<VariableId>, JpdError> {
        Ok(self.outputs.clone())
    }

    fn states(
        &self,
        variable: &VariableId,
        labeling: StateLabeling,
    ) -> Result<Vec<String>, JpdError> {
        let states = self
            .states
            .get(variable)
            .ok_or_else(|| JpdError::NotFound(variable.to_string()))?;
        Ok(states
            .iter()
            .map(|(name, title)| match labeling {
                StateLabeling::Symbolic => name.clone(),
                StateLabeling::Numeric => title.clone(),
            })
            .collect())
    }

    fn retract_findings(&mut self) -> Result<(), JpdError> {
        self.log.borrow_mut().push(OracleCall::Retract);
        self.active.clear();
        Ok(())
    }

    fn set_finding(
        &mut self,
        variable: &VariableId,
        state: &StateSelector,
    ) -> Result<(), JpdError> {
        self.log
            .borrow_mut()
            .push(OracleCall::SetFinding(variable.clone(), state.clone()));
        let states = self.states(variable, StateLabeling::Symbolic)?;
        let idx = match state {
            StateSelector::ByName(name) => states
                .iter()
                .position(|s| s == name)
                .ok_or_else(|| JpdError::NotFound(name.clone()))?,
            StateSelector::ByIndex(idx) => *idx,
        };
        self.active.retain(|(v, _)| v != variable);
        self.active.push((variable.clone(), idx));
        self.active.sort();
        Ok(())
    }

    fn beliefs(&self, variable: &VariableId) -> Result<Vec<f64>, JpdError> {
        self.log.borrow_mut().push(OracleCall::Beliefs(
            variable.clone(),
            self.active.clone(),
        ));
        self.answers
            .get(&(self.active.clone(), variable.clone()))
            .cloned()
            .ok_or_else(|| {
                JpdError::Oracle(format!("no scripted answer for {variable} in {:?}", self.active))
            })
    }
}

/// A = {0, 1} with prior [0.6, 0.4]; B = {0, 1} with P(B | A=0) = [0.9, 0.1] and
/// P(B | A=1) = [0.2, 0.8].
pub fn golden_oracle() -> ScriptedOracle {
    init_logging();
    ScriptedOracle::default()
        .with_variable("A", &[("a0", "0.0"), ("a1", "1.0")])
        .with_variable("B", &[("b0", "0.0"), ("b1", "1.0")])
        .with_outputs(&["A", "B"])
        .answer(&[], "A", &[0.6, 0.4])
        .answer(&[], "B", &[0.62, 0.38])
        .answer(&[("A", 0)], "B", &[0.9, 0.1])
        .answer(&[("A", 1)], "B", &[0.2, 0.8])
        .answer(&[("B", 0)], "A", &[0.54 / 0.62, 0.08 / 0.62])
        .answer(&[("B", 1)], "A", &[0.06 / 0.38, 0.32 / 0.38])
}

/// The golden oracle plus a conditioning variable C = {c0, c1}. Given C=c0, A is certainly in
/// state a0; given C=c1, A and B behave as in the golden oracle with A uniform.
pub fn conditioned_oracle() -> ScriptedOracle {
    golden_oracle()
        .with_variable("C", &[("c0", "0"), ("c1", "1")])
        .with_outputs(&["B", "A"])
        .answer(&[("C", 0)], "A", &[1.0, 0.0])
        .answer(&[("C", 0)], "B", &[0.7, 0.3])
        .answer(&[("C", 0), ("A", 0)], "B", &[0.7, 0.3])
        .answer(&[("C", 1)], "A", &[0.5, 0.5])
        .answer(&[("C", 1)], "B", &[0.55, 0.45])
        .answer(&[("C", 1), ("A", 0)], "B", &[0.9, 0.1])
        .answer(&[("C", 1), ("A", 1)], "B", &[0.2, 0.8])
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
