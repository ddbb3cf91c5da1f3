//! The narrow query interface to an inference engine, and the session that scopes its findings.
//!
//! An inference engine holds exactly one active finding context. [`BeliefSession`] owns the
//! engine and hands out [`FindingScope`] guards: acquiring a scope retracts whatever evidence
//! was left behind, and dropping it retracts again, so evidence never leaks from one query into
//! the next, including on error paths.

use crate::{
    error::JpdError,
    properties::{Finding, StateLabeling, StateSelector, VariableId},
};

/// Answers "what is the belief distribution over X given the active findings" queries.
pub trait BeliefOracle {
    /// Output variables in the engine's declaration order.
    fn output_variables(&self) -> Result<Vec<VariableId>, JpdError>;

    /// State labels of `variable`, in state index order.
    fn states(
        &self,
        variable: &VariableId,
        labeling: StateLabeling,
    ) -> Result<Vec<String>, JpdError>;

    /// Clear the active finding context. Must be idempotent.
    fn retract_findings(&mut self) -> Result<(), JpdError>;

    /// Enter one piece of evidence into the active context.
    fn set_finding(
        &mut self,
        variable: &VariableId,
        state: &StateSelector,
    ) -> Result<(), JpdError>;

    /// Posterior (or prior, for an empty context) distribution over the states of `variable`.
    fn beliefs(&self, variable: &VariableId) -> Result<Vec<f64>, JpdError>;
}

/// Parse the numeric titles of `variable`'s states.
pub fn numeric_states<O: BeliefOracle + ?Sized>(
    oracle: &O,
    variable: &VariableId,
) -> Result<Vec<f64>, JpdError> {
    oracle
        .states(variable, StateLabeling::Numeric)?
        .into_iter()
        .map(|label| {
            label
                .trim()
                .parse::<f64>()
                .map_err(|_| JpdError::InvalidStateLabel {
                    variable: variable.to_string(),
                    label,
                })
        })
        .collect()
}

/// Owns an oracle and serializes access to its finding context.
#[derive(Debug)]
pub struct BeliefSession<O> {
    oracle: O,
}

impl<O: BeliefOracle> BeliefSession<O> {
    pub fn new(oracle: O) -> Self {
        BeliefSession { oracle }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_inner(self) -> O {
        self.oracle
    }

    /// Retract all findings and open a fresh finding scope.
    pub fn scope(&mut self) -> Result<FindingScope<'_, O>, JpdError> {
        self.oracle.retract_findings()?;
        Ok(FindingScope {
            oracle: &mut self.oracle,
            active: Vec::new(),
        })
    }

    /// Beliefs over `target` given exactly `findings`.
    pub fn query(
        &mut self,
        findings: &[Finding],
        target: &VariableId,
    ) -> Result<Vec<f64>, JpdError> {
        let mut scope = self.scope()?;
        for finding in findings {
            scope.enter(finding.clone())?;
        }
        scope.beliefs(target)
    }

    pub fn output_variables(&self) -> Result<Vec<VariableId>, JpdError> {
        self.oracle.output_variables()
    }

    pub fn numeric_states(&self, variable: &VariableId) -> Result<Vec<f64>, JpdError> {
        numeric_states(&self.oracle, variable)
    }
}

/// An active finding context. Findings are retracted when the scope is dropped.
#[derive(Debug)]
pub struct FindingScope<'s, O: BeliefOracle> {
    oracle: &'s mut O,
    active: Vec<Finding>,
}

impl<O: BeliefOracle> FindingScope<'_, O> {
    pub fn enter(&mut self, finding: Finding) -> Result<(), JpdError> {
        tracing::debug!("Entering finding {finding}");
        self.oracle.set_finding(&finding.variable, &finding.state)?;
        self.active.push(finding);
        Ok(())
    }

    pub fn beliefs(&self, variable: &VariableId) -> Result<Vec<f64>, JpdError> {
        let beliefs = self.oracle.beliefs(variable)?;
        let expected = self.oracle.states(variable, StateLabeling::Symbolic)?.len();
        if beliefs.len() != expected {
            return Err(JpdError::DimensionMismatch {
                expected,
                found: beliefs.len(),
            });
        }
        Ok(beliefs)
    }

    pub fn findings(&self) -> &[Finding] {
        &self.active
    }
}

impl<O: BeliefOracle> Drop for FindingScope<'_, O> {
    fn drop(&mut self) {
        if let Err(e) = self.oracle.retract_findings() {
            tracing::warn!(
                "Failed to retract findings [{}] on scope exit: {e}",
                self.active
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<String>>()
                    .join(", ")
            );
        }
    }
}
