//! Joint table reconstruction from single-variable belief queries.
//!
//! A joint table for (A, B) is assembled row by row with the chain rule: for every state `s` of
//! A the oracle is asked for P(B | A = s), and that vector is scaled by P(A = s) to give the
//! joint slice P(A = s, B = ·). Each query runs in its own [`FindingScope`], so the oracle is
//! always left without findings when a builder returns.
//!
//! [`FindingScope`]: crate::oracle::FindingScope

use crate::{
    diagnostic::JpdDiagnostic,
    error::JpdError,
    oracle::{BeliefOracle, BeliefSession},
    properties::{Conditioning, Finding, VariableId},
    stats::MomentSummary,
    table::JointTable,
};

/// Moment summary of `variable` with no findings entered.
pub fn prior_summary<O: BeliefOracle>(
    session: &mut BeliefSession<O>,
    variable: &VariableId,
) -> Result<MomentSummary, JpdError> {
    let values = session.numeric_states(variable)?;
    let belief = session.query(&[], variable)?;
    MomentSummary::new(belief, &values)
}

/// Moment summary of `variable` given the single finding `condition`.
pub fn conditional_summary<O: BeliefOracle>(
    session: &mut BeliefSession<O>,
    variable: &VariableId,
    condition: &Conditioning,
) -> Result<MomentSummary, JpdError> {
    let values = session.numeric_states(variable)?;
    let belief = session.query(&[condition.as_finding()], variable)?;
    MomentSummary::new(belief, &values)
}

/// Unconditioned joint table of (`a`, `b`). Interior cells sum to one.
pub fn build_jpd<O: BeliefOracle>(
    session: &mut BeliefSession<O>,
    a: &VariableId,
    b: &VariableId,
) -> Result<JointTable, JpdError> {
    let prior_a = prior_summary(session, a)?;
    let mut table = JointTable::new(
        &session.numeric_states(a)?,
        &session.numeric_states(b)?,
    );

    for (s, p_a) in prior_a.belief.iter().enumerate() {
        let posterior_b = session.query(&[Finding::by_index(a.clone(), s)], b)?;
        let joint: Vec<f64> = posterior_b.iter().map(|p| p * p_a).collect();
        table.set_row(s, &joint)?;
    }
    tracing::debug!("JPD({a}, {b}) sums to {}", table.interior_sum());
    Ok(table)
}

/// A conditional joint table and the degenerate rows found while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalJpd {
    pub table: JointTable,
    pub diagnostics: Vec<JpdDiagnostic>,
}

impl ConditionalJpd {
    pub fn degenerate_rows(&self) -> Vec<usize> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                JpdDiagnostic::DegenerateConditioning { state_index, .. } => Some(*state_index),
                _ => None,
            })
            .collect()
    }
}

/// Joint table of (`a`, `b`) given `condition`.
///
/// States of `a` with exactly zero mass under `condition` get a zero row and a
/// [`JpdDiagnostic::DegenerateConditioning`] instead of a query, since the combined evidence
/// would have zero probability. Every other row is queried under the two findings
/// {`condition` by name, `a` = s by index}.
pub fn build_conditional_jpd<O: BeliefOracle>(
    session: &mut BeliefSession<O>,
    a: &VariableId,
    b: &VariableId,
    condition: &Conditioning,
) -> Result<ConditionalJpd, JpdError> {
    let prior_a = conditional_summary(session, a, condition)?;
    let mut table = JointTable::new(
        &session.numeric_states(a)?,
        &session.numeric_states(b)?,
    );
    let mut diagnostics = Vec::new();

    for (s, p_a) in prior_a.belief.iter().enumerate() {
        if *p_a == 0.0 {
            let diagnostic = JpdDiagnostic::DegenerateConditioning {
                variable: a.clone(),
                state_index: s,
                condition: condition.clone(),
            };
            tracing::warn!("{diagnostic}, zero-filling row");
            diagnostics.push(diagnostic);
            continue;
        }
        let findings = [condition.as_finding(), Finding::by_index(a.clone(), s)];
        let posterior_b = session.query(&findings, b)?;
        let joint: Vec<f64> = posterior_b.iter().map(|p| p * p_a).collect();
        table.set_row(s, &joint)?;
    }
    tracing::debug!(
        "cJPD({a}, {b} | {condition}) sums to {}",
        table.interior_sum()
    );
    Ok(ConditionalJpd { table, diagnostics })
}
