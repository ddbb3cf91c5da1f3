//! Pairwise sweeps over the output variables of an oracle.
//!
//! [`PairSweep`] enumerates every unordered pair of output variables, builds each pair's joint
//! table and derives covariance and correlation from it. Oracle errors abort the sweep at the
//! failing pair and are returned unchanged; there is no retry.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

use crate::{
    config::{AnalysisConfig, MeanSource},
    diagnostic::JpdDiagnostic,
    error::JpdError,
    event::{emit, Event},
    jpd::{build_conditional_jpd, build_jpd, conditional_summary, prior_summary},
    oracle::{BeliefOracle, BeliefSession},
    properties::{Conditioning, VariableId},
    stats::{correlation, covariance, moments, nan_as_null, MomentSummary},
    table::JointTable,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    pub a: VariableId,
    pub b: VariableId,
    pub table: JointTable,
    #[serde(with = "nan_as_null")]
    pub covariance: f64,
    /// NaN when either variable has zero standard deviation. Serialized as `null` then.
    #[serde(with = "nan_as_null")]
    pub correlation: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<JpdDiagnostic>,
}

impl PairResult {
    pub fn involves(&self, a: &VariableId, b: &VariableId) -> bool {
        (&self.a == a && &self.b == b) || (&self.a == b && &self.b == a)
    }
}

/// All pair results for one conditioning state (or none, for the unconditioned sweep).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResultSet {
    pub condition: Option<Conditioning>,
    pub pairs: Vec<PairResult>,
}

impl ResultSet {
    /// The result for the unordered pair {`a`, `b`}.
    pub fn get(&self, a: &VariableId, b: &VariableId) -> Option<&PairResult> {
        self.pairs.iter().find(|p| p.involves(a, b))
    }

    /// Variables in the order they first appear in the pair list.
    pub fn variables(&self) -> Vec<VariableId> {
        let mut seen: Vec<VariableId> = Vec::new();
        for pair in &self.pairs {
            for v in [&pair.a, &pair.b] {
                if !seen.contains(v) {
                    seen.push(v.clone());
                }
            }
        }
        seen
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &JpdDiagnostic> {
        self.pairs.iter().flat_map(|p| p.diagnostics.iter())
    }
}

/// Unordered pairs without repetition, in combinatorial order over `variables`.
pub fn unordered_pairs(variables: &[VariableId]) -> Vec<(VariableId, VariableId)> {
    variables
        .iter()
        .enumerate()
        .flat_map(|(i, a)| variables[i + 1..].iter().map(move |b| (a.clone(), b.clone())))
        .collect()
}

pub struct PairSweep<O> {
    session: BeliefSession<O>,
    config: AnalysisConfig,
    tx: Option<Sender<Event>>,
}

impl<O: BeliefOracle> PairSweep<O> {
    pub fn new(oracle: O, config: AnalysisConfig, tx: Option<Sender<Event>>) -> Self {
        PairSweep {
            session: BeliefSession::new(oracle),
            config,
            tx,
        }
    }

    /// A sweep with the default configuration and no event transmitter.
    pub fn simple(oracle: O) -> Self {
        PairSweep::new(oracle, AnalysisConfig::default(), None)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn session(&mut self) -> &mut BeliefSession<O> {
        &mut self.session
    }

    pub fn into_inner(self) -> O {
        self.session.into_inner()
    }

    /// Joint tables, covariances and correlations for every pair of output variables, in the
    /// oracle's output-variable order.
    pub fn all_pairs(&mut self) -> Result<ResultSet, JpdError> {
        let variables = self.session.output_variables()?;
        let pairs = unordered_pairs(&variables);
        let total = pairs.len();
        tracing::info!(
            "Computing JPDs for {total} pairs of {} output variables",
            variables.len()
        );

        let mut results = Vec::with_capacity(total);
        for (completed, (a, b)) in pairs.into_iter().enumerate() {
            let summaries = match self.config.mean_source {
                MeanSource::Conditional => Some((
                    prior_summary(&mut self.session, &a)?,
                    prior_summary(&mut self.session, &b)?,
                )),
                MeanSource::JointMarginal => None,
            };
            let table = build_jpd(&mut self.session, &a, &b)?;
            results.push(self.finish_pair(a, b, table, summaries, None, Vec::new())?);
            self.progress(completed + 1, total);
        }
        Ok(ResultSet {
            condition: None,
            pairs: results,
        })
    }

    /// One [`ResultSet`] per state in `states`, in the given order, each conditioned on
    /// `variable` being in that state. Output variables are sorted by name before pairing.
    pub fn all_conditional_pairs(
        &mut self,
        variable: &VariableId,
        states: &[String],
    ) -> Result<Vec<ResultSet>, JpdError> {
        let mut variables = self.session.output_variables()?;
        variables.sort();
        let pairs = unordered_pairs(&variables);
        let total = pairs.len() * states.len();
        tracing::info!(
            "Computing conditional JPDs for {} pairs over {} states of {variable}",
            pairs.len(),
            states.len()
        );

        let mut batch = Vec::with_capacity(states.len());
        let mut completed = 0;
        for state in states {
            let condition = Conditioning::new(variable.clone(), state.clone());
            let mut results = Vec::with_capacity(pairs.len());
            for (a, b) in &pairs {
                let summaries = match self.config.mean_source {
                    MeanSource::Conditional => Some((
                        conditional_summary(&mut self.session, a, &condition)?,
                        conditional_summary(&mut self.session, b, &condition)?,
                    )),
                    MeanSource::JointMarginal => None,
                };
                let cjpd = build_conditional_jpd(&mut self.session, a, b, &condition)?;
                results.push(self.finish_pair(
                    a.clone(),
                    b.clone(),
                    cjpd.table,
                    summaries,
                    Some(&condition),
                    cjpd.diagnostics,
                )?);
                completed += 1;
                self.progress(completed, total);
            }
            batch.push(ResultSet {
                condition: Some(condition),
                pairs: results,
            });
        }
        Ok(batch)
    }

    fn finish_pair(
        &self,
        a: VariableId,
        b: VariableId,
        table: JointTable,
        summaries: Option<(MomentSummary, MomentSummary)>,
        condition: Option<&Conditioning>,
        mut diagnostics: Vec<JpdDiagnostic>,
    ) -> Result<PairResult, JpdError> {
        let ((mean_a, std_a), (mean_b, std_b)) = match summaries {
            Some((summary_a, summary_b)) => (
                (summary_a.mean, summary_a.std),
                (summary_b.mean, summary_b.std),
            ),
            None => (
                moments(&table.marginal_a(), &table.a_values())?,
                moments(&table.marginal_b(), table.b_values())?,
            ),
        };

        let sum = table.interior_sum();
        if (sum - 1.0).abs() > self.config.tolerance {
            let diagnostic = JpdDiagnostic::Unnormalized {
                a: a.clone(),
                b: b.clone(),
                sum,
            };
            tracing::warn!("{diagnostic}");
            diagnostics.push(diagnostic);
        }
        for (variable, std) in [(&a, std_a), (&b, std_b)] {
            if std == 0.0 {
                let diagnostic = JpdDiagnostic::ZeroVariance {
                    variable: variable.clone(),
                    condition: condition.cloned(),
                };
                tracing::debug!("{diagnostic}, correlation is NaN");
                diagnostics.push(diagnostic);
            }
        }

        let cov = covariance(mean_a, mean_b, &table);
        let cor = correlation(std_a, std_b, cov);
        tracing::debug!("({a}, {b}): covariance {cov}, correlation {cor}");

        for diagnostic in &diagnostics {
            emit(self.tx.as_ref(), Event::Diagnostic(diagnostic.clone()));
        }
        emit(
            self.tx.as_ref(),
            Event::PairComplete {
                a: a.clone(),
                b: b.clone(),
                condition: condition.cloned(),
            },
        );
        Ok(PairResult {
            a,
            b,
            table,
            covariance: cov,
            correlation: cor,
            diagnostics,
        })
    }

    fn progress(&self, completed: usize, total: usize) {
        let event = Event::Progress { completed, total };
        tracing::info!("{event}");
        emit(self.tx.as_ref(), event);
    }
}
