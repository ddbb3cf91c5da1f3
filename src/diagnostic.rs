//! Non-fatal conditions recorded while building joint tables.
//!
//! These are expected edge cases of conditional analysis rather than failures: they are logged,
//! attached to the pair result they occurred in, and broadcast as events.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{
    properties::{Conditioning, VariableId},
    stats::nan_as_null,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JpdDiagnostic {
    /// State `state_index` of `variable` has zero mass under `condition`. Its row in the joint
    /// table was zero-filled instead of querying the oracle under zero-probability evidence.
    DegenerateConditioning {
        variable: VariableId,
        state_index: usize,
        condition: Conditioning,
    },
    /// `variable` has zero standard deviation, so its correlation is undefined and reported as
    /// NaN.
    ZeroVariance {
        variable: VariableId,
        condition: Option<Conditioning>,
    },
    /// The interior of a joint table does not sum to one within the configured tolerance.
    Unnormalized {
        a: VariableId,
        b: VariableId,
        #[serde(with = "nan_as_null")]
        sum: f64,
    },
}

impl JpdDiagnostic {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, JpdDiagnostic::DegenerateConditioning { .. })
    }
}

impl Display for JpdDiagnostic {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            JpdDiagnostic::DegenerateConditioning {
                variable,
                state_index,
                condition,
            } => write!(
                f,
                "zero belief for {variable} state #{state_index} given {condition}"
            ),
            JpdDiagnostic::ZeroVariance {
                variable,
                condition: Some(condition),
            } => write!(f, "{variable} is deterministic given {condition}"),
            JpdDiagnostic::ZeroVariance {
                variable,
                condition: None,
            } => write!(f, "{variable} is deterministic"),
            JpdDiagnostic::Unnormalized { a, b, sum } => {
                write!(f, "joint table ({a}, {b}) sums to {sum}")
            }
        }
    }
}
