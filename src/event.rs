use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::mpsc::Sender;

use crate::{
    diagnostic::JpdDiagnostic,
    error::JpdError,
    properties::{Conditioning, VariableId},
};

/// Notifications emitted by a pair sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// `completed` of `total` pairs are done. `completed` never decreases within a sweep.
    Progress { completed: usize, total: usize },
    PairComplete {
        a: VariableId,
        b: VariableId,
        condition: Option<Conditioning>,
    },
    Diagnostic(JpdDiagnostic),
}

impl Event {
    pub fn fraction(&self) -> Option<f64> {
        match self {
            Event::Progress { completed, total } if *total > 0 => {
                Some(*completed as f64 / *total as f64)
            }
            Event::Progress { .. } => Some(1.0),
            _ => None,
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Event::Progress { completed, total } => write!(
                f,
                "Progress: {} % ({completed}/{total})",
                (100.0 * self.fraction().unwrap_or(1.0)) as u32
            ),
            Event::PairComplete {
                a,
                b,
                condition: Some(c),
            } => write!(f, "PairComplete({a}, {b} | {c})"),
            Event::PairComplete {
                a,
                b,
                condition: None,
            } => write!(f, "PairComplete({a}, {b})"),
            Event::Diagnostic(d) => write!(f, "Diagnostic({d})"),
        }
    }
}

/// Send `event` if a transmitter is attached. A hung-up receiver is logged, never fatal.
pub(crate) fn emit(tx: Option<&Sender<Event>>, event: Event) {
    if let Some(tx) = tx {
        if let Err(e) = tx.send(event) {
            let err: JpdError = e.into();
            tracing::debug!("Event receiver went away: {err}");
        }
    }
}
