//! Moment statistics over discrete distributions.
//!
//! Belief vectors are taken as given: no normalisation is performed, the caller guarantees that
//! a belief vector is a valid distribution under the context it was read in.

use serde::{Deserialize, Serialize};

use crate::{error::JpdError, table::JointTable};

/// A belief vector together with its first two moments against the variable's state values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentSummary {
    pub belief: Vec<f64>,
    #[serde(with = "nan_as_null")]
    pub mean: f64,
    #[serde(with = "nan_as_null")]
    pub std: f64,
}

impl MomentSummary {
    pub fn new(belief: Vec<f64>, values: &[f64]) -> Result<Self, JpdError> {
        let (mean, std) = moments(&belief, values)?;
        Ok(MomentSummary { belief, mean, std })
    }
}

/// Mean Σ vᵢ·pᵢ and standard deviation sqrt(Σ pᵢ·(vᵢ − mean)²).
pub fn moments(belief: &[f64], values: &[f64]) -> Result<(f64, f64), JpdError> {
    if belief.len() != values.len() {
        return Err(JpdError::DimensionMismatch {
            expected: values.len(),
            found: belief.len(),
        });
    }
    let mean: f64 = belief.iter().zip(values).map(|(p, v)| p * v).sum();
    let variance: f64 = belief
        .iter()
        .zip(values)
        .map(|(p, v)| p * (v - mean).powi(2))
        .sum();
    Ok((mean, variance.sqrt()))
}

/// Covariance of the pair encoded in `table`, using the table's own header values.
///
/// Rows zeroed by degenerate conditioning still occupy their slot and contribute nothing.
pub fn covariance(mean_a: f64, mean_b: f64, table: &JointTable) -> f64 {
    let a_values = table.a_values();
    let b_values = table.b_values();
    let mut cov = 0.0;
    for (i, a) in a_values.iter().enumerate() {
        for (j, b) in b_values.iter().enumerate() {
            cov += table.cell(i, j) * (b - mean_b) * (a - mean_a);
        }
    }
    cov
}

/// Serde adapter for statistics that use NaN as the "undefined" sentinel. JSON has no NaN, so
/// it travels as `null` and comes back as NaN.
pub(crate) mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(x: &f64, ser: S) -> Result<S::Ok, S::Error> {
        if x.is_nan() {
            ser.serialize_none()
        } else {
            ser.serialize_some(x)
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(de)?.unwrap_or(f64::NAN))
    }
}

/// Pearson correlation `cov / (std_a · std_b)`.
///
/// Returns `f64::NAN` when either standard deviation is exactly zero, which happens whenever a
/// variable is deterministic under the active conditioning.
pub fn correlation(std_a: f64, std_b: f64, cov: f64) -> f64 {
    if std_a == 0.0 || std_b == 0.0 {
        return f64::NAN;
    }
    cov / (std_a * std_b)
}
