//! Labeled joint probability table for one variable pair.

use serde::{Deserialize, Serialize};

use crate::error::JpdError;

/// An (n+1)×(m+1) matrix for the pair (A, B) with n = |States(A)| and m = |States(B)|.
///
/// Row 0 holds B's numeric state values, column 0 holds A's numeric state values, cell `[0][0]`
/// is unused and zero. Interior cell `[i+1][j+1]` is P(A = state i, B = state j).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct JointTable(Vec<Vec<f64>>);

impl TryFrom<Vec<Vec<f64>>> for JointTable {
    type Error = JpdError;

    /// Accepts a labeled matrix with a header row and rows of equal width.
    fn try_from(data: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        let width = match data.first() {
            Some(header) if !header.is_empty() => header.len(),
            _ => {
                return Err(JpdError::DimensionMismatch {
                    expected: 1,
                    found: 0,
                })
            }
        };
        if let Some(row) = data.iter().find(|row| row.len() != width) {
            return Err(JpdError::DimensionMismatch {
                expected: width,
                found: row.len(),
            });
        }
        Ok(JointTable(data))
    }
}

impl From<JointTable> for Vec<Vec<f64>> {
    fn from(table: JointTable) -> Self {
        table.0
    }
}

impl JointTable {
    /// A zero-filled table with headers taken from the given state values.
    pub fn new(a_values: &[f64], b_values: &[f64]) -> Self {
        let mut data = vec![vec![0.0; b_values.len() + 1]; a_values.len() + 1];
        data[0][1..].copy_from_slice(b_values);
        for (row, value) in data[1..].iter_mut().zip(a_values) {
            row[0] = *value;
        }
        JointTable(data)
    }

    /// Number of A states (interior rows).
    pub fn rows(&self) -> usize {
        self.0.len() - 1
    }

    /// Number of B states (interior columns).
    pub fn cols(&self) -> usize {
        self.0[0].len() - 1
    }

    /// Column 0 header: A's state values.
    pub fn a_values(&self) -> Vec<f64> {
        self.0[1..].iter().map(|row| row[0]).collect()
    }

    /// Row 0 header: B's state values.
    pub fn b_values(&self) -> &[f64] {
        &self.0[0][1..]
    }

    /// P(A = state `i`, B = state `j`).
    pub fn cell(&self, i: usize, j: usize) -> f64 {
        self.0[i + 1][j + 1]
    }

    /// Interior row `i`, the joint slice P(A = state `i`, B = ·).
    pub fn row(&self, i: usize) -> &[f64] {
        &self.0[i + 1][1..]
    }

    pub fn set_row(&mut self, i: usize, values: &[f64]) -> Result<(), JpdError> {
        if values.len() != self.cols() {
            return Err(JpdError::DimensionMismatch {
                expected: self.cols(),
                found: values.len(),
            });
        }
        if i >= self.rows() {
            return Err(JpdError::DimensionMismatch {
                expected: self.rows(),
                found: i + 1,
            });
        }
        self.0[i + 1][1..].copy_from_slice(values);
        Ok(())
    }

    pub fn interior(&self) -> Vec<Vec<f64>> {
        self.0[1..].iter().map(|row| row[1..].to_vec()).collect()
    }

    pub fn interior_sum(&self) -> f64 {
        self.0[1..].iter().flat_map(|row| &row[1..]).sum()
    }

    /// Row sums: the distribution of A implied by the table.
    pub fn marginal_a(&self) -> Vec<f64> {
        self.0[1..].iter().map(|row| row[1..].iter().sum()).collect()
    }

    /// Column sums: the distribution of B implied by the table.
    pub fn marginal_b(&self) -> Vec<f64> {
        (0..self.cols())
            .map(|j| self.0[1..].iter().map(|row| row[j + 1]).sum())
            .collect()
    }

    /// The full labeled matrix, headers included.
    pub fn as_matrix(&self) -> &[Vec<f64>] {
        &self.0
    }
}
