//! Text rendering of joint tables and of a [`ResultSet`] as a symmetric grid.
//!
//! [`Heatmap`] draws one joint table. In a [`CorrelationGrid`] the diagonal carries the variable
//! labels, cells above the diagonal show the pair's heatmap and cells below it show the pair's
//! correlation.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Write};

use crate::{
    batch::ResultSet, config::RenderConfig, error::JpdError, properties::VariableId,
    table::JointTable,
};

/// Shades from zero to full intensity.
const SHADES: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridCell {
    Label(VariableId),
    /// Intensities in [0, 1]. The first row holds A's highest state, so the lowest states of
    /// both variables end up bottom-left.
    Heatmap(Vec<Vec<f64>>),
    Correlation(String),
    Empty,
}

impl GridCell {
    fn lines(&self) -> Vec<String> {
        match self {
            GridCell::Label(v) => vec![v.to_string()],
            GridCell::Correlation(text) => vec![text.clone()],
            GridCell::Heatmap(rows) => shade_rows(rows),
            GridCell::Empty => Vec::new(),
        }
    }
}

/// Intensity in [0, 1] to shade. Out-of-range values saturate, NaN renders blank.
fn shade(intensity: f64) -> char {
    let idx = (intensity.clamp(0.0, 1.0) * (SHADES.len() - 1) as f64).round() as usize;
    SHADES.get(idx).copied().unwrap_or(' ')
}

fn shade_rows(rows: &[Vec<f64>]) -> Vec<String> {
    rows.iter()
        .map(|row| row.iter().map(|i| shade(*i)).collect())
        .collect()
}

/// A single joint table drawn on its own, with A's state values down the left edge and B's
/// along the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    /// A's state values, highest state first.
    pub a_values: Vec<f64>,
    pub b_values: Vec<f64>,
    /// |P(A, B)| / vmax clipped to [0, 1], rows in the same order as `a_values`.
    pub intensities: Vec<Vec<f64>>,
    pub significant_digits: usize,
}

impl Heatmap {
    pub fn from_table(table: &JointTable, config: &RenderConfig) -> Self {
        Heatmap {
            a_values: table.a_values().into_iter().rev().collect(),
            b_values: table.b_values().to_vec(),
            intensities: table
                .interior()
                .into_iter()
                .rev()
                .map(|row| {
                    row.into_iter()
                        .map(|x| (x.abs() / config.vmax).clamp(0.0, 1.0))
                        .collect()
                })
                .collect(),
            significant_digits: config.significant_digits,
        }
    }
}

impl Display for Heatmap {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let label = |x: &f64| format_significant(*x, self.significant_digits);
        let width = self
            .a_values
            .iter()
            .chain(&self.b_values)
            .map(|x| label(x).chars().count())
            .max()
            .unwrap_or(0);
        for (value, shades) in self.a_values.iter().zip(shade_rows(&self.intensities)) {
            let cells: String = shades
                .chars()
                .map(|c| c.to_string().repeat(width))
                .collect::<Vec<String>>()
                .join(" ");
            writeln!(f, "{:>width$} | {cells}", label(value))?;
        }
        let axis = self
            .b_values
            .iter()
            .map(|x| format!("{:>width$}", label(x)))
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "{:>width$}   {axis}", "")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationGrid {
    pub labels: Vec<VariableId>,
    pub cells: Vec<Vec<GridCell>>,
}

impl CorrelationGrid {
    pub fn from_results(results: &ResultSet, config: &RenderConfig) -> Self {
        let labels = results.variables();
        let cells = labels
            .iter()
            .enumerate()
            .map(|(i, row_var)| {
                labels
                    .iter()
                    .enumerate()
                    .map(|(j, col_var)| {
                        if i == j {
                            return GridCell::Label(row_var.clone());
                        }
                        if j < i {
                            return results
                                .get(row_var, col_var)
                                .map(|p| {
                                    GridCell::Correlation(format_significant(
                                        p.correlation,
                                        config.significant_digits,
                                    ))
                                })
                                .unwrap_or(GridCell::Empty);
                        }
                        results
                            .pairs
                            .iter()
                            .find(|p| &p.a == row_var && &p.b == col_var)
                            .map(|p| {
                                GridCell::Heatmap(Heatmap::from_table(&p.table, config).intensities)
                            })
                            .unwrap_or(GridCell::Empty)
                    })
                    .collect()
            })
            .collect();
        CorrelationGrid { labels, cells }
    }

    pub fn to_text(&self) -> Result<String, JpdError> {
        let rendered: Vec<Vec<Vec<String>>> = self
            .cells
            .iter()
            .map(|row| row.iter().map(GridCell::lines).collect())
            .collect();
        let width = rendered
            .iter()
            .flatten()
            .flatten()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for row in &rendered {
            let height = row.iter().map(Vec::len).max().unwrap_or(0).max(1);
            for line_idx in 0..height {
                let line = row
                    .iter()
                    .map(|cell| {
                        let text = cell.get(line_idx).map(String::as_str).unwrap_or("");
                        format!("{text:<width$}")
                    })
                    .collect::<Vec<String>>()
                    .join(" | ");
                writeln!(out, "{}", line.trim_end())?;
            }
            writeln!(out)?;
        }
        Ok(out)
    }
}

impl Display for CorrelationGrid {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let text = self.to_text().map_err(|_| std::fmt::Error)?;
        write!(f, "{text}")
    }
}

/// Format `x` with `digits` significant digits in the manner of printf's `%g`, using Rust's
/// exponent notation (`1.2e-5`) when the exponent is out of range.
pub fn format_significant(x: f64, digits: usize) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);
    // Round first so that e.g. 0.999 at two digits lands on exponent 0.
    let rounded: f64 = format!("{:.*e}", digits - 1, x).parse().unwrap_or(x);
    let exponent = rounded.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= digits as i32 {
        let mantissa = format!("{:.*e}", digits - 1, x);
        return match mantissa.split_once('e') {
            Some((m, e)) => format!("{}e{e}", strip_zeros(m)),
            None => mantissa,
        };
    }
    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    strip_zeros(&format!("{rounded:.decimals$}")).to_string()
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
