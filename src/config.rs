use crate::error::JpdError;
use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};

pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Upper end of the heatmap intensity scale.
pub const DEFAULT_HEATMAP_VMAX: f64 = 0.2;

pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 2;

/// Where the means and standard deviations used for covariance and correlation come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeanSource {
    /// Single-variable beliefs under the sweep's conditioning (the prior when unconditioned).
    #[default]
    Conditional,
    /// Marginals of the reconstructed joint table, read against its header values.
    JointMarginal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub vmax: f64,
    pub significant_digits: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            vmax: DEFAULT_HEATMAP_VMAX,
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Allowed deviation of a non-degenerate joint table's interior sum from one.
    pub tolerance: f64,
    pub mean_source: MeanSource,
    pub render: RenderConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            tolerance: DEFAULT_TOLERANCE,
            mean_source: MeanSource::default(),
            render: RenderConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(self) -> Result<Self, JpdError> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(JpdError::Command(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if !(self.render.vmax > 0.0 && self.render.vmax.is_finite()) {
            return Err(JpdError::Command(format!(
                "render.vmax must be finite and > 0, got {}",
                self.render.vmax
            )));
        }
        if self.render.significant_digits == 0 {
            return Err(JpdError::Command(
                "render.significant_digits must be > 0".to_string(),
            ));
        }
        Ok(self)
    }
}

pub trait AnalysisConfigProvider {
    fn get_config(&self) -> Result<AnalysisConfig, JpdError>;
    fn set_config(&self, config: &AnalysisConfig) -> Result<(), JpdError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }
}

impl AnalysisConfigProvider for TomlConfigProvider {
    fn get_config(&self) -> Result<AnalysisConfig, JpdError> {
        tracing::debug!("Attempting to read analysis config from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(AnalysisConfig::default());
        }
        let content = get_content(&self.path)?;
        let config: AnalysisConfig = toml::from_str(&content)?;
        config.validate()
    }

    fn set_config(&self, config: &AnalysisConfig) -> Result<(), JpdError> {
        tracing::debug!("Attempting to write analysis config to: {:?}", &self.path);
        let toml_string = toml::to_string(config)?;
        write(&self.path, toml_string)?;
        Ok(())
    }
}

pub fn get_content<P: AsRef<Path>>(path: P) -> Result<String, JpdError> {
    tracing::debug!("Reading {:?}", path.as_ref());
    Ok(read_to_string(path)?)
}
