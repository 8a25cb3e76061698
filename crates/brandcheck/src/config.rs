//! JSON configuration bundling every analyzer's settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::ColorParams;
use crate::core::{ChannelOrder, ComplianceConfig, ConfigError};
use crate::geometry::GeometryParams;

#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Full analysis configuration. Missing sections fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub compliance: ComplianceConfig,
    pub color: ColorParams,
    pub geometry: GeometryParams,
    /// Channel order of raw buffers passed to [`crate::Analyzer::analyze_raw`].
    pub channel_order: ChannelOrder,
}

impl AnalysisConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigLoadError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.compliance.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON config from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigLoadError> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
