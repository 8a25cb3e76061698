use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Brand thresholds shared by every analyzer.
///
/// The value is owned by the caller and threaded into each checker at
/// construction time; analyzers only ever read it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Brand color the logo must be rendered in.
    pub target_color: Rgb,
    /// Maximum Euclidean RGB distance still counted as the brand color.
    pub color_tolerance: u32,
    /// Largest acceptable logo rotation, in degrees.
    pub max_rotation_degrees: f64,
    /// Minimum side length (pixels) of a logo candidate; the area filter is `min_logo_size²`.
    pub min_logo_size: u32,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            target_color: Rgb::new(255, 188, 13),
            color_tolerance: 10,
            max_rotation_degrees: 5.0,
            min_logo_size: 50,
        }
    }
}

/// Rejected configuration values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("max_rotation_degrees must be finite and >= 0 (got {0})")]
    MaxRotation(f64),
}

impl ComplianceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_rotation_degrees.is_finite() || self.max_rotation_degrees < 0.0 {
            return Err(ConfigError::MaxRotation(self.max_rotation_degrees));
        }
        Ok(())
    }

    /// Minimum contour area, in square pixels, for a logo candidate.
    #[inline]
    pub fn min_logo_area(&self) -> f64 {
        let side = self.min_logo_size as f64;
        side * side
    }
}
