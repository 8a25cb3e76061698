use brandcheck_core::Rgb;
use serde::{Deserialize, Serialize};

/// Rectangle relative to the image size, with a confidence in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: f64,
    /// Bounding-box area in pixels.
    pub area: u64,
}

/// Outcome of [`crate::ColorComplianceChecker::analyze`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorAnalysisResult {
    /// Cluster centroids, most populous first.
    pub dominant_colors: Vec<Rgb>,
    /// Any dominant color lies within tolerance of the target.
    pub golden_match: bool,
    /// Compliant ratio scaled and clamped to `[0, 1]`.
    pub accuracy_score: f64,
    pub non_compliant_regions: Vec<NormalizedRegion>,
    /// Raw fraction of pixels within tolerance of the target.
    pub compliant_pixel_ratio: f64,
    pub total_pixels: usize,
    /// Set when the analysis could not run; every other field is then zeroed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ColorAnalysisResult {
    /// Zero result carrying a diagnostic.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            dominant_colors: Vec::new(),
            golden_match: false,
            accuracy_score: 0.0,
            non_compliant_regions: Vec::new(),
            compliant_pixel_ratio: 0.0,
            total_pixels: 0,
            error: Some(reason.into()),
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
