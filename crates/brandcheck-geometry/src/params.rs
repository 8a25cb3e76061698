use serde::{Deserialize, Serialize};

/// Detection thresholds and score weights for [`crate::GeometryChecker`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryParams {
    /// Nominal Gaussian kernel size. Only used to derive the sigma when
    /// `blur_sigma <= 0`; the applied kernel extent is `⌈2σ⌉` on each side.
    pub blur_kernel_size: usize,
    /// Gaussian sigma; `<= 0` derives it from the kernel size.
    pub blur_sigma: f64,
    /// Circularity window `(min, max)`, both exclusive, of a logo candidate.
    pub min_circularity: f64,
    pub max_circularity: f64,
    /// Heuristic: solidity below this marks the logo as flipped.
    pub flip_solidity_threshold: f64,
    /// Heuristic: ellipse major/minor above this marks the logo as warped.
    pub warp_eccentricity_threshold: f64,
    /// Width over height of the reference logo.
    pub expected_aspect_ratio: f64,
    /// Relative aspect deviation tolerated without penalty.
    pub aspect_tolerance: f64,
    pub max_rotation_penalty: f64,
    /// Rotation overshoot, in degrees, that earns the full rotation penalty.
    pub rotation_penalty_span_deg: f64,
    pub flip_penalty: f64,
    pub warp_penalty: f64,
    pub max_aspect_penalty: f64,
    /// Aspect ratios outside this range get a recommendation.
    pub recommended_aspect_range: [f64; 2],
    /// Scale factors below `min_scale` or above `max_scale` get a recommendation.
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: 0.0,
            min_circularity: 0.2,
            max_circularity: 0.8,
            flip_solidity_threshold: 0.7,
            warp_eccentricity_threshold: 2.0,
            expected_aspect_ratio: 1.2,
            aspect_tolerance: 0.2,
            max_rotation_penalty: 0.5,
            rotation_penalty_span_deg: 45.0,
            flip_penalty: 0.3,
            warp_penalty: 0.4,
            max_aspect_penalty: 0.2,
            recommended_aspect_range: [0.8, 1.6],
            min_scale: 0.1,
            max_scale: 0.8,
        }
    }
}
