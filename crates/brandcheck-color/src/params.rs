use serde::{Deserialize, Serialize};

/// Tuning knobs for [`crate::ColorComplianceChecker`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorParams {
    /// Number of dominant colors to extract.
    pub clusters: usize,
    /// Seed of the k-means++ initialization; fixed so reports are reproducible.
    pub seed: u64,
    /// Independent k-means runs; the lowest-inertia run wins.
    pub restarts: usize,
    /// Lloyd iteration cap per run.
    pub max_iters: usize,
    /// Stop a run once no centroid moves further than this (channel units).
    pub convergence_eps: f64,
    /// Multiplier applied to the compliant ratio before clamping to `[0, 1]`.
    pub accuracy_scale: f64,
    /// Minimum bounding-box area of a reported region, as a fraction of the image.
    pub min_region_area_frac: f64,
    /// Cluster at most this many pixels, sampled on a fixed stride.
    ///
    /// `None` (or `Some(0)`) clusters every pixel. Each k-means restart costs
    /// `O(unique colors · clusters)` per iteration, so a photo with a few
    /// hundred thousand distinct colors takes seconds with the default ten
    /// restarts; a cap around `100_000` keeps it well under one. Coverage and
    /// regions always use every pixel.
    pub max_cluster_samples: Option<usize>,
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            clusters: 5,
            seed: 42,
            restarts: 10,
            max_iters: 300,
            convergence_eps: 1e-4,
            accuracy_scale: 2.0,
            min_region_area_frac: 0.01,
            max_cluster_samples: None,
        }
    }
}
