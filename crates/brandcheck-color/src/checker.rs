use std::collections::HashMap;

use brandcheck_core::{
    find_external_contours, BinaryMask, ComplianceConfig, ImageError, Rgb, RgbImage, RgbImageView,
};
use log::{debug, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::kmeans::{weighted_kmeans, KMeansParams};
use crate::{ColorAnalysisResult, ColorParams, NormalizedRegion};

/// Reasons a color analysis cannot produce a result.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ColorAnalysisError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("cluster count must be at least 1")]
    NoClusters,
    #[error("clustering produced no centroids ({unique} unique colors)")]
    ClusteringFailed { unique: usize },
}

/// Checks that an image is rendered in the configured brand color.
#[derive(Clone, Debug, Default)]
pub struct ColorComplianceChecker {
    config: ComplianceConfig,
    params: ColorParams,
}

impl ColorComplianceChecker {
    pub fn new(config: ComplianceConfig, params: ColorParams) -> Self {
        Self { config, params }
    }

    /// Checker with default tuning.
    pub fn with_config(config: ComplianceConfig) -> Self {
        Self::new(config, ColorParams::default())
    }

    #[inline]
    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    #[inline]
    pub fn params(&self) -> &ColorParams {
        &self.params
    }

    /// Analyze an image. Never fails: problems are reported in
    /// [`ColorAnalysisResult::error`] with every score zeroed.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn analyze(&self, image: &RgbImageView<'_>) -> ColorAnalysisResult {
        match self.try_analyze(image) {
            Ok(result) => result,
            Err(err) => {
                warn!("color analysis failed: {err}");
                ColorAnalysisResult::failed(err.to_string())
            }
        }
    }

    /// Fallible form of [`Self::analyze`].
    pub fn try_analyze(
        &self,
        image: &RgbImageView<'_>,
    ) -> Result<ColorAnalysisResult, ColorAnalysisError> {
        let rgb = image.to_canonical_rgb()?;
        let target = self.config.target_color;
        let tolerance = self.config.color_tolerance;

        let dominant_colors = self.dominant_colors(&rgb)?;
        let golden_match = dominant_colors.iter().any(|c| c.within(target, tolerance));

        let total_pixels = rgb.width * rgb.height;
        let mut distances = Vec::with_capacity(total_pixels);
        let mut compliant = 0usize;
        let mut off_target = BinaryMask::new(rgb.width, rgb.height);
        for (i, px) in rgb.pixels().enumerate() {
            distances.push(px.distance(target));
            if px.within(target, tolerance) {
                compliant += 1;
            } else {
                off_target.data[i] = true;
            }
        }

        let compliant_pixel_ratio = compliant as f64 / total_pixels as f64;
        let accuracy_score = (compliant_pixel_ratio * self.params.accuracy_scale).clamp(0.0, 1.0);
        let non_compliant_regions = self.non_compliant_regions(&off_target, &distances);

        debug!(
            "color: {} dominant, match={}, ratio={:.3}, {} regions",
            dominant_colors.len(),
            golden_match,
            compliant_pixel_ratio,
            non_compliant_regions.len()
        );

        Ok(ColorAnalysisResult {
            dominant_colors,
            golden_match,
            accuracy_score,
            non_compliant_regions,
            compliant_pixel_ratio,
            total_pixels,
            error: None,
        })
    }

    /// Dominant colors of an image, most populous cluster first.
    pub fn dominant_colors(&self, rgb: &RgbImage) -> Result<Vec<Rgb>, ColorAnalysisError> {
        if self.params.clusters == 0 {
            return Err(ColorAnalysisError::NoClusters);
        }

        let total = rgb.width * rgb.height;
        let stride = match self.params.max_cluster_samples {
            Some(n) if n > 0 && total > n => total.div_ceil(n),
            _ => 1,
        };

        let mut counts: HashMap<Rgb, u64> = HashMap::new();
        for px in rgb.pixels().step_by(stride) {
            *counts.entry(px).or_default() += 1;
        }
        let mut unique: Vec<(Rgb, u64)> = counts.into_iter().collect();
        unique.sort_unstable_by_key(|(c, _)| c.to_array());

        let points: Vec<[f64; 3]> = unique
            .iter()
            .map(|(c, _)| [c.r as f64, c.g as f64, c.b as f64])
            .collect();
        let weights: Vec<f64> = unique.iter().map(|&(_, n)| n as f64).collect();

        let kmeans = KMeansParams {
            k: self.params.clusters,
            seed: self.params.seed,
            restarts: self.params.restarts,
            max_iters: self.params.max_iters,
            convergence_eps: self.params.convergence_eps,
        };
        let clustering = weighted_kmeans(&points, &weights, &kmeans).ok_or(
            ColorAnalysisError::ClusteringFailed {
                unique: unique.len(),
            },
        )?;
        debug!(
            "kmeans: {} unique colors -> {} clusters in {} iterations",
            unique.len(),
            clustering.centroids.len(),
            clustering.iterations
        );

        let mut ranked: Vec<(Rgb, f64)> = clustering
            .centroids
            .iter()
            .zip(&clustering.weights)
            .map(|(c, &w)| {
                let ch = |v: f64| v.round().clamp(0.0, 255.0) as u8;
                (Rgb::new(ch(c[0]), ch(c[1]), ch(c[2])), w)
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.0.to_array().cmp(&b.0.to_array()))
        });
        Ok(ranked.into_iter().map(|(c, _)| c).collect())
    }

    fn non_compliant_regions(&self, mask: &BinaryMask, distances: &[f64]) -> Vec<NormalizedRegion> {
        let (w, h) = (mask.width, mask.height);
        let min_area = (w * h) as f64 * self.params.min_region_area_frac;

        find_external_contours(mask)
            .iter()
            .filter_map(|contour| {
                let rect = contour.bounding_rect();
                if rect.area() as f64 <= min_area {
                    return None;
                }
                let mut sum = 0.0;
                for y in rect.y..rect.y + rect.height {
                    let row = &distances[y * w + rect.x..y * w + rect.x + rect.width];
                    sum += row.iter().sum::<f64>();
                }
                let mean = sum / rect.area() as f64;
                Some(NormalizedRegion {
                    x: rect.x as f64 / w as f64,
                    y: rect.y as f64 / h as f64,
                    width: rect.width as f64 / w as f64,
                    height: rect.height as f64 / h as f64,
                    confidence: (1.0 - mean / 255.0).clamp(0.0, 1.0),
                    area: rect.area() as u64,
                })
            })
            .collect()
    }

    /// Whether a hex color (`#RRGGBB` or `RRGGBB`) is within tolerance of the
    /// target. Malformed input is simply not a match.
    pub fn validate_hex_color(&self, hex: &str) -> bool {
        match Rgb::from_hex(hex) {
            Ok(c) => c.within(self.config.target_color, self.config.color_tolerance),
            Err(err) => {
                debug!("rejecting hex color {hex:?}: {err}");
                false
            }
        }
    }

    /// Analyze `image` and turn the result into advice.
    pub fn recommendations(&self, image: &RgbImageView<'_>) -> Vec<String> {
        self.recommendations_for(&self.analyze(image))
    }

    /// Advice derived from an existing result.
    pub fn recommendations_for(&self, result: &ColorAnalysisResult) -> Vec<String> {
        if let Some(reason) = &result.error {
            return vec![format!("Unable to analyze color compliance: {reason}")];
        }

        let target = self.config.target_color;
        let mut out = Vec::new();
        if !result.golden_match {
            out.push(format!(
                "Use the approved brand color: {} or {}",
                target,
                target.to_hex()
            ));
        }
        if result.accuracy_score < 0.8 {
            out.push("Ensure consistent color application across the entire logo".to_string());
        }
        if result.compliant_pixel_ratio < 0.5 {
            out.push("Increase the proportion of the brand color in the logo".to_string());
        }
        if result.non_compliant_regions.len() > 3 {
            out.push(
                "Reduce color variations - the logo should use a uniform brand color".to_string(),
            );
        }
        if out.is_empty() {
            out.push(AFFIRMATIVE_MESSAGE.to_string());
        }
        out
    }
}

/// Message returned when no color issue was found.
pub const AFFIRMATIVE_MESSAGE: &str = "Color usage meets brand guidelines";
