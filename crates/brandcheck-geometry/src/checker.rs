use brandcheck_core::{
    binarize, find_external_contours, fit_ellipse, gaussian_blur, otsu_threshold,
    ComplianceConfig, ConfigError, Contour, Ellipse, ImageError, RgbImageView,
};
use log::{debug, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{GeometryAnalysisResult, GeometryParams, LogoGeometry, NO_LOGO_REASON};

/// Message returned when no geometry issue was found.
pub const AFFIRMATIVE_MESSAGE: &str = "Logo geometry meets compliance requirements";

/// Errors that stop the geometry analysis before a logo can be searched for.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Checks logo pose and proportions against the configured limits.
#[derive(Clone, Debug, Default)]
pub struct GeometryChecker {
    config: ComplianceConfig,
    params: GeometryParams,
}

impl GeometryChecker {
    pub fn new(config: ComplianceConfig, params: GeometryParams) -> Self {
        Self { config, params }
    }

    /// Checker with default thresholds and weights.
    pub fn with_config(config: ComplianceConfig) -> Self {
        Self::new(config, GeometryParams::default())
    }

    #[inline]
    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    #[inline]
    pub fn params(&self) -> &GeometryParams {
        &self.params
    }

    /// Detect the logo and measure it. Never fails: errors become
    /// [`GeometryAnalysisResult::NotDetected`] carrying the error text.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn analyze(&self, image: &RgbImageView<'_>) -> GeometryAnalysisResult {
        match self.try_analyze(image) {
            Ok(result) => result,
            Err(err) => {
                warn!("geometry analysis failed: {err}");
                GeometryAnalysisResult::not_detected(err.to_string())
            }
        }
    }

    /// Fallible form of [`Self::analyze`]. A missing logo is still `Ok`.
    pub fn try_analyze(
        &self,
        image: &RgbImageView<'_>,
    ) -> Result<GeometryAnalysisResult, GeometryError> {
        self.config.validate()?;
        let gray = image.to_canonical_rgb()?.to_gray();
        let blurred = gaussian_blur(
            &gray.view(),
            self.params.blur_kernel_size,
            self.params.blur_sigma,
        );
        let threshold = otsu_threshold(&blurred.view());
        let mask = binarize(&blurred.view(), threshold);

        let contours = find_external_contours(&mask);
        let min_area = self.config.min_logo_area();
        let logo = contours
            .iter()
            .filter(|c| c.area() > min_area && self.is_logo_shape(c))
            .max_by(|a, b| a.area().total_cmp(&b.area()));
        debug!(
            "geometry: threshold={threshold}, {} contours, candidate={}",
            contours.len(),
            logo.is_some()
        );

        let Some(logo) = logo else {
            return Ok(GeometryAnalysisResult::not_detected(NO_LOGO_REASON));
        };
        let image_area = (gray.width * gray.height) as f64;
        Ok(GeometryAnalysisResult::Detected(
            self.measure(logo, image_area),
        ))
    }

    /// Arch-like outlines are neither round nor line-like.
    fn is_logo_shape(&self, contour: &Contour) -> bool {
        contour.circularity().is_some_and(|c| {
            c > self.params.min_circularity && c < self.params.max_circularity
        })
    }

    fn measure(&self, contour: &Contour, image_area: f64) -> LogoGeometry {
        let ellipse = if contour.len() >= 5 {
            fit_ellipse(&contour.points_f64())
        } else {
            None
        };

        let rotation_angle = rotation_angle(contour, ellipse.as_ref());
        let solidity = contour.solidity();
        let is_flipped = solidity.is_some_and(|s| s < self.params.flip_solidity_threshold);
        let eccentricity = ellipse.as_ref().and_then(Ellipse::axis_ratio);
        let is_warped =
            eccentricity.is_some_and(|e| e > self.params.warp_eccentricity_threshold);

        let bounding_box = contour.bounding_rect();
        let aspect_ratio = if bounding_box.height > 0 {
            bounding_box.width as f64 / bounding_box.height as f64
        } else {
            1.0
        };
        let contour_area = contour.area();
        let scale_factor = if image_area > 0.0 {
            (contour_area / image_area).sqrt()
        } else {
            1.0
        };

        let geometry_score =
            self.geometry_score(rotation_angle, is_flipped, is_warped, aspect_ratio);
        debug!(
            "logo: rot={rotation_angle:.1} flipped={is_flipped} warped={is_warped} \
             aspect={aspect_ratio:.2} scale={scale_factor:.2} score={geometry_score:.2}"
        );

        LogoGeometry {
            rotation_angle,
            is_flipped,
            is_warped,
            aspect_ratio,
            scale_factor,
            geometry_score,
            contour_area,
            bounding_box,
            circularity: contour.circularity().unwrap_or(0.0),
            solidity,
            eccentricity,
        }
    }

    /// Penalty score in `[0, 1]`.
    pub fn geometry_score(
        &self,
        rotation_angle: f64,
        is_flipped: bool,
        is_warped: bool,
        aspect_ratio: f64,
    ) -> f64 {
        let p = &self.params;
        let mut score = 1.0;

        let overshoot = rotation_angle - self.config.max_rotation_degrees;
        if overshoot > 0.0 {
            score -= (overshoot / p.rotation_penalty_span_deg).min(p.max_rotation_penalty);
        }
        if is_flipped {
            score -= p.flip_penalty;
        }
        if is_warped {
            score -= p.warp_penalty;
        }
        let ratio_diff = (aspect_ratio - p.expected_aspect_ratio).abs() / p.expected_aspect_ratio;
        if ratio_diff > p.aspect_tolerance {
            score -= ratio_diff.min(p.max_aspect_penalty);
        }
        score.clamp(0.0, 1.0)
    }

    /// Human-readable advice for a geometry result.
    pub fn recommendations(&self, result: &GeometryAnalysisResult) -> Vec<String> {
        let logo = match result {
            GeometryAnalysisResult::Detected(logo) => logo,
            GeometryAnalysisResult::NotDetected { reason } => {
                return vec![format!(
                    "Logo geometry could not be checked ({reason}). Ensure the logo is clearly visible"
                )];
            }
        };

        let p = &self.params;
        let max_rotation = self.config.max_rotation_degrees;
        let mut out = Vec::new();
        if logo.rotation_angle > max_rotation {
            out.push(format!(
                "Logo is rotated by {:.1}°. Ensure logo is not rotated more than {}°",
                logo.rotation_angle, max_rotation
            ));
        }
        if logo.is_flipped {
            out.push("Logo appears to be flipped. Use the original orientation only".to_string());
        }
        if logo.is_warped {
            out.push("Logo appears warped or stretched. Maintain original proportions".to_string());
        }
        let [lo, hi] = p.recommended_aspect_range;
        if logo.aspect_ratio < lo || logo.aspect_ratio > hi {
            out.push(format!(
                "Aspect ratio ({:.2}) is unusual. Ensure logo maintains proper proportions",
                logo.aspect_ratio
            ));
        }
        if logo.scale_factor < p.min_scale {
            out.push("Logo appears too small. Ensure adequate size for visibility".to_string());
        } else if logo.scale_factor > p.max_scale {
            out.push(
                "Logo appears too large relative to image. Consider appropriate sizing".to_string(),
            );
        }
        if out.is_empty() {
            out.push(AFFIRMATIVE_MESSAGE.to_string());
        }
        out
    }
}

/// Unsigned tilt in `[0, 90]`: the ellipse major axis when available,
/// otherwise the minimum-area rectangle.
fn rotation_angle(contour: &Contour, ellipse: Option<&Ellipse>) -> f64 {
    if let Some(e) = ellipse {
        let mut angle = e.angle_deg;
        if angle > 90.0 {
            angle -= 180.0;
        }
        return angle.abs();
    }
    match contour.min_area_rect() {
        Some(rect) => {
            let mut angle = rect.angle_deg;
            if angle < -45.0 {
                angle += 90.0;
            }
            angle.abs()
        }
        None => 0.0,
    }
}
