use std::time::Instant;

use crate::color::ColorComplianceChecker;
use crate::core::{ImageError, RgbImageView};
use crate::geometry::GeometryChecker;
use crate::{AnalysisConfig, ComplianceReport};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Runs both checks on one image and builds the report.
///
/// Holds no per-image state; share it across threads freely.
#[derive(Clone, Debug)]
pub struct Analyzer {
    config: AnalysisConfig,
    color: ColorComplianceChecker,
    geometry: GeometryChecker,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let color = ColorComplianceChecker::new(config.compliance.clone(), config.color.clone());
        let geometry = GeometryChecker::new(config.compliance.clone(), config.geometry.clone());
        Self {
            config,
            color,
            geometry,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn color_checker(&self) -> &ColorComplianceChecker {
        &self.color
    }

    pub fn geometry_checker(&self) -> &GeometryChecker {
        &self.geometry
    }

    /// Analyze one image view.
    ///
    /// Analyzer failures are folded into the report, so this never fails.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn analyze(&self, image: &RgbImageView<'_>) -> ComplianceReport {
        let start = Instant::now();
        let color = self.color.analyze(image);
        let geometry = self.geometry.analyze(image);
        let mut report = ComplianceReport::build(color, geometry, &self.config);
        report.processing_time_ms = start.elapsed().as_secs_f64() * 1e3;
        log::debug!(
            "analyzed {}x{} image: {:?}, score {:.2}, {} violation(s) in {:.1} ms",
            image.width,
            image.height,
            report.overall_compliance,
            report.compliance_score,
            report.violations_count,
            report.processing_time_ms
        );
        report
    }

    /// Analyze a raw interleaved buffer in the configured channel order.
    pub fn analyze_raw(
        &self,
        width: usize,
        height: usize,
        data: &[u8],
    ) -> Result<ComplianceReport, ImageError> {
        let view = RgbImageView::new(width, height, data, self.config.channel_order);
        view.validate()?;
        Ok(self.analyze(&view))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChannelOrder, Rgb, RgbImage};
    use crate::ComplianceStatus;

    const GOLD: Rgb = Rgb::new(255, 188, 13);

    /// Gold arch on black: a block with a notch cut from the bottom edge.
    fn arch(fg: Rgb) -> RgbImage {
        let mut img = RgbImage::filled(200, 200, Rgb::new(0, 0, 0));
        for y in 50..150 {
            for x in 40..160 {
                if !(y >= 100 && (80..120).contains(&x)) {
                    img.set_pixel(x, y, fg);
                }
            }
        }
        img
    }

    #[test]
    fn upright_gold_arch_is_compliant() {
        let img = arch(GOLD);
        let report = Analyzer::default().analyze(&img.view());
        assert_eq!(report.overall_compliance, ComplianceStatus::Compliant);
        assert_eq!(report.compliance_score, 1.0);
        assert!(report.color_compliance && report.geometry_compliance);
        assert!(report.processing_time_ms >= 0.0);
    }

    #[test]
    fn red_arch_violates_color_rule() {
        let img = arch(Rgb::new(220, 30, 30));
        let report = Analyzer::default().analyze(&img.view());
        assert_eq!(report.overall_compliance, ComplianceStatus::NonCompliant);
        assert_eq!(report.critical_violations, 1);
        assert!(report.geometry_compliance);
    }

    #[test]
    fn raw_buffers_follow_configured_order() {
        let img = arch(GOLD);
        let bgr: Vec<u8> = img
            .data
            .chunks_exact(3)
            .flat_map(|p| [p[2], p[1], p[0]])
            .collect();

        let analyzer = Analyzer::new(AnalysisConfig {
            channel_order: ChannelOrder::Bgr,
            ..AnalysisConfig::default()
        });
        let report = analyzer.analyze_raw(200, 200, &bgr).unwrap();
        assert!(report.color_compliance);

        let err = analyzer.analyze_raw(200, 200, &bgr[..30]).unwrap_err();
        assert!(matches!(err, ImageError::BufferLength { .. }));
    }
}
