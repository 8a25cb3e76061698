//! Aggregation of analyzer results into rule violations and a verdict.

use serde::{Deserialize, Serialize};

use crate::color::{
    ColorAnalysisResult, ColorComplianceChecker, NormalizedRegion,
    AFFIRMATIVE_MESSAGE as COLOR_OK,
};
use crate::geometry::{
    GeometryAnalysisResult, GeometryChecker, AFFIRMATIVE_MESSAGE as GEOMETRY_OK,
};
use crate::AnalysisConfig;

/// Brand rules checked by the analyzers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandRule {
    GoldColorOnly,
    NoRotation,
    NoFlipping,
    NoWarpingStretching,
    LogoNotDetected,
}

impl BrandRule {
    /// Short statement of the rule.
    pub fn summary(self) -> &'static str {
        match self {
            Self::GoldColorOnly => "Use only the approved brand color",
            Self::NoRotation => "Logo must not be rotated from its original orientation",
            Self::NoFlipping => "Logo must not be horizontally or vertically flipped",
            Self::NoWarpingStretching => "Logo proportions must remain unchanged",
            Self::LogoNotDetected => "A logo must be visible for geometry checks",
        }
    }

    /// Rules evaluated from the geometry result.
    pub fn is_geometry(self) -> bool {
        matches!(
            self,
            Self::NoRotation | Self::NoFlipping | Self::NoWarpingStretching | Self::LogoNotDetected
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: BrandRule,
    pub severity: Severity,
    pub confidence: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<NormalizedRegion>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    PendingReview,
}

/// Combined verdict for one image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub overall_compliance: ComplianceStatus,
    pub compliance_score: f64,
    pub violations: Vec<RuleViolation>,
    pub violations_count: usize,
    pub critical_violations: usize,
    pub recommendations: Vec<String>,
    /// The brand color was found among the dominant colors.
    pub color_compliance: bool,
    /// A logo was detected and no geometry rule was violated.
    pub geometry_compliance: bool,
    pub color: ColorAnalysisResult,
    pub geometry: GeometryAnalysisResult,
    /// Wall time of both analyzers; zero when the report was built directly.
    #[serde(default)]
    pub processing_time_ms: f64,
}

impl ComplianceReport {
    /// Turn analyzer results into violations, a score and a status.
    ///
    /// A failed color analysis raises no color violation but keeps the
    /// report in review; it never reads as compliant.
    pub fn build(
        color: ColorAnalysisResult,
        geometry: GeometryAnalysisResult,
        config: &AnalysisConfig,
    ) -> Self {
        let violations = collect_violations(&color, &geometry, config);
        let critical_violations = violations
            .iter()
            .filter(|v| v.severity == Severity::Critical)
            .count();
        let compliance_score = (1.0
            - 0.2 * violations.len() as f64
            - 0.3 * critical_violations as f64)
            .max(0.0);

        let overall_compliance = if critical_violations > 0 {
            ComplianceStatus::NonCompliant
        } else if !violations.is_empty() || !color.is_ok() {
            ComplianceStatus::PendingReview
        } else {
            ComplianceStatus::Compliant
        };

        let color_recs = ColorComplianceChecker::new(config.compliance.clone(), config.color.clone())
            .recommendations_for(&color);
        let geometry_recs =
            GeometryChecker::new(config.compliance.clone(), config.geometry.clone())
                .recommendations(&geometry);
        let recommendations = merge_recommendations(color_recs, geometry_recs);

        let color_compliance = color.is_ok() && color.golden_match;
        let geometry_compliance =
            geometry.is_detected() && !violations.iter().any(|v| v.rule.is_geometry());

        Self {
            overall_compliance,
            compliance_score,
            violations_count: violations.len(),
            critical_violations,
            violations,
            recommendations,
            color_compliance,
            geometry_compliance,
            color,
            geometry,
            processing_time_ms: 0.0,
        }
    }

    #[inline]
    pub fn is_compliant(&self) -> bool {
        self.overall_compliance == ComplianceStatus::Compliant
    }
}

fn collect_violations(
    color: &ColorAnalysisResult,
    geometry: &GeometryAnalysisResult,
    config: &AnalysisConfig,
) -> Vec<RuleViolation> {
    let max_rotation = config.compliance.max_rotation_degrees;
    let mut out = Vec::new();

    match geometry {
        GeometryAnalysisResult::Detected(logo) => {
            if logo.rotation_angle > max_rotation {
                out.push(RuleViolation {
                    rule: BrandRule::NoRotation,
                    severity: Severity::Medium,
                    confidence: 0.92,
                    description: format!(
                        "Logo rotated by {:.1}° (max allowed: {}°)",
                        logo.rotation_angle, max_rotation
                    ),
                    bounding_box: None,
                });
            }
            if logo.is_flipped {
                out.push(RuleViolation {
                    rule: BrandRule::NoFlipping,
                    severity: Severity::High,
                    confidence: 0.98,
                    description: "Logo appears to be horizontally flipped".to_string(),
                    bounding_box: None,
                });
            }
            if logo.is_warped {
                let description = match logo.eccentricity {
                    Some(e) => format!("Logo appears warped or stretched (axis ratio {e:.2})"),
                    None => "Logo appears warped or stretched".to_string(),
                };
                out.push(RuleViolation {
                    rule: BrandRule::NoWarpingStretching,
                    severity: Severity::High,
                    confidence: 0.90,
                    description,
                    bounding_box: None,
                });
            }
        }
        GeometryAnalysisResult::NotDetected { reason } => out.push(RuleViolation {
            rule: BrandRule::LogoNotDetected,
            severity: Severity::Low,
            confidence: 1.0,
            description: reason.clone(),
            bounding_box: None,
        }),
    }

    if color.is_ok() && !color.golden_match {
        let target = config.compliance.target_color;
        let largest = color
            .non_compliant_regions
            .iter()
            .max_by_key(|r| r.area)
            .copied();
        out.push(RuleViolation {
            rule: BrandRule::GoldColorOnly,
            severity: Severity::Critical,
            confidence: 0.85,
            description: format!(
                "Logo color does not match the brand color {} ({})",
                target.to_hex(),
                target
            ),
            bounding_box: largest,
        });
    }
    out
}

/// Color advice first, then geometry advice. Affirmative messages are only
/// kept when nothing else was said.
fn merge_recommendations(color: Vec<String>, geometry: Vec<String>) -> Vec<String> {
    let is_affirmative = |s: &String| s == COLOR_OK || s == GEOMETRY_OK;
    let all: Vec<String> = color.into_iter().chain(geometry).collect();
    let has_issue = all.iter().any(|s| !is_affirmative(s));

    let mut out: Vec<String> = Vec::with_capacity(all.len());
    for rec in all {
        if has_issue && is_affirmative(&rec) {
            continue;
        }
        if !out.contains(&rec) {
            out.push(rec);
        }
    }
    out
}
