//! High-level facade crate for the `brandcheck-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the color and geometry analyzers,
//! - an [`Analyzer`] that runs both checks and folds them into a
//!   [`ComplianceReport`] with rule violations and a verdict,
//! - a JSON [`AnalysisConfig`] bundling every tunable,
//! - (feature-gated) helpers that decode image files and analyze batches.
//!
//! ## Quickstart
//!
//! ```no_run
//! use brandcheck::{analyze, AnalysisConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnalysisConfig::default();
//! let report = analyze::analyze_path("logo.png", &config)?;
//! println!("{:?} ({:.2})", report.overall_compliance, report.compliance_score);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `brandcheck::core`: pixel views, colors, thresholding, contours, ellipse fitting.
//! - `brandcheck::color`: dominant colors and brand-color matching.
//! - `brandcheck::geometry`: logo outline, rotation, flip and warp checks.
//! - `brandcheck::report`: rule violations and the aggregated verdict.
//! - `brandcheck::analyze` (feature `image`): file decoding and batch analysis.

pub use brandcheck_color as color;
pub use brandcheck_core as core;
pub use brandcheck_geometry as geometry;

pub use brandcheck_color::{ColorAnalysisResult, ColorComplianceChecker};
pub use brandcheck_core::{ChannelOrder, ComplianceConfig, Rgb, RgbImageView};
pub use brandcheck_geometry::{GeometryAnalysisResult, GeometryChecker};

mod analyzer;
pub mod config;
pub mod report;

pub use analyzer::Analyzer;
pub use config::{AnalysisConfig, ConfigLoadError};
pub use report::{BrandRule, ComplianceReport, ComplianceStatus, RuleViolation, Severity};

#[cfg(feature = "image")]
pub mod analyze;
