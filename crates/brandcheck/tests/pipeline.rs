#![cfg(feature = "image")]

use std::path::{Path, PathBuf};

use brandcheck::analyze::{analyze_batch, analyze_path, load_rgb, AnalyzeError};
use brandcheck::{AnalysisConfig, BrandRule, ComplianceStatus, Severity};
use image::{Rgb, RgbImage};

const GOLD: Rgb<u8> = Rgb([255, 188, 13]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Block with a notch cut from the bottom edge, centered at (100, 100).
fn arch(x: f64, y: f64) -> bool {
    let body = (40.0..160.0).contains(&x) && (50.0..150.0).contains(&y);
    let opening = (80.0..120.0).contains(&x) && (100.0..150.0).contains(&y);
    body && !opening
}

/// Same block with a notch deep enough to look upside down.
fn deep_u(x: f64, y: f64) -> bool {
    let body = (40.0..160.0).contains(&x) && (50.0..150.0).contains(&y);
    let opening = (70.0..130.0).contains(&x) && (70.0..150.0).contains(&y);
    body && !opening
}

fn rotated(angle_deg: f64, shape: fn(f64, f64) -> bool) -> impl Fn(f64, f64) -> bool {
    let (s, c) = angle_deg.to_radians().sin_cos();
    move |x, y| {
        let (dx, dy) = (x - 100.0, y - 100.0);
        shape(100.0 + dx * c + dy * s, 100.0 - dx * s + dy * c)
    }
}

fn render(fg: Rgb<u8>, shape: impl Fn(f64, f64) -> bool) -> RgbImage {
    RgbImage::from_fn(200, 200, |x, y| {
        if shape(x as f64, y as f64) {
            fg
        } else {
            BLACK
        }
    })
}

fn save(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).expect("write png");
    path
}

fn rules(report: &brandcheck::ComplianceReport) -> Vec<BrandRule> {
    report.violations.iter().map(|v| v.rule).collect()
}

#[test]
fn upright_gold_logo_is_compliant() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(dir.path(), "gold.png", &render(GOLD, arch));

    let report = analyze_path(&path, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.overall_compliance, ComplianceStatus::Compliant);
    assert_eq!(report.compliance_score, 1.0);
    assert!(report.violations.is_empty());
    assert!(report.geometry.is_detected());
    assert!(report.color.golden_match);
}

#[test]
fn off_brand_color_is_non_compliant() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(dir.path(), "red.png", &render(Rgb([200, 20, 40]), arch));

    let report = analyze_path(&path, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.overall_compliance, ComplianceStatus::NonCompliant);
    assert_eq!(rules(&report), vec![BrandRule::GoldColorOnly]);
    assert_eq!(report.violations[0].severity, Severity::Critical);
    assert!(report.geometry_compliance);
}

#[test]
fn tilted_logo_needs_review() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(dir.path(), "tilt.png", &render(GOLD, rotated(20.0, arch)));

    let report = analyze_path(&path, &AnalysisConfig::default()).unwrap();
    assert_eq!(rules(&report), vec![BrandRule::NoRotation]);
    assert_eq!(report.overall_compliance, ComplianceStatus::PendingReview);
    assert!((report.compliance_score - 0.8).abs() < 1e-12);

    // A looser rotation limit accepts the same image.
    let mut relaxed = AnalysisConfig::default();
    relaxed.compliance.max_rotation_degrees = 25.0;
    let report = analyze_path(&path, &relaxed).unwrap();
    assert!(report.violations.is_empty());
}

#[test]
fn deep_notch_reads_as_flipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(dir.path(), "flip.png", &render(GOLD, deep_u));

    let report = analyze_path(&path, &AnalysisConfig::default()).unwrap();
    assert!(rules(&report).contains(&BrandRule::NoFlipping));
    assert!(!report.geometry_compliance);
}

#[test]
fn blank_image_reports_missing_logo() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(dir.path(), "blank.png", &RgbImage::from_pixel(120, 80, GOLD));

    let report = analyze_path(&path, &AnalysisConfig::default()).unwrap();
    assert_eq!(rules(&report), vec![BrandRule::LogoNotDetected]);
    assert_eq!(report.overall_compliance, ComplianceStatus::PendingReview);
    assert!(report.color_compliance);
}

#[test]
fn batch_keeps_order_and_isolates_failures() {
    let dir = tempfile::tempdir().unwrap();
    let good = save(dir.path(), "a.png", &render(GOLD, arch));
    let bogus = dir.path().join("b.png");
    std::fs::write(&bogus, b"not an image").unwrap();
    let missing = dir.path().join("c.png");
    let red = save(dir.path(), "d.png", &render(Rgb([200, 20, 40]), arch));

    let paths = vec![good.clone(), bogus.clone(), missing.clone(), red.clone()];
    let items = analyze_batch(&paths, &AnalysisConfig::default());

    let got: Vec<&Path> = items.iter().map(|i| i.path.as_path()).collect();
    assert_eq!(got, vec![good.as_path(), bogus.as_path(), missing.as_path(), red.as_path()]);
    assert!(items[0].is_ok() && items[3].is_ok());
    assert!(items[1].error.is_some() && items[1].report.is_none());
    assert!(items[2].error.is_some());
    assert_eq!(
        items[3].report.as_ref().map(|r| r.overall_compliance),
        Some(ComplianceStatus::NonCompliant)
    );

    let json = serde_json::to_value(&items).unwrap();
    assert!(json[1].get("report").is_none());
    assert!(json[0].get("error").is_none());
}

#[test]
fn undecodable_file_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.png");
    std::fs::write(&path, [0u8; 16]).unwrap();
    assert!(matches!(load_rgb(&path), Err(AnalyzeError::Decode(_))));
}
