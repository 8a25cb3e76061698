//! End-to-end helpers on top of the `image` crate: decode, analyze, batch.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{ChannelOrder, RgbImageView};
use crate::{AnalysisConfig, Analyzer, ComplianceReport};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the image helpers.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] ::image::ImageError),

    #[error("invalid RGB image buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("invalid RGB image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Borrow an `image::RgbImage` as a canonical RGB view.
pub fn rgb_view(img: &::image::RgbImage) -> RgbImageView<'_> {
    RgbImageView::new(
        img.width() as usize,
        img.height() as usize,
        img.as_raw(),
        ChannelOrder::Rgb,
    )
}

/// Copy a raw interleaved RGB buffer into an `image::RgbImage`.
pub fn rgb_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<::image::RgbImage, AnalyzeError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(AnalyzeError::InvalidDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h).and_then(|n| n.checked_mul(3)) else {
        return Err(AnalyzeError::InvalidDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(AnalyzeError::InvalidBuffer {
            expected,
            got: pixels.len(),
        });
    }
    ::image::RgbImage::from_raw(width, height, pixels.to_vec())
        .ok_or(AnalyzeError::InvalidDimensions { width, height })
}

/// Decode an image file of any supported format into 8-bit RGB.
///
/// The format is sniffed from the content, not the extension. Alpha is dropped.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<::image::RgbImage, AnalyzeError> {
    let path = path.as_ref();
    let reader = ::image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| AnalyzeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(reader.decode()?.to_rgb8())
}

/// Run the full analysis on a decoded image.
pub fn analyze_image(img: &::image::RgbImage, config: &AnalysisConfig) -> ComplianceReport {
    Analyzer::new(config.clone()).analyze(&rgb_view(img))
}

/// Decode and analyze one file.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))
)]
pub fn analyze_path(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<ComplianceReport, AnalyzeError> {
    let img = load_rgb(path)?;
    Ok(analyze_image(&img, config))
}

/// Outcome for one file of a batch. Exactly one of `report` and `error` is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ComplianceReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    fn run(analyzer: &Analyzer, path: &Path) -> Self {
        match load_rgb(path) {
            Ok(img) => Self {
                path: path.to_path_buf(),
                report: Some(analyzer.analyze(&rgb_view(&img))),
                error: None,
            },
            Err(err) => {
                log::warn!("skipping {}: {err}", path.display());
                Self {
                    path: path.to_path_buf(),
                    report: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.report.is_some()
    }
}

/// Analyze many files with one shared configuration.
///
/// A file that fails to load yields an item with `error` set; the rest of the
/// batch still runs. Output order matches `paths`. With the `rayon` feature
/// the files are processed in parallel.
pub fn analyze_batch(paths: &[PathBuf], config: &AnalysisConfig) -> Vec<BatchItem> {
    let analyzer = Analyzer::new(config.clone());

    #[cfg(feature = "rayon")]
    let items: Vec<BatchItem> = paths
        .par_iter()
        .map(|p| BatchItem::run(&analyzer, p))
        .collect();
    #[cfg(not(feature = "rayon"))]
    let items: Vec<BatchItem> = paths
        .iter()
        .map(|p| BatchItem::run(&analyzer, p))
        .collect();

    let failed = items.iter().filter(|i| !i.is_ok()).count();
    log::info!("analyzed {} file(s), {failed} failed", items.len());
    items
}
