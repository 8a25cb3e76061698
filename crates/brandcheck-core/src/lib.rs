//! Core types and utilities for brand logo compliance analysis.
//!
//! This crate is intentionally small and purely computational. By default it
//! does *not* depend on any image crate: callers hand in borrowed, row-major
//! pixel buffers and get plain Rust values back.
//!
//! Contents:
//! - image views with an explicit channel-order convention (canonical order is RGB),
//! - `Rgb` colors with Euclidean channel distance and hex parsing,
//! - binary masks,
//! - direct least-squares ellipse fitting,
//! - the shared `ComplianceConfig`.
//!
//! The `imageproc` feature adds Gaussian smoothing, Otsu thresholding,
//! external contour extraction and polygon metrics (area, perimeter, convex
//! hull, minimum-area rectangle), all backed by the `imageproc` crate.

mod color;
mod config;
#[cfg(feature = "imageproc")]
mod contour;
mod ellipse;
#[cfg(feature = "imageproc")]
mod filter;
mod image;
mod logger;
mod mask;

pub use color::{Rgb, RgbParseError};
pub use config::{ComplianceConfig, ConfigError};
#[cfg(feature = "imageproc")]
pub use contour::{find_external_contours, Contour, PixelRect, Point, RotatedRect};
pub use ellipse::{fit_ellipse, Ellipse};
#[cfg(feature = "imageproc")]
pub use filter::{auto_sigma, binarize, gaussian_blur, otsu_threshold};
pub use self::image::{ChannelOrder, GrayImage, GrayImageView, ImageError, RgbImage, RgbImageView};
pub use mask::BinaryMask;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
