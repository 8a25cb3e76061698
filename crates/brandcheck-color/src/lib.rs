//! Brand color fidelity analysis.
//!
//! [`ColorComplianceChecker`] takes an RGB (or BGR) pixel buffer and reports:
//! - the dominant palette, found by seeded weighted k-means over unique colors,
//! - whether any dominant color lies within tolerance of the brand color,
//! - how much of the image is rendered in the brand color,
//! - bounding boxes of the larger off-brand regions.
//!
//! All analysis is pure and synchronous; a checker can be shared across threads.

mod checker;
mod kmeans;
mod params;
mod result;

pub use checker::{ColorAnalysisError, ColorComplianceChecker, AFFIRMATIVE_MESSAGE};
pub use kmeans::{weighted_kmeans, Clustering, KMeansParams};
pub use params::ColorParams;
pub use result::{ColorAnalysisResult, NormalizedRegion};
