//! Logo geometry analysis.
//!
//! [`GeometryChecker`] finds the logo outline in an image and measures how it
//! deviates from the expected pose and proportions:
//!
//! 1. grayscale, Gaussian blur and a global Otsu threshold,
//! 2. external contours filtered by area and circularity,
//! 3. rotation and elongation from a direct ellipse fit,
//! 4. a solidity-based flip heuristic, aspect ratio and scale,
//! 5. a penalty-based score in `[0, 1]`.
//!
//! The flip and warp checks are coarse geometric proxies, not orientation
//! classification; both thresholds live in [`GeometryParams`].
//!
//! A missing logo is a regular outcome, reported as
//! [`GeometryAnalysisResult::NotDetected`].

mod checker;
mod params;
mod result;

pub use checker::{GeometryChecker, GeometryError, AFFIRMATIVE_MESSAGE};
pub use params::GeometryParams;
pub use result::{GeometryAnalysisResult, LogoGeometry, NO_LOGO_REASON};
