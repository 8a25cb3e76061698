use brandcheck_core::PixelRect;
use serde::{Deserialize, Serialize};

/// Reason attached when no contour passes the candidate filter.
pub const NO_LOGO_REASON: &str = "No logo detected";

/// Measurements of the detected logo outline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogoGeometry {
    /// Unsigned tilt of the logo's major axis, in `[0, 90]` degrees.
    pub rotation_angle: f64,
    pub is_flipped: bool,
    pub is_warped: bool,
    /// Bounding-box width over height.
    pub aspect_ratio: f64,
    /// `sqrt(contour area / image area)`.
    pub scale_factor: f64,
    pub geometry_score: f64,
    pub contour_area: f64,
    pub bounding_box: PixelRect,
    pub circularity: f64,
    /// Contour over convex-hull area; `None` for a degenerate hull.
    pub solidity: Option<f64>,
    /// Major over minor axis of the fitted ellipse, when one could be fitted.
    pub eccentricity: Option<f64>,
}

/// Outcome of [`crate::GeometryChecker::analyze`].
///
/// Callers must branch on the variant before reading pose fields. The
/// accessors return neutral values for `NotDetected`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeometryAnalysisResult {
    Detected(LogoGeometry),
    NotDetected { reason: String },
}

impl GeometryAnalysisResult {
    pub fn not_detected(reason: impl Into<String>) -> Self {
        Self::NotDetected {
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn is_detected(&self) -> bool {
        matches!(self, Self::Detected(_))
    }

    #[inline]
    pub fn logo(&self) -> Option<&LogoGeometry> {
        match self {
            Self::Detected(g) => Some(g),
            Self::NotDetected { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Detected(_) => None,
            Self::NotDetected { reason } => Some(reason),
        }
    }

    pub fn geometry_score(&self) -> f64 {
        self.logo().map_or(0.0, |g| g.geometry_score)
    }

    pub fn rotation_angle(&self) -> f64 {
        self.logo().map_or(0.0, |g| g.rotation_angle)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.logo().map_or(1.0, |g| g.aspect_ratio)
    }

    pub fn scale_factor(&self) -> f64 {
        self.logo().map_or(1.0, |g| g.scale_factor)
    }

    pub fn is_flipped(&self) -> bool {
        self.logo().is_some_and(|g| g.is_flipped)
    }

    pub fn is_warped(&self) -> bool {
        self.logo().is_some_and(|g| g.is_warped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_detected_has_neutral_accessors() {
        let r = GeometryAnalysisResult::not_detected(NO_LOGO_REASON);
        assert!(!r.is_detected());
        assert_eq!(r.geometry_score(), 0.0);
        assert_eq!(r.aspect_ratio(), 1.0);
        assert_eq!(r.rotation_angle(), 0.0);
        assert_eq!(r.scale_factor(), 1.0);
        assert!(!r.is_flipped() && !r.is_warped());
        assert_eq!(r.reason(), Some(NO_LOGO_REASON));
    }

    #[test]
    fn serializes_with_status_tag() {
        let r = GeometryAnalysisResult::not_detected("No logo detected");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "not_detected");
        assert_eq!(json["reason"], "No logo detected");

        let logo = LogoGeometry {
            rotation_angle: 3.0,
            is_flipped: false,
            is_warped: false,
            aspect_ratio: 1.2,
            scale_factor: 0.5,
            geometry_score: 1.0,
            contour_area: 9000.0,
            bounding_box: PixelRect {
                x: 1,
                y: 2,
                width: 120,
                height: 100,
            },
            circularity: 0.4,
            solidity: Some(0.83),
            eccentricity: None,
        };
        let json = serde_json::to_string(&GeometryAnalysisResult::Detected(logo.clone())).unwrap();
        assert!(json.contains(r#""status":"detected""#));
        let back: GeometryAnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.logo(), Some(&logo));
    }
}
