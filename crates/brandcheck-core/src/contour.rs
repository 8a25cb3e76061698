//! External contours and polygon metrics on top of `imageproc`.
//!
//! Border following is `imageproc::contours::find_contours` (Suzuki–Abe on
//! 8-connected components). Only outer borders without a parent are kept: a
//! component sitting inside a hole of another component is skipped, which
//! matches `RETR_EXTERNAL` semantics.
//!
//! Polygon metrics treat the contour as a closed polygon through pixel
//! centers, so a filled `w×h` rectangle has area `(w-1)(h-1)`.

use ::image::{GrayImage as LumaImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{arc_length, contour_area, convex_hull, min_area_rect};
use serde::{Deserialize, Serialize};

pub use imageproc::point::Point;

use crate::BinaryMask;

/// Axis-aligned bounding box in pixels; `width`/`height` count pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Minimum-area enclosing rectangle.
///
/// `angle_deg` follows the legacy OpenCV convention and lies in `(-90, 0]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center: [f64; 2],
    pub width: f64,
    pub height: f64,
    pub angle_deg: f64,
}

impl RotatedRect {
    /// Build from four corners in polygon order.
    fn from_corners(corners: [Point<i32>; 4]) -> Self {
        let p = corners.map(|c| [c.x as f64, c.y as f64]);
        let center = [
            p.iter().map(|c| c[0]).sum::<f64>() * 0.25,
            p.iter().map(|c| c[1]).sum::<f64>() * 0.25,
        ];
        let e0 = [p[1][0] - p[0][0], p[1][1] - p[0][1]];
        let e1 = [p[2][0] - p[1][0], p[2][1] - p[1][1]];
        let mut width = e0[0].hypot(e0[1]);
        let mut height = e1[0].hypot(e1[1]);

        let raw = if width > 0.0 {
            e0[1].atan2(e0[0]).to_degrees()
        } else {
            0.0
        };
        let mut angle = raw.rem_euclid(90.0);
        if angle > 0.0 {
            angle -= 90.0;
        }
        let quarter_turns = ((raw - angle) / 90.0).round() as i64;
        if quarter_turns.rem_euclid(2) == 1 {
            std::mem::swap(&mut width, &mut height);
        }

        Self {
            center,
            width,
            height,
            angle_deg: angle,
        }
    }
}

/// Closed outer boundary of one connected component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Absolute shoelace area.
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        contour_area(&self.points).abs()
    }

    /// Closed length, including the segment back to the first point.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        arc_length(&self.points, true)
    }

    pub fn bounding_rect(&self) -> PixelRect {
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if self.points.is_empty() {
            return PixelRect::default();
        }
        PixelRect {
            x: min_x as usize,
            y: min_y as usize,
            width: (max_x - min_x + 1) as usize,
            height: (max_y - min_y + 1) as usize,
        }
    }

    pub fn convex_hull(&self) -> Vec<Point<i32>> {
        if self.points.is_empty() {
            return Vec::new();
        }
        convex_hull(self.points.as_slice())
    }

    /// `4π·area / perimeter²`; `None` for a zero-length boundary.
    pub fn circularity(&self) -> Option<f64> {
        let perimeter = self.perimeter();
        if perimeter <= 0.0 {
            return None;
        }
        Some(4.0 * std::f64::consts::PI * self.area() / (perimeter * perimeter))
    }

    /// Contour area over convex hull area; `None` when the hull is degenerate.
    pub fn solidity(&self) -> Option<f64> {
        let hull = self.convex_hull();
        if hull.len() < 3 {
            return None;
        }
        let hull_area = contour_area(&hull).abs();
        if hull_area <= 0.0 {
            return None;
        }
        Some(self.area() / hull_area)
    }

    /// Rotating-calipers rectangle; corners are snapped to the pixel grid.
    pub fn min_area_rect(&self) -> Option<RotatedRect> {
        if self.points.is_empty() {
            return None;
        }
        Some(RotatedRect::from_corners(min_area_rect(&self.points)))
    }

    pub fn points_f64(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|p| [p.x as f64, p.y as f64])
            .collect()
    }
}

/// Find the external contours of all foreground components in `mask`.
///
/// Contours are returned in raster order of their top-left-most pixel.
pub fn find_external_contours(mask: &BinaryMask) -> Vec<Contour> {
    let (Ok(w), Ok(h)) = (u32::try_from(mask.width), u32::try_from(mask.height)) else {
        return Vec::new();
    };
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let luma = LumaImage::from_fn(w, h, |x, y| {
        Luma([if mask.get(x as usize, y as usize) { 255 } else { 0 }])
    });

    find_contours::<i32>(&luma)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Contour { points: c.points })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect_mask(w: usize, h: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> BinaryMask {
        BinaryMask::from_fn(w, h, |x, y| x >= x0 && x < x1 && y >= y0 && y < y1)
    }

    fn polygon(points: &[(i32, i32)]) -> Contour {
        Contour {
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = BinaryMask::new(8, 8);
        assert!(find_external_contours(&mask).is_empty());
        assert!(find_external_contours(&BinaryMask::new(0, 4)).is_empty());
    }

    #[test]
    fn filled_rectangle_metrics() {
        let mask = rect_mask(20, 12, 3, 2, 13, 8);
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];

        assert_eq!(
            c.bounding_rect(),
            PixelRect {
                x: 3,
                y: 2,
                width: 10,
                height: 6
            }
        );
        assert_relative_eq!(c.area(), 9.0 * 5.0);
        assert_relative_eq!(c.perimeter(), 2.0 * (9.0 + 5.0));
        assert_relative_eq!(c.solidity().unwrap(), 1.0);
        // every border pixel of the rectangle is visited exactly once
        assert_eq!(c.len(), 2 * (9 + 5));
    }

    #[test]
    fn single_pixel_component() {
        let mut mask = BinaryMask::new(5, 5);
        mask.set(2, 2, true);
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, vec![Point::new(2, 2)]);
        assert_eq!(contours[0].area(), 0.0);
        assert!(contours[0].circularity().is_none());
        assert!(contours[0].solidity().is_none());

        let rect = contours[0].min_area_rect().unwrap();
        assert_eq!(rect.center, [2.0, 2.0]);
        assert_eq!(rect.width * rect.height, 0.0);
    }

    #[test]
    fn nested_component_is_not_external() {
        // ring from (2,2) to (17,17) with a blob inside its hole
        let mut mask = BinaryMask::from_fn(20, 20, |x, y| {
            let inside_outer = (2..18).contains(&x) && (2..18).contains(&y);
            let inside_hole = (5..15).contains(&x) && (5..15).contains(&y);
            inside_outer && !inside_hole
        });
        for y in 8..11 {
            for x in 8..11 {
                mask.set(x, y, true);
            }
        }
        // separate blob outside the ring
        mask.set(0, 19, true);

        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].bounding_rect().width, 16);
        assert_eq!(contours[1].points, vec![Point::new(0, 19)]);
    }

    #[test]
    fn diagonal_pixels_form_one_component() {
        let mut mask = BinaryMask::new(6, 6);
        for i in 1..5 {
            mask.set(i, i, true);
        }
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].bounding_rect().width, 4);
    }

    #[test]
    fn component_touching_the_border_is_found() {
        let mask = rect_mask(10, 10, 0, 0, 4, 10);
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(
            contours[0].bounding_rect(),
            PixelRect {
                x: 0,
                y: 0,
                width: 4,
                height: 10
            }
        );
    }

    #[test]
    fn concave_shape_has_lower_solidity() {
        // U shape: 30x30 block with a 10x20 notch cut from the top middle.
        let mask = BinaryMask::from_fn(40, 40, |x, y| {
            let block = (5..35).contains(&x) && (5..35).contains(&y);
            let notch = (15..25).contains(&x) && (5..25).contains(&y);
            block && !notch
        });
        let contours = find_external_contours(&mask);
        assert_eq!(contours.len(), 1);
        let solidity = contours[0].solidity().unwrap();
        assert!(solidity < 0.85 && solidity > 0.7, "solidity {solidity}");
    }

    #[test]
    fn hull_of_square_with_interior_points() {
        let c = polygon(&[(0, 0), (4, 0), (2, 2), (4, 4), (0, 4), (1, 3)]);
        let hull = c.convex_hull();
        assert_eq!(hull.len(), 4);
        assert_relative_eq!(Contour { points: hull }.area(), 16.0);
    }

    #[test]
    fn min_area_rect_axis_aligned() {
        let rect = polygon(&[(0, 0), (10, 0), (10, 4), (0, 4)])
            .min_area_rect()
            .unwrap();
        let area = rect.width * rect.height;
        assert!((40.0..=60.0).contains(&area), "area {area}");
        assert!(rect.angle_deg <= 0.0 && rect.angle_deg > -90.0);
        assert!(rect.angle_deg.abs() < 1e-9 || (rect.angle_deg + 90.0).abs() < 1e-9);
        assert!((rect.center[0] - 5.0).abs() <= 0.5);
        assert!((rect.center[1] - 2.0).abs() <= 0.5);
    }

    #[test]
    fn min_area_rect_rotated_diamond() {
        // corners snap to whole pixels, so allow a pixel of slack
        let rect = polygon(&[(50, 0), (100, 50), (50, 100), (0, 50)])
            .min_area_rect()
            .unwrap();
        assert!((rect.angle_deg + 45.0).abs() < 2.0, "angle {}", rect.angle_deg);
        let area = rect.width * rect.height;
        assert!((area - 5000.0).abs() < 500.0, "area {area}");
        assert!((rect.center[0] - 50.0).abs() <= 1.0);
        assert!((rect.center[1] - 50.0).abs() <= 1.0);
    }
}
