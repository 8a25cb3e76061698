//! Direct least-squares ellipse fitting (Fitzgibbon, Pilu & Fisher, 1999).

use nalgebra::{Matrix2, Matrix3, SMatrix, SVector, SymmetricEigen, Vector3};
use serde::{Deserialize, Serialize};

/// Geometric ellipse parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: [f64; 2],
    /// Full length of the major axis.
    pub major_axis: f64,
    /// Full length of the minor axis.
    pub minor_axis: f64,
    /// Direction of the major axis from the +x axis (y down), in `[0, 180)` degrees.
    pub angle_deg: f64,
}

impl Ellipse {
    /// Major over minor axis; `None` for a degenerate ellipse.
    pub fn axis_ratio(&self) -> Option<f64> {
        (self.minor_axis > 0.0).then(|| self.major_axis / self.minor_axis)
    }

    /// Sample `n` points evenly in parameter space along the boundary.
    pub fn sample_points(&self, n: usize) -> Vec<[f64; 2]> {
        let (sin_t, cos_t) = self.angle_deg.to_radians().sin_cos();
        let (a, b) = (0.5 * self.major_axis, 0.5 * self.minor_axis);
        (0..n)
            .map(|k| {
                let t = std::f64::consts::TAU * k as f64 / n as f64;
                let (x, y) = (a * t.cos(), b * t.sin());
                [
                    self.center[0] + x * cos_t - y * sin_t,
                    self.center[1] + x * sin_t + y * cos_t,
                ]
            })
            .collect()
    }
}

/// Translate to the centroid and scale so the mean distance is √2.
fn normalization(points: &[[f64; 2]]) -> (f64, f64, f64) {
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let my = points.iter().map(|p| p[1]).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| ((p[0] - mx).powi(2) + (p[1] - my).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    let s = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    (mx, my, s)
}

/// Fit an ellipse to at least five points.
///
/// Returns `None` when the points are degenerate (collinear, repeated) or the
/// best conic is not a real ellipse.
pub fn fit_ellipse(points: &[[f64; 2]]) -> Option<Ellipse> {
    if points.len() < 5 {
        return None;
    }
    let (mx, my, s) = normalization(points);

    // Scatter matrix of the design rows [x², xy, y², x, y, 1].
    let mut scatter = SMatrix::<f64, 6, 6>::zeros();
    for p in points {
        let x = (p[0] - mx) * s;
        let y = (p[1] - my) * s;
        let d = SVector::<f64, 6>::from([x * x, x * y, y * y, x, y, 1.0]);
        scatter += d * d.transpose();
    }

    let s11: Matrix3<f64> = scatter.fixed_view::<3, 3>(0, 0).into_owned();
    let s12: Matrix3<f64> = scatter.fixed_view::<3, 3>(0, 3).into_owned();
    let s22: Matrix3<f64> = scatter.fixed_view::<3, 3>(3, 3).into_owned();
    // Collinear input leaves the linear block (numerically) singular.
    if s22.determinant().abs() <= 1e-12 * s22.norm().powi(3) {
        return None;
    }
    let s22_inv = s22.try_inverse()?;

    // Reduced problem M a1 = λ C1 a1 with the ellipse constraint 4AC − B² = 1.
    let m = s11 - s12 * s22_inv * s12.transpose();
    let c1 = Matrix3::new(0.0, 0.0, 2.0, 0.0, -1.0, 0.0, 2.0, 0.0, 0.0);
    let system = c1.try_inverse()? * m;

    let a1 = constrained_eigenvector(&system)?;
    let a2 = -s22_inv * s12.transpose() * a1;

    let coeffs = denormalize([a1[0], a1[1], a1[2], a2[0], a2[1], a2[2]], mx, my, s);
    conic_to_ellipse(coeffs)
}

/// Real eigenvector of `system` that satisfies the ellipse constraint best.
fn constrained_eigenvector(system: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let mut best: Option<(f64, Vector3<f64>)> = None;
    for lambda in system.complex_eigenvalues().iter() {
        if lambda.im.abs() > 1e-9 * lambda.re.abs().max(1.0) {
            continue;
        }
        let shifted = system - Matrix3::identity() * lambda.re;
        let svd = shifted.svd(false, true);
        let Some(v_t) = svd.v_t else {
            continue;
        };
        let (idx, _) = svd.singular_values.argmin();
        let v: Vector3<f64> = v_t.row(idx).transpose();
        let cond = 4.0 * v[0] * v[2] - v[1] * v[1];
        if cond > 0.0 && best.map(|(c, _)| cond > c).unwrap_or(true) {
            best = Some((cond, v));
        }
    }
    best.map(|(_, v)| v)
}

/// Undo `x' = s(x − mx), y' = s(y − my)` on conic coefficients.
fn denormalize(c: [f64; 6], mx: f64, my: f64, s: f64) -> [f64; 6] {
    let [a_, b_, c_, d_, e_, f_] = c;
    let s2 = s * s;
    let a = a_ * s2;
    let b = b_ * s2;
    let c = c_ * s2;
    let d = -2.0 * a_ * s2 * mx - b_ * s2 * my + d_ * s;
    let e = -b_ * s2 * mx - 2.0 * c_ * s2 * my + e_ * s;
    let f =
        a_ * s2 * mx * mx + b_ * s2 * mx * my + c_ * s2 * my * my - d_ * s * mx - e_ * s * my + f_;
    [a, b, c, d, e, f]
}

fn conic_to_ellipse([a, b, c, d, e, f]: [f64; 6]) -> Option<Ellipse> {
    let den = b * b - 4.0 * a * c;
    if den >= 0.0 || !den.is_finite() {
        return None;
    }
    let x0 = (2.0 * c * d - b * e) / den;
    let y0 = (2.0 * a * e - b * d) / den;
    let f0 = a * x0 * x0 + b * x0 * y0 + c * y0 * y0 + d * x0 + e * y0 + f;

    let eig = SymmetricEigen::new(Matrix2::new(a, 0.5 * b, 0.5 * b, c));
    let mut radii = [0.0f64; 2];
    for (r, &lambda) in radii.iter_mut().zip(eig.eigenvalues.iter()) {
        let sq = -f0 / lambda;
        if !sq.is_finite() || sq <= 0.0 {
            return None;
        }
        *r = sq.sqrt();
    }
    let major = if radii[0] >= radii[1] { 0 } else { 1 };
    let minor = 1 - major;
    let dir = eig.eigenvectors.column(major);

    let mut angle_deg = dir[1].atan2(dir[0]).to_degrees().rem_euclid(180.0);
    if angle_deg >= 180.0 {
        angle_deg = 0.0;
    }

    Some(Ellipse {
        center: [x0, y0],
        major_axis: 2.0 * radii[major],
        minor_axis: 2.0 * radii[minor],
        angle_deg,
    })
}
