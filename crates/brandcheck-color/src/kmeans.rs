//! Weighted k-means over 3-channel colors.
//!
//! Images usually contain far fewer unique colors than pixels, so the
//! checker clusters `(color, count)` pairs instead of raw pixels. Weighted
//! Lloyd iterations on unique colors give the same centroids as unweighted
//! iterations on the full pixel list.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters of one [`weighted_kmeans`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KMeansParams {
    pub k: usize,
    pub seed: u64,
    pub restarts: usize,
    pub max_iters: usize,
    pub convergence_eps: f64,
}

/// Best clustering found over all restarts.
#[derive(Clone, Debug, PartialEq)]
pub struct Clustering {
    pub centroids: Vec<[f64; 3]>,
    /// Total weight assigned to each centroid.
    pub weights: Vec<f64>,
    /// Weighted sum of squared distances to the assigned centroid.
    pub inertia: f64,
    /// Lloyd iterations used by the winning run.
    pub iterations: usize,
}

#[inline]
fn dist_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

fn nearest(p: &[f64; 3], centroids: &[[f64; 3]]) -> (usize, f64) {
    let mut best = (0usize, f64::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = dist_sq(p, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

/// Draw an index with probability proportional to `scores`.
fn sample_index(rng: &mut StdRng, scores: &[f64]) -> Option<usize> {
    let total: f64 = scores.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return None;
    }
    let target = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    for (i, &s) in scores.iter().enumerate() {
        acc += s;
        if acc > target {
            return Some(i);
        }
    }
    scores.iter().rposition(|&s| s > 0.0)
}

/// Weighted k-means++ seeding.
fn init_plus_plus(rng: &mut StdRng, points: &[[f64; 3]], weights: &[f64], k: usize) -> Vec<[f64; 3]> {
    let mut centroids = Vec::with_capacity(k);
    let Some(first) = sample_index(rng, weights) else {
        return centroids;
    };
    centroids.push(points[first]);

    let mut d2: Vec<f64> = points.iter().map(|p| dist_sq(p, &points[first])).collect();
    while centroids.len() < k {
        let scores: Vec<f64> = d2.iter().zip(weights).map(|(d, w)| d * w).collect();
        let Some(next) = sample_index(rng, &scores) else {
            break;
        };
        let c = points[next];
        centroids.push(c);
        for (d, p) in d2.iter_mut().zip(points) {
            *d = d.min(dist_sq(p, &c));
        }
    }
    centroids
}

/// One seeded Lloyd run. Returns the final clustering.
fn lloyd(
    points: &[[f64; 3]],
    weights: &[f64],
    mut centroids: Vec<[f64; 3]>,
    params: &KMeansParams,
) -> Clustering {
    let k = centroids.len();
    let mut labels = vec![0usize; points.len()];
    let mut iterations = 0;

    for _ in 0..params.max_iters.max(1) {
        iterations += 1;
        for (label, p) in labels.iter_mut().zip(points) {
            *label = nearest(p, &centroids).0;
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut mass = vec![0.0f64; k];
        for ((p, &w), &l) in points.iter().zip(weights).zip(&labels) {
            sums[l][0] += w * p[0];
            sums[l][1] += w * p[1];
            sums[l][2] += w * p[2];
            mass[l] += w;
        }

        let mut max_shift = 0.0f64;
        for (c, (s, &m)) in centroids.iter_mut().zip(sums.iter().zip(&mass)) {
            // An emptied cluster keeps its previous centroid.
            if m <= 0.0 {
                continue;
            }
            let next = [s[0] / m, s[1] / m, s[2] / m];
            max_shift = max_shift.max(dist_sq(c, &next).sqrt());
            *c = next;
        }
        if max_shift <= params.convergence_eps {
            break;
        }
    }

    let mut cluster_weights = vec![0.0f64; k];
    let mut inertia = 0.0;
    for (p, &w) in points.iter().zip(weights) {
        let (l, d) = nearest(p, &centroids);
        cluster_weights[l] += w;
        inertia += w * d;
    }

    Clustering {
        centroids,
        weights: cluster_weights,
        inertia,
        iterations,
    }
}

/// Cluster weighted points into at most `params.k` groups.
///
/// Deterministic for a given seed. When there are no more distinct points
/// than `k`, every point becomes its own centroid. Returns `None` for empty
/// input, `k == 0`, or a total weight of zero.
pub fn weighted_kmeans(
    points: &[[f64; 3]],
    weights: &[f64],
    params: &KMeansParams,
) -> Option<Clustering> {
    if points.is_empty() || params.k == 0 || points.len() != weights.len() {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return None;
    }

    if points.len() <= params.k {
        return Some(Clustering {
            centroids: points.to_vec(),
            weights: weights.to_vec(),
            inertia: 0.0,
            iterations: 0,
        });
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best: Option<Clustering> = None;
    for _ in 0..params.restarts.max(1) {
        let init = init_plus_plus(&mut rng, points, weights, params.k);
        if init.is_empty() {
            continue;
        }
        let run = lloyd(points, weights, init, params);
        if best.as_ref().map(|b| run.inertia < b.inertia).unwrap_or(true) {
            best = Some(run);
        }
    }
    best
}
