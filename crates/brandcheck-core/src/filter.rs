//! Smoothing and thresholding on single-channel images.
//!
//! The heavy lifting is done by `imageproc`; these functions adapt the
//! crate's borrowed views and pin down the conventions the analyzers rely on.

use ::image::{ImageBuffer, Luma};

use crate::{BinaryMask, GrayImage, GrayImageView};

type LumaF32 = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Sigma derived from a kernel size when the caller passes `sigma <= 0`
/// (OpenCV rule: `0.3·((k−1)/2 − 1) + 0.8`, so `k = 5` gives 1.1).
pub fn auto_sigma(ksize: usize) -> f64 {
    let k = (ksize.max(1) | 1) as f64;
    0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
}

fn luma8(src: &GrayImageView<'_>) -> Option<::image::GrayImage> {
    let w = u32::try_from(src.width).ok()?;
    let h = u32::try_from(src.height).ok()?;
    ::image::GrayImage::from_raw(w, h, src.data.to_vec())
}

/// Gaussian blur with edge-clamped borders.
///
/// `sigma <= 0` (or NaN) falls back to [`auto_sigma`] of `ksize`; the kernel
/// extent itself follows `imageproc` (radius `⌈2σ⌉`).
pub fn gaussian_blur(src: &GrayImageView<'_>, ksize: usize, sigma: f64) -> GrayImage {
    let sigma = if sigma > 0.0 { sigma } else { auto_sigma(ksize) };
    let buf = u32::try_from(src.width)
        .ok()
        .zip(u32::try_from(src.height).ok())
        .filter(|&(w, h)| w > 0 && h > 0)
        .and_then(|(w, h)| {
            LumaF32::from_raw(w, h, src.data.iter().map(|&v| v as f32).collect())
        });
    let Some(buf) = buf else {
        return GrayImage {
            width: src.width,
            height: src.height,
            data: src.data.to_vec(),
        };
    };

    let blurred = imageproc::filter::gaussian_blur_f32(&buf, sigma as f32);
    GrayImage {
        width: src.width,
        height: src.height,
        data: blurred
            .into_raw()
            .into_iter()
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
            .collect(),
    }
}

/// Global Otsu threshold: the level maximizing between-class variance.
///
/// Pixels strictly above the returned level belong to the foreground. A
/// uniform image returns its only level, so nothing is foreground.
pub fn otsu_threshold(src: &GrayImageView<'_>) -> u8 {
    let (Some(&min_v), Some(&max_v)) = (src.data.iter().min(), src.data.iter().max()) else {
        return 0;
    };
    if min_v == max_v {
        return min_v;
    }
    match luma8(src) {
        Some(img) => imageproc::contrast::otsu_level(&img),
        None => min_v,
    }
}

/// Foreground mask of pixels strictly brighter than `threshold`.
pub fn binarize(src: &GrayImageView<'_>, threshold: u8) -> BinaryMask {
    BinaryMask::from_fn(src.width, src.height, |x, y| src.get(x, y) > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gray(width: usize, height: usize, data: Vec<u8>) -> GrayImage {
        GrayImage {
            width,
            height,
            data,
        }
    }

    #[test]
    fn default_sigma_for_five_tap_kernel() {
        assert_relative_eq!(auto_sigma(5), 1.1, epsilon = 1e-12);
        // even sizes round up to the next odd size
        assert_relative_eq!(auto_sigma(4), 1.1, epsilon = 1e-12);
    }

    #[test]
    fn blur_preserves_uniform_image() {
        let img = gray(7, 5, vec![188; 35]);
        let out = gaussian_blur(&img.view(), 5, 0.0);
        assert_eq!(out.width, 7);
        assert!(out.data.iter().all(|&v| v == 188));
    }

    #[test]
    fn blur_softens_a_step_edge() {
        let mut data = vec![0u8; 10 * 3];
        for y in 0..3 {
            for x in 5..10 {
                data[y * 10 + x] = 200;
            }
        }
        let out = gaussian_blur(&gray(10, 3, data).view(), 5, 0.0);
        let row = &out.data[10..20];
        assert_eq!(row[0], 0);
        assert_eq!(row[9], 200);
        assert!(row[4] > 0 && row[4] < 100);
        assert!(row[5] > 100 && row[5] < 200);
        // symmetric step: the two sides mirror each other
        assert_eq!(row[4] as u16 + row[5] as u16, 200);
    }

    #[test]
    fn blur_of_empty_view_is_empty() {
        let img = gray(0, 3, Vec::new());
        assert!(gaussian_blur(&img.view(), 5, 0.0).data.is_empty());
    }

    #[test]
    fn otsu_splits_bimodal_histogram() {
        let mut data = vec![20u8; 50];
        data.extend(vec![22u8; 50]);
        data.extend(vec![200u8; 40]);
        data.extend(vec![210u8; 40]);
        let img = gray(180, 1, data);
        let t = otsu_threshold(&img.view());
        assert!((22..200).contains(&t), "threshold {t}");

        let mask = binarize(&img.view(), t);
        assert_eq!(mask.count(), 80);
    }

    #[test]
    fn otsu_uniform_image_has_no_foreground() {
        let img = gray(4, 4, vec![90; 16]);
        let t = otsu_threshold(&img.view());
        assert_eq!(t, 90);
        assert_eq!(binarize(&img.view(), t).count(), 0);
    }

    #[test]
    fn otsu_two_levels_separates_them() {
        let img = gray(2, 1, vec![0, 188]);
        let t = otsu_threshold(&img.view());
        assert!(t < 188);
        assert_eq!(binarize(&img.view(), t).count(), 1);
    }
}
