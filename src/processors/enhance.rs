//! Image enhancement for OCR robustness.
//!
//! Photographs of forms, unlike scans, come with uneven lighting, sensor
//! noise and compression artifacts. A fixed four-stage pipeline (grayscale,
//! Gaussian smoothing, global Otsu binarization, morphological cleanup)
//! raises recognition recall without per-image tuning.

use crate::core::constants::{GAUSSIAN_SIGMA, MORPH_RADIUS};
use crate::core::OcrError;
use crate::domain::RawImage;
use crate::utils::decode_gray;
use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology;

/// Decodes a raw image and runs the enhancement pipeline on it.
///
/// Decode failures surface as [`OcrError::InvalidImage`]; enhancement itself
/// is total on any decoded image.
pub fn enhance_image(raw: &RawImage) -> Result<GrayImage, OcrError> {
    let gray = decode_gray(raw)?;
    Ok(enhance_gray(&gray))
}

/// Runs the fixed enhancement pipeline on a grayscale image.
///
/// Stages, in order:
/// 1. Gaussian smoothing with a fixed sigma, skipped for bilevel input
///    (pure black/white carries no sensor noise, and skipping keeps the
///    pipeline a fixed point on its own output).
/// 2. Global Otsu binarization; an image with a single gray level has no
///    text/background classes to separate and passes through unchanged.
/// 3. Morphological close then open with a radius-1 structuring element,
///    removing speckle and reconnecting broken strokes.
///
/// Deterministic and side-effect free. Applying it twice to an already
/// bilevel image yields a pixel-identical result.
pub fn enhance_gray(gray: &GrayImage) -> GrayImage {
    let smoothed = if is_bilevel(gray) {
        gray.clone()
    } else {
        gaussian_blur_f32(gray, GAUSSIAN_SIGMA)
    };

    let binary = match otsu_threshold(&smoothed) {
        Some(level) => binarize(&smoothed, level),
        None => smoothed,
    };

    let closed = morphology::close(&binary, Norm::LInf, MORPH_RADIUS);
    morphology::open(&closed, Norm::LInf, MORPH_RADIUS)
}

/// Returns true if every pixel is pure black or pure white.
fn is_bilevel(image: &GrayImage) -> bool {
    image.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255)
}

/// Selects the global threshold maximizing between-class variance
/// (equivalently, minimizing intra-class variance).
///
/// Returns None when the image has fewer than two gray levels. Ties are
/// broken toward the lowest threshold, so a bilevel image always maps to
/// itself under [`binarize`].
fn otsu_threshold(image: &GrayImage) -> Option<u8> {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total = (image.width() as u64) * (image.height() as u64);
    if total == 0 || histogram.iter().filter(|&&count| count > 0).count() < 2 {
        return None;
    }

    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut weight_below = 0.0f64;
    let mut sum_below = 0.0f64;
    let mut best_level = 0u8;
    let mut best_variance = f64::MIN;

    for level in 0..255usize {
        weight_below += histogram[level] as f64;
        if weight_below == 0.0 {
            continue;
        }
        let weight_above = total as f64 - weight_below;
        if weight_above == 0.0 {
            break;
        }
        sum_below += level as f64 * histogram[level] as f64;

        let mean_below = sum_below / weight_below;
        let mean_above = (weighted_sum - sum_below) / weight_above;
        let variance =
            weight_below * weight_above * (mean_below - mean_above) * (mean_below - mean_above);

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    Some(best_level)
}

/// Maps pixels above the threshold to white and the rest to black.
fn binarize(image: &GrayImage, level: u8) -> GrayImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > level { 255 } else { 0 };
    }
    out
}
