//! Image decoding helpers.

use crate::core::OcrError;
use crate::domain::RawImage;
use image::{DynamicImage, GrayImage};

/// Converts a decoded image to 8-bit grayscale.
pub fn dynamic_to_gray(img: DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Decodes raw image bytes into a grayscale image.
///
/// Honors the declared format when one is given, otherwise guesses from the
/// byte content. Any decode failure maps to [`OcrError::InvalidImage`] for
/// the single image it belongs to.
pub fn decode_gray(raw: &RawImage) -> Result<GrayImage, OcrError> {
    let decoded = match raw.declared_format {
        Some(format) => image::load_from_memory_with_format(&raw.bytes, format),
        None => image::load_from_memory(&raw.bytes),
    }
    .map_err(|e| OcrError::invalid_image(format!("decode {}", raw.source_id), Some(e)))?;
    Ok(dynamic_to_gray(decoded))
}
