//! Pluggable text recognition backends.
//!
//! The pipeline is generic over [`TextEngine`], so recognition can come from
//! Tesseract (behind the `tesseract` feature), a remote service, or a stub
//! in tests. Engines receive the already enhanced grayscale image and return
//! spans in detection order.

#[cfg(feature = "tesseract")]
mod tesseract;

#[cfg(feature = "tesseract")]
pub use tesseract::TesseractEngine;

use crate::core::OcrError;
use crate::domain::TextSpan;
use image::GrayImage;

/// A text recognition backend.
///
/// Implementations must be shareable across worker threads. An engine that
/// is not internally thread-safe should serialize its own access, or be run
/// with [`FormOcrConfig::serialize_engine`](crate::core::FormOcrConfig)
/// enabled so the pipeline holds a lock around each call.
///
/// # Errors
///
/// `recognize` distinguishes two failure classes through [`OcrError`]:
/// [`OcrError::RecognizerUnavailable`] means the backend itself is broken
/// and aborts an entire batch; any other error fails only the image that
/// produced it.
pub trait TextEngine: Send + Sync {
    /// A short identifier for logs and reports.
    fn name(&self) -> &'static str;

    /// Recognizes text in an enhanced grayscale image.
    ///
    /// An image with no legible text yields an empty vector, not an error.
    fn recognize(&self, image: &GrayImage) -> Result<Vec<TextSpan>, OcrError>;
}
