//! Raw image input owned by a single pipeline invocation.

use crate::core::OcrError;
use image::ImageFormat;
use std::path::Path;
use std::sync::Arc;

/// An uploaded image: raw bytes plus a declared format and identifier.
///
/// The pipeline performs no size or format validation up front; bytes that
/// cannot be decoded surface as an invalid-image error for that single
/// image. The buffer is transient and dropped when its result is produced.
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Caller-supplied identifier, usually the upload filename.
    pub source_id: Arc<str>,
    /// The encoded image bytes.
    pub bytes: Vec<u8>,
    /// Declared encoding, when the caller knows it. If None the format is
    /// guessed from the byte content.
    pub declared_format: Option<ImageFormat>,
}

impl RawImage {
    /// Creates a raw image from bytes with no declared format.
    pub fn new(source_id: impl Into<Arc<str>>, bytes: Vec<u8>) -> Self {
        Self {
            source_id: source_id.into(),
            bytes,
            declared_format: None,
        }
    }

    /// Creates a raw image with a declared format.
    pub fn with_format(
        source_id: impl Into<Arc<str>>,
        bytes: Vec<u8>,
        format: ImageFormat,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            bytes,
            declared_format: Some(format),
        }
    }

    /// Reads a raw image from disk, taking the file name as the source
    /// identifier and deriving the declared format from the extension.
    pub fn from_path(path: &Path) -> Result<Self, OcrError> {
        let bytes = std::fs::read(path)?;
        let source_id: Arc<str> = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned())
            .into();
        Ok(Self {
            source_id,
            bytes,
            declared_format: ImageFormat::from_path(path).ok(),
        })
    }
}
