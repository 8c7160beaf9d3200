//! Tesseract-backed [`TextEngine`] via `leptess`.

use super::TextEngine;
use crate::core::{OcrError, ProcessingStage};
use crate::domain::{BoundingBox, TextSpan};
use image::{DynamicImage, GrayImage, ImageFormat};
use leptess::LepTess;
use std::io::Cursor;
use std::sync::Mutex;

/// A [`TextEngine`] backed by a local Tesseract installation.
///
/// `LepTess` is not `Sync`, so the handle lives behind a mutex and calls
/// are serialized at this level regardless of the pipeline's
/// `serialize_engine` setting.
pub struct TesseractEngine {
    inner: Mutex<LepTess>,
}

impl TesseractEngine {
    /// Initializes Tesseract for the given language, e.g. `"eng"`.
    ///
    /// `datapath` overrides the tessdata directory; `None` uses the
    /// installation default.
    pub fn new(datapath: Option<&str>, lang: &str) -> Result<Self, OcrError> {
        let inner = LepTess::new(datapath, lang).map_err(|e| {
            OcrError::recognizer_unavailable(format!(
                "tesseract init failed for language '{lang}': {e}"
            ))
        })?;
        Ok(Self {
            inner: Mutex::new(inner),
        })
    }
}

impl TextEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &GrayImage) -> Result<Vec<TextSpan>, OcrError> {
        let (width, height) = image.dimensions();
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image.clone())
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| {
                OcrError::processing(ProcessingStage::Recognition, "encoding input image", e)
            })?;

        let mut tess = self
            .inner
            .lock()
            .map_err(|_| OcrError::recognizer_unavailable("tesseract handle poisoned"))?;

        tess.set_image_from_mem(&png).map_err(|e| {
            OcrError::processing(ProcessingStage::Recognition, "loading image into tesseract", e)
        })?;

        let text = tess.get_utf8_text().map_err(|e| {
            OcrError::processing(ProcessingStage::Recognition, "running recognition", e)
        })?;
        let confidence = (tess.mean_text_conf() as f32 / 100.0).clamp(0.0, 1.0);

        let region = BoundingBox::from_coords(0.0, 0.0, width as f32, height as f32);
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| TextSpan::new(line, confidence, region.clone()))
            .collect())
    }
}
