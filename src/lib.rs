//! Extract structured form fields from photographs of documents.
//!
//! snapform takes raw uploaded image bytes, cleans them up for recognition,
//! runs a pluggable OCR engine over them and classifies the recognized text
//! into typed form fields (email, phone, date, amount, id number, address,
//! name). Batches of images are processed in parallel with per-image fault
//! isolation: one bad upload fails alone, not the batch.
//!
//! # Pipeline stages
//!
//! 1. **Decode** raw bytes into a grayscale image
//!    ([`utils::decode_gray`]).
//! 2. **Enhance** with smoothing, Otsu binarization and morphological
//!    cleanup ([`processors::enhance_gray`]). Enhancement is idempotent:
//!    re-enhancing an already enhanced image changes nothing.
//! 3. **Recognize** text through a [`TextEngine`](engine::TextEngine),
//!    retrying on the unenhanced image when the first pass reads poorly.
//! 4. **Extract** typed fields from the recognized spans with an ordered
//!    rule table ([`fields::extract`]).
//!
//! # Quick start
//!
//! ```
//! use snapform::prelude::*;
//! use std::sync::Arc;
//!
//! // Any TextEngine works; production builds enable the `tesseract`
//! // feature and use snapform::engine::TesseractEngine.
//! struct EchoEngine;
//!
//! impl TextEngine for EchoEngine {
//!     fn name(&self) -> &'static str {
//!         "echo"
//!     }
//!
//!     fn recognize(
//!         &self,
//!         _image: &image::GrayImage,
//!     ) -> Result<Vec<TextSpan>, OcrError> {
//!         Ok(vec![TextSpan::new(
//!             "Email: john@example.com",
//!             0.92,
//!             BoundingBox::from_coords(0.0, 0.0, 100.0, 20.0),
//!         )])
//!     }
//! }
//!
//! # fn main() -> Result<(), OcrError> {
//! let pipeline = FormOcr::new(Arc::new(EchoEngine));
//!
//! let mut png = Vec::new();
//! image::DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
//!     32,
//!     32,
//!     image::Luma([255]),
//! ))
//! .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
//! .unwrap();
//!
//! let batch = pipeline.process_batch(&[RawImage::new("form.png", png)])?;
//! assert_eq!(batch.succeeded, 1);
//! let email = &batch.results[0].fields[&FieldKind::Email];
//! assert_eq!(email.value, "john@example.com");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod engine;
pub mod fields;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::core::{init_tracing, FormOcrConfig, OcrError, ParallelPolicy, PipelineStats};
    pub use crate::domain::{
        BatchReport, BatchResult, BoundingBox, ExtractedField, FieldKind, ImageReport,
        ImageResult, ImageStatus, RawImage, TextSpan,
    };
    pub use crate::engine::TextEngine;
    pub use crate::pipeline::FormOcr;

    #[cfg(feature = "tesseract")]
    pub use crate::engine::TesseractEngine;
}
