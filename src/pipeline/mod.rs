//! The end-to-end form extraction pipeline.
//!
//! [`FormOcr`] ties the stages together: decode, enhancement, recognition
//! with retry, field extraction and batch coordination with optional
//! parallelism.

mod form_ocr;
mod recognizer;

pub use form_ocr::FormOcr;
