//! Image processing for the form extraction pipeline.
//!
//! # Modules
//!
//! * `enhance` - the fixed enhancement pipeline run on every image before
//!   recognition (smoothing, Otsu binarization, morphological cleanup)

mod enhance;

pub use enhance::{enhance_gray, enhance_image};
