//! Constants used throughout the form extraction pipeline.

/// Sigma of the Gaussian smoothing applied before binarization.
///
/// Approximates a 3x3 kernel: enough to suppress sensor and compression
/// noise without eating thin glyph strokes. Not exposed in configuration.
pub const GAUSSIAN_SIGMA: f32 = 0.8;

/// Radius of the structuring element for the morphological cleanup pass.
pub const MORPH_RADIUS: u8 = 1;

/// Spans with confidence below this are dropped from recognition output.
pub const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.2;

/// Mean span confidence below which recognition is retried on the
/// unenhanced image.
pub const DEFAULT_RETRY_THRESHOLD: f32 = 0.5;

/// Batches larger than this are processed in parallel.
pub const DEFAULT_IMAGE_THRESHOLD: usize = 1;
