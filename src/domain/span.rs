//! Recognized text spans.

use super::geometry::BoundingBox;
use std::sync::Arc;

/// A single detected region of recognized text.
///
/// Spans are produced in detection order, which is not guaranteed to be
/// reading order. Confidence is an opaque value from the underlying engine
/// in `[0, 1]`, used only for comparison and conservative aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The recognized text.
    pub text: Arc<str>,
    /// The engine's confidence for this span, in `[0, 1]`.
    pub confidence: f32,
    /// Where in the image the text was found.
    pub region: BoundingBox,
}

impl TextSpan {
    /// Creates a new text span.
    pub fn new(text: impl Into<Arc<str>>, confidence: f32, region: BoundingBox) -> Self {
        Self {
            text: text.into(),
            confidence,
            region,
        }
    }

    /// Returns true if the span carries non-whitespace text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Mean confidence over a set of spans, 0.0 when empty.
pub fn mean_confidence(spans: &[TextSpan]) -> f32 {
    if spans.is_empty() {
        return 0.0;
    }
    spans.iter().map(|s| s.confidence).sum::<f32>() / spans.len() as f32
}
