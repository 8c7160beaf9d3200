//! Per-image and batch result types, plus the serializable report schema.

use super::field::{ExtractedField, FieldKind};
use super::span::{mean_confidence, TextSpan};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Outcome of processing a single image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageStatus {
    /// The pipeline completed. An image with no detected text is still a
    /// success: absence of text is valid output.
    Success,
    /// The image could not be processed.
    Failed {
        /// Human-readable reason for the failure.
        reason: String,
    },
}

impl ImageStatus {
    /// Returns true for successful results.
    pub fn is_success(&self) -> bool {
        matches!(self, ImageStatus::Success)
    }
}

/// Everything extracted from one submitted image.
#[derive(Debug, Clone)]
pub struct ImageResult {
    /// Identifier of the submitted image, usually the upload filename.
    pub source_id: Arc<str>,
    /// Recognized spans in detection order.
    pub raw_text: Vec<TextSpan>,
    /// Extracted fields, keyed by field kind. Fields with no match are
    /// absent; absence is meaningful.
    pub fields: BTreeMap<FieldKind, ExtractedField>,
    /// Mean span confidence, 0.0 when no spans were recognized.
    pub overall_confidence: f32,
    /// Success or failure of this image.
    pub status: ImageStatus,
}

impl ImageResult {
    /// Builds a successful result from recognized spans and extracted
    /// fields.
    pub fn success(
        source_id: Arc<str>,
        raw_text: Vec<TextSpan>,
        fields: BTreeMap<FieldKind, ExtractedField>,
    ) -> Self {
        let overall_confidence = mean_confidence(&raw_text);
        Self {
            source_id,
            raw_text,
            fields,
            overall_confidence,
            status: ImageStatus::Success,
        }
    }

    /// Builds a failed result with empty text and fields.
    pub fn failed(source_id: Arc<str>, reason: impl Into<String>) -> Self {
        Self {
            source_id,
            raw_text: Vec::new(),
            fields: BTreeMap::new(),
            overall_confidence: 0.0,
            status: ImageStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    /// Converts this result into the serializable report schema.
    pub fn to_report(&self) -> ImageReport {
        let (status, error) = match &self.status {
            ImageStatus::Success => ("success".to_string(), None),
            ImageStatus::Failed { reason } => ("failed".to_string(), Some(reason.clone())),
        };
        ImageReport {
            filename: self.source_id.to_string(),
            status,
            confidence: self.overall_confidence,
            fields: self
                .fields
                .values()
                .map(|f| (f.kind.as_str().to_string(), f.value.clone()))
                .collect(),
            raw_text: self.raw_text.iter().map(|s| s.text.to_string()).collect(),
            error,
        }
    }
}

impl fmt::Display for ImageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source: {}", self.source_id)?;
        match &self.status {
            ImageStatus::Success => writeln!(f, "Status: success")?,
            ImageStatus::Failed { reason } => writeln!(f, "Status: failed ({reason})")?,
        }
        writeln!(f, "Spans: {}", self.raw_text.len())?;
        writeln!(f, "Overall confidence: {:.3}", self.overall_confidence)?;
        for field in self.fields.values() {
            writeln!(
                f,
                "  {}: '{}' (confidence: {:.3})",
                field.kind, field.value, field.confidence
            )?;
        }
        Ok(())
    }
}

/// Results for a whole submitted batch, one entry per image in submission
/// order.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Per-image results, ordered to match submission order.
    pub results: Vec<ImageResult>,
    /// Number of images that succeeded.
    pub succeeded: usize,
    /// Number of images that failed.
    pub failed: usize,
}

impl BatchResult {
    /// Builds a batch result from ordered per-image results, computing the
    /// aggregate counts.
    pub fn from_results(results: Vec<ImageResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.status.is_success()).count();
        let failed = results.len() - succeeded;
        Self {
            results,
            succeeded,
            failed,
        }
    }

    /// Number of images in the batch.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if the batch contained no images.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Converts this batch into the serializable report schema.
    pub fn to_report(&self) -> BatchReport {
        BatchReport {
            results: self.results.iter().map(ImageResult::to_report).collect(),
            succeeded: self.succeeded,
            failed: self.failed,
        }
    }
}

/// Serializable per-image report consumed by the glue layer.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    /// Identifier of the submitted image.
    pub filename: String,
    /// "success" or "failed".
    pub status: String,
    /// Mean span confidence.
    pub confidence: f32,
    /// Extracted field values, keyed by field name.
    pub fields: BTreeMap<String, String>,
    /// Recognized text in detection order.
    pub raw_text: Vec<String>,
    /// Failure reason, present only for failed images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Serializable batch report consumed by the glue layer.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Per-image reports in submission order.
    pub results: Vec<ImageReport>,
    /// Number of images that succeeded.
    pub succeeded: usize,
    /// Number of images that failed.
    pub failed: usize,
}
