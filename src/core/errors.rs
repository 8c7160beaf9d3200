//! Error types for the form extraction pipeline.
//!
//! The taxonomy distinguishes per-image errors, which the batch coordinator
//! converts into a `Failed` image result, from batch-fatal errors, which
//! abort the whole batch. Absence of detected text is never an error.

use thiserror::Error;

/// The stage of the per-image pipeline an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred while decoding raw image bytes.
    Decode,
    /// Error occurred during image enhancement.
    Enhancement,
    /// Error occurred during text recognition.
    Recognition,
    /// Error occurred during field extraction.
    FieldExtraction,
    /// Error occurred during batch coordination.
    BatchProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Decode => write!(f, "decode"),
            ProcessingStage::Enhancement => write!(f, "enhancement"),
            ProcessingStage::Recognition => write!(f, "recognition"),
            ProcessingStage::FieldExtraction => write!(f, "field extraction"),
            ProcessingStage::BatchProcessing => write!(f, "batch processing"),
        }
    }
}

/// Errors produced by the form extraction pipeline.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The raw bytes for a single image could not be decoded.
    ///
    /// Per-image and recoverable: the batch coordinator marks that image
    /// `Failed` and continues with its siblings.
    #[error("invalid image: {context}")]
    InvalidImage {
        /// What was being decoded when the failure occurred.
        context: String,
        /// The underlying decoder error, when one exists.
        #[source]
        source: Option<image::ImageError>,
    },

    /// The shared recognition engine cannot function at all.
    ///
    /// Batch-fatal: no image in the batch can be processed, so the whole
    /// request fails as a unit.
    #[error("recognizer unavailable: {message}")]
    RecognizerUnavailable {
        /// Why the engine is unusable (e.g. missing model data).
        message: String,
    },

    /// A pipeline stage failed on a single image.
    #[error("{stage} failed: {context}")]
    Processing {
        /// The stage that failed.
        stage: ProcessingStage,
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Input that violates a pipeline precondition.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// A configuration value is out of range or inconsistent.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration problem.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl OcrError {
    /// Creates an error for undecodable image bytes.
    pub fn invalid_image(context: impl Into<String>, source: Option<image::ImageError>) -> Self {
        Self::InvalidImage {
            context: context.into(),
            source,
        }
    }

    /// Creates a batch-fatal error for an unusable recognition engine.
    pub fn recognizer_unavailable(message: impl Into<String>) -> Self {
        Self::RecognizerUnavailable {
            message: message.into(),
        }
    }

    /// Creates an error for a failed pipeline stage.
    pub fn processing(
        stage: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            stage,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for a configuration problem.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this error must abort the whole batch rather than
    /// fail a single image.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, OcrError::RecognizerUnavailable { .. })
    }
}
