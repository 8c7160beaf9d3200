//! Configuration for the form extraction pipeline.

use super::constants::{
    DEFAULT_CONFIDENCE_FLOOR, DEFAULT_IMAGE_THRESHOLD, DEFAULT_RETRY_THRESHOLD,
};
use super::errors::OcrError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parallel processing behavior for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of worker threads for batch processing.
    /// If None, rayon's default pool size is used (number of CPU cores).
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Batches with at most this many images are processed sequentially.
    /// Default: 1 (single images sequential, anything more in parallel).
    #[serde(default = "ParallelPolicy::default_image_threshold")]
    pub image_threshold: usize,
}

impl ParallelPolicy {
    /// Creates a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of worker threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Sets the sequential/parallel image count threshold.
    pub fn with_image_threshold(mut self, threshold: usize) -> Self {
        self.image_threshold = threshold;
        self
    }

    fn default_image_threshold() -> usize {
        DEFAULT_IMAGE_THRESHOLD
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            image_threshold: Self::default_image_threshold(),
        }
    }
}

/// Configuration for a [`FormOcr`](crate::pipeline::FormOcr) pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormOcrConfig {
    /// Parallelism settings for batch execution.
    #[serde(default)]
    pub parallel: ParallelPolicy,

    /// Spans with confidence below this floor are discarded.
    #[serde(default = "FormOcrConfig::default_confidence_floor")]
    pub confidence_floor: f32,

    /// Mean span confidence below which the recognizer retries on the
    /// unenhanced image.
    #[serde(default = "FormOcrConfig::default_retry_threshold")]
    pub retry_threshold: f32,

    /// Serialize all engine invocations behind a pipeline-owned lock.
    /// Required for engines that are not safe to call concurrently.
    #[serde(default)]
    pub serialize_engine: bool,

    /// Optional whole-batch deadline. Images whose processing has not
    /// started by the deadline are reported Failed with a timeout reason;
    /// in-flight work is not cancelled.
    #[serde(default)]
    pub batch_timeout: Option<Duration>,
}

impl FormOcrConfig {
    /// Creates a new FormOcrConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parallelism policy.
    pub fn with_parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the span confidence floor.
    pub fn with_confidence_floor(mut self, floor: f32) -> Self {
        self.confidence_floor = floor;
        self
    }

    /// Sets the recognition retry threshold.
    pub fn with_retry_threshold(mut self, threshold: f32) -> Self {
        self.retry_threshold = threshold;
        self
    }

    /// Forces engine access to be serialized behind a lock.
    pub fn with_serialized_engine(mut self, serialize: bool) -> Self {
        self.serialize_engine = serialize;
        self
    }

    /// Sets the whole-batch deadline.
    pub fn with_batch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.batch_timeout = timeout;
        self
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), OcrError> {
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(OcrError::config(format!(
                "confidence_floor must be within [0, 1], got {}",
                self.confidence_floor
            )));
        }
        if !(0.0..=1.0).contains(&self.retry_threshold) {
            return Err(OcrError::config(format!(
                "retry_threshold must be within [0, 1], got {}",
                self.retry_threshold
            )));
        }
        if self.parallel.max_threads == Some(0) {
            return Err(OcrError::config(
                "parallel.max_threads must be at least 1 when set",
            ));
        }
        Ok(())
    }

    fn default_confidence_floor() -> f32 {
        DEFAULT_CONFIDENCE_FLOOR
    }

    fn default_retry_threshold() -> f32 {
        DEFAULT_RETRY_THRESHOLD
    }
}

impl Default for FormOcrConfig {
    fn default() -> Self {
        Self {
            parallel: ParallelPolicy::default(),
            confidence_floor: Self::default_confidence_floor(),
            retry_threshold: Self::default_retry_threshold(),
            serialize_engine: false,
            batch_timeout: None,
        }
    }
}
