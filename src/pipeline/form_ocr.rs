//! Batch coordinator driving the per-image pipeline.

use super::recognizer::TextRecognizer;
use crate::core::{FormOcrConfig, OcrError, PipelineStats, StatsManager};
use crate::domain::{BatchResult, ImageResult, RawImage};
use crate::engine::TextEngine;
use crate::fields;
use crate::processors::enhance_gray;
use crate::utils::decode_gray;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The image-to-structured-form-data pipeline.
///
/// One instance owns a recognition engine and a configuration and can be
/// shared across threads. Each image moves through decode, enhancement,
/// recognition and field extraction independently; batches fan out over a
/// rayon pool when they are large enough.
pub struct FormOcr {
    recognizer: TextRecognizer,
    config: FormOcrConfig,
    stats: StatsManager,
    pool: Option<rayon::ThreadPool>,
}

impl FormOcr {
    /// Creates a pipeline around the given engine with default
    /// configuration.
    pub fn new(engine: Arc<dyn TextEngine>) -> Self {
        let config = FormOcrConfig::default();
        Self {
            recognizer: TextRecognizer::new(engine, &config),
            config,
            stats: StatsManager::new(),
            pool: None,
        }
    }

    /// Creates a pipeline with an explicit configuration.
    ///
    /// When `parallel.max_threads` is set, batch work runs on a dedicated
    /// rayon pool of that size instead of the global pool.
    pub fn with_config(
        engine: Arc<dyn TextEngine>,
        config: FormOcrConfig,
    ) -> Result<Self, OcrError> {
        config.validate()?;
        let pool = match config.parallel.max_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| OcrError::config(format!("building worker pool: {e}")))?,
            ),
            None => None,
        };
        Ok(Self {
            recognizer: TextRecognizer::new(engine, &config),
            config,
            stats: StatsManager::new(),
            pool,
        })
    }

    /// Runs the full pipeline on a single image.
    ///
    /// An image with no legible text succeeds with empty spans and fields.
    /// Errors here are per-image unless the engine itself is unavailable.
    pub fn process_image(&self, raw: &RawImage) -> Result<ImageResult, OcrError> {
        debug!(source_id = %raw.source_id, bytes = raw.bytes.len(), "processing image");

        let gray = decode_gray(raw)?;
        let enhanced = enhance_gray(&gray);
        drop(gray);

        let spans = self.recognizer.recognize(&enhanced, raw)?;
        drop(enhanced);

        let extracted = fields::extract(&spans);
        debug!(
            source_id = %raw.source_id,
            spans = spans.len(),
            fields = extracted.len(),
            "image processed"
        );
        Ok(ImageResult::success(raw.source_id.clone(), spans, extracted))
    }

    /// Processes a batch of images, preserving submission order in the
    /// results.
    ///
    /// Per-image failures become `Failed` entries; a batch-fatal error
    /// (the engine is unusable) aborts the whole call. Batches larger than
    /// `parallel.image_threshold` fan out across the rayon pool.
    pub fn process_batch(&self, images: &[RawImage]) -> Result<BatchResult, OcrError> {
        let started = Instant::now();
        let deadline = self.config.batch_timeout.map(|t| started + t);

        info!(images = images.len(), "processing batch");

        let run_one = |(index, raw): (usize, &RawImage)| -> Result<(usize, ImageResult), OcrError> {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                warn!(source_id = %raw.source_id, "batch deadline passed, skipping image");
                return Ok((
                    index,
                    ImageResult::failed(raw.source_id.clone(), "batch timeout exceeded"),
                ));
            }
            match self.process_image(raw) {
                Ok(result) => Ok((index, result)),
                Err(err) if err.is_batch_fatal() => Err(err),
                Err(err) => {
                    warn!(source_id = %raw.source_id, error = %err, "image failed");
                    Ok((index, ImageResult::failed(raw.source_id.clone(), err.to_string())))
                }
            }
        };

        let mut indexed: Vec<(usize, ImageResult)> =
            if images.len() > self.config.parallel.image_threshold {
                let work = || {
                    images
                        .par_iter()
                        .enumerate()
                        .map(run_one)
                        .collect::<Result<Vec<_>, OcrError>>()
                };
                match &self.pool {
                    Some(pool) => pool.install(work)?,
                    None => work()?,
                }
            } else {
                images
                    .iter()
                    .enumerate()
                    .map(run_one)
                    .collect::<Result<Vec<_>, OcrError>>()?
            };

        indexed.sort_by_key(|(index, _)| *index);
        let results = indexed.into_iter().map(|(_, result)| result).collect();
        let batch = BatchResult::from_results(results);

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.stats
            .update(batch.len(), batch.succeeded, batch.failed, elapsed_ms);
        info!(
            images = batch.len(),
            succeeded = batch.succeeded,
            failed = batch.failed,
            elapsed_ms,
            "batch complete"
        );

        Ok(batch)
    }

    /// A snapshot of the lifetime statistics for this pipeline instance.
    pub fn stats(&self) -> PipelineStats {
        self.stats.get_stats()
    }

    /// Resets the lifetime statistics.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &FormOcrConfig {
        &self.config
    }
}
