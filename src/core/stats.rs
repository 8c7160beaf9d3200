//! Statistics tracking for the form extraction pipeline.

use serde::Serialize;
use std::sync::Mutex;

/// Aggregate statistics over every batch a pipeline instance has run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    /// Total number of images processed.
    pub total_processed: usize,
    /// Number of images that produced a successful result.
    pub succeeded: usize,
    /// Number of images that failed.
    pub failed: usize,
    /// Rolling average per-image processing time in milliseconds.
    pub average_image_time_ms: f64,
}

/// Thread-safe statistics manager owned by the pipeline.
pub struct StatsManager {
    stats: Mutex<PipelineStats>,
}

impl StatsManager {
    /// Creates a new StatsManager instance.
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(PipelineStats::default()),
        }
    }

    /// Gets a copy of the current statistics.
    pub fn get_stats(&self) -> PipelineStats {
        self.stats.lock().unwrap().clone()
    }

    /// Folds one batch's outcome into the running totals.
    ///
    /// `elapsed_ms` is the wall-clock time for the whole batch; the rolling
    /// average is maintained per image with the incremental formula.
    pub fn update(&self, processed: usize, succeeded: usize, failed: usize, elapsed_ms: f64) {
        let mut stats = self.stats.lock().unwrap();

        stats.total_processed += processed;
        stats.succeeded += succeeded;
        stats.failed += failed;

        let new_count = stats.total_processed;
        if new_count > 0 {
            let old_count = new_count - processed;
            let old_total = stats.average_image_time_ms * old_count as f64;
            stats.average_image_time_ms = (old_total + elapsed_ms) / new_count as f64;
        }
    }

    /// Resets the statistics.
    pub fn reset(&self) {
        let mut stats = self.stats.lock().unwrap();
        *stats = PipelineStats::default();
    }
}

impl Default for StatsManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_maintains_incremental_average() {
        let manager = StatsManager::new();

        manager.update(1, 1, 0, 100.0);
        let stats = manager.get_stats();
        assert_eq!(stats.total_processed, 1);
        assert_eq!(stats.average_image_time_ms, 100.0);

        manager.update(1, 0, 1, 200.0);
        let stats = manager.get_stats();
        assert_eq!(stats.total_processed, 2);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.average_image_time_ms, 150.0);

        // A batch of 2 images that took 50ms total.
        manager.update(2, 2, 0, 50.0);
        let stats = manager.get_stats();
        assert_eq!(stats.total_processed, 4);
        assert_eq!(stats.average_image_time_ms, 87.5);
    }

    #[test]
    fn reset_clears_totals() {
        let manager = StatsManager::new();
        manager.update(5, 4, 1, 500.0);
        manager.reset();

        let stats = manager.get_stats();
        assert_eq!(stats.total_processed, 0);
        assert_eq!(stats.succeeded, 0);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.average_image_time_ms, 0.0);
    }
}
