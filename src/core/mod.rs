//! Core components of the form extraction pipeline.
//!
//! This module contains the fundamental building blocks shared by the rest
//! of the crate:
//! - Error handling
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Pipeline statistics
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod stats;

pub use config::{FormOcrConfig, ParallelPolicy};
pub use constants::*;
pub use errors::{OcrError, ProcessingStage};
pub use stats::{PipelineStats, StatsManager};

/// Initializes the tracing subscriber for logging.
///
/// Sets up the tracing subscriber with an environment filter and formatting
/// layer. Typically called once at application start.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
