//! Error types raised while configuring feature extraction.
#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised when building a [`FeatureExtractionPipeline`](crate::FeatureExtractionPipeline).
///
/// Metric computation itself never fails; degenerate profiles produce
/// undefined values instead.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// A threaded run asked for zero worker threads.
    #[error("thread count must be positive")]
    InvalidThreadCount,
    /// Threaded extraction was requested without the `parallel` feature.
    #[error("threaded extraction requires the `parallel` feature to be enabled")]
    ParallelUnavailable,
    /// The worker pool could not be created.
    #[cfg(feature = "parallel")]
    #[error("failed to build extraction thread pool with {threads} threads")]
    ThreadPool {
        /// Requested number of worker threads.
        threads: usize,
        /// Source error from `rayon`.
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}
