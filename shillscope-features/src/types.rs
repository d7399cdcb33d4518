//! Public configuration types for feature extraction.
#![forbid(unsafe_code)]

use shillscope_core::RatingScale;

/// How the per-user stage is scheduled.
///
/// Every mode produces identical output; threads only change wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Extract users one after another on the calling thread.
    #[default]
    Sequential,
    /// Extract users on a dedicated pool with this many worker threads.
    Threads(usize),
}

/// Tunable options for a feature extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionOptions {
    /// Rating scale used for the distribution descriptors.
    pub scale: RatingScale,
    /// Scheduling of the per-user stage.
    pub parallelism: Parallelism,
}

impl ExtractionOptions {
    /// Replace the rating scale while returning `self` for chaining.
    #[must_use]
    pub const fn with_scale(mut self, scale: RatingScale) -> Self {
        self.scale = scale;
        self
    }

    /// Replace the scheduling mode while returning `self` for chaining.
    #[must_use]
    pub const fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }
}
