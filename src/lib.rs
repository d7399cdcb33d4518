//! Facade crate for the Shillscope feature pipeline.
//!
//! This crate re-exports the core domain types and the extraction API. The
//! threaded per-user stage is available behind the `parallel` feature.

#![forbid(unsafe_code)]

pub use shillscope_core::{
    AuthenticityLabel, FEATURE_COLUMNS, FeatureTable, InauthenticUsers, ItemStats,
    ItemStatsIndex, LabelSource, RatingDistribution, RatingEvent, RatingScale, RatingScaleError,
    RatingTable, RatingTableError, UndefinedCounts, UniformLabel, UserFeatureVector, UserProfile,
    UserProfiles,
};

pub use shillscope_features::{
    ExtractionError, ExtractionOptions, FeatureExtractionPipeline, FeatureExtractor, Parallelism,
    PipelineBaselines, UserWeights, extract_features,
};

#[cfg(feature = "test-support")]
pub use shillscope_core::test_support;
