//! Core domain types for the Shillscope feature pipeline.
//!
//! The types here describe the input boundary (rating events and tables),
//! the crowd baselines derived from it (item statistics and the rating
//! distribution), per-user profiles, and the labelled feature rows the
//! pipeline produces. They are plain immutable values: every baseline is
//! computed once per run and then shared read-only.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod feature;
mod label;
mod profile;
mod rating;
mod stats;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use feature::{FEATURE_COLUMNS, FeatureTable, UndefinedCounts, UserFeatureVector};
pub use label::{
    AuthenticityLabel, AuthenticityLabelError, InauthenticUsers, LabelSource, UniformLabel,
};
pub use profile::{UserProfile, UserProfiles};
pub use rating::{
    DEFAULT_RATING_MAX, RatingEvent, RatingScale, RatingScaleError, RatingTable,
    RatingTableError,
};
pub use stats::{ItemStats, ItemStatsIndex, RatingDistribution};
