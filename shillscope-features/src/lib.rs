//! Behavioural feature extraction for rating-based shilling detection.
//!
//! The crate turns a [`RatingTable`](shillscope_core::RatingTable) into one
//! labelled [`UserFeatureVector`](shillscope_core::UserFeatureVector) per
//! user. A run has two stages:
//! - **Baselines** are computed once from the whole table: per-item mean
//!   and count, the global rating distribution, the item catalogue, user
//!   profiles and corpus TF-IDF weights.
//! - **Per-user descriptors** compare each profile against those frozen
//!   baselines. Users are independent of one another, so this stage can
//!   run on a `rayon` pool when the `parallel` feature is enabled.
//!
//! # Examples
//!
//! ```
//! use shillscope_core::test_support::{push_attack_table, push_attackers};
//! use shillscope_core::AuthenticityLabel;
//! use shillscope_features::extract_features;
//!
//! let table = extract_features(&push_attack_table(), &push_attackers());
//! let attacker = table.get(900).expect("attacker row");
//! assert_eq!(attacker.authenticity, AuthenticityLabel::Inauthentic);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod corpus;
mod error;
mod extractor;
mod numeric;
mod pipeline;
mod profiles;
mod stats;
mod types;

pub use corpus::{UserWeights, compute_user_weights, inverse_document_frequencies};
pub use error::ExtractionError;
pub use extractor::{FeatureExtractor, rating_variance};
pub use pipeline::{FeatureExtractionPipeline, PipelineBaselines, extract_features};
pub use profiles::{all_items, build_profiles};
pub use stats::{compute_item_stats, compute_rating_distribution, overall_item_mean};
pub use types::{ExtractionOptions, Parallelism};
