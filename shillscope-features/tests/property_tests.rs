//! Property-based tests for feature extraction.
//!
//! # Invariants tested
//!
//! - **Coverage:** one row per distinct user, in ascending user order.
//! - **Distribution:** global shares sum to one for in-scale tables.
//! - **Degenerate profiles:** `LenVar` is zero for a single rating and the
//!   degree of similarity is zero below two items.
//! - **Bounds:** correlations stay within `[-1, 1]` and similarities within
//!   `[0, 1]`.
//! - **Damping:** `RDMA_LenVar` equals `RDMA_similarity / (1 + LenVar)`.
//! - **Determinism:** threaded runs reproduce sequential runs exactly.
#![expect(
    clippy::float_arithmetic,
    reason = "properties compare floating-point descriptors"
)]


use proptest::prelude::*;
use shillscope_core::{AuthenticityLabel, LabelSource, RatingScale, UniformLabel};
use shillscope_features::{build_profiles, compute_rating_distribution, extract_features};
#[cfg(feature = "parallel")]
use shillscope_features::{ExtractionOptions, FeatureExtractionPipeline, Parallelism};

use proptest_support::{distinct_users, inauthentic_strategy, rating_table_strategy};

const TOLERANCE: f64 = 1e-9;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: every distinct user gets exactly one row, in ascending order.
    #[test]
    fn one_row_per_user(table in rating_table_strategy(60), flagged in inauthentic_strategy()) {
        let features = extract_features(&table, &flagged);
        let rows: Vec<u64> = features.user_ids().collect();
        prop_assert_eq!(rows, distinct_users(&table));
    }

    /// Property: labels are taken from the label source for every row.
    #[test]
    fn labels_follow_label_source(table in rating_table_strategy(60), flagged in inauthentic_strategy()) {
        let features = extract_features(&table, &flagged);
        for row in features.rows() {
            prop_assert_eq!(row.authenticity, flagged.label(row.user_id));
            let expected = if flagged.contains(row.user_id) {
                AuthenticityLabel::Inauthentic
            } else {
                AuthenticityLabel::Authentic
            };
            prop_assert_eq!(row.authenticity, expected);
        }
    }

    /// Property: shares of an in-scale table sum to one.
    #[test]
    fn distribution_shares_sum_to_one(table in rating_table_strategy(60)) {
        match compute_rating_distribution(&table, RatingScale::default()) {
            Some(distribution) => {
                prop_assert_eq!(distribution.len(), 5);
                prop_assert!((distribution.total() - 1.0).abs() < TOLERANCE);
            }
            None => prop_assert!(table.is_empty()),
        }
    }

    /// Property: degenerate profiles produce the documented neutral values.
    #[test]
    fn small_profiles_have_neutral_descriptors(table in rating_table_strategy(60)) {
        let profiles = build_profiles(&table);
        let features = extract_features(&table, &everyone_authentic());
        for row in features.rows() {
            let Some(profile) = profiles.get(row.user_id) else {
                return Err(TestCaseError::fail(format!("profile for user {}", row.user_id)));
            };
            if profile.len() <= 1 {
                prop_assert_eq!(row.len_var, 0.0);
            }
            if profile.len() < 2 {
                prop_assert_eq!(row.degree_of_similarity, 0.0);
            }
        }
    }

    /// Property: correlations and similarities stay within their ranges.
    #[test]
    fn descriptors_stay_in_range(table in rating_table_strategy(60)) {
        let features = extract_features(&table, &everyone_authentic());
        for row in features.rows() {
            prop_assert!((-1.0 - TOLERANCE..=1.0 + TOLERANCE).contains(&row.degree_of_similarity));
            if let Some(cosine) = row.cosine_similarity {
                prop_assert!((0.0..=1.0 + TOLERANCE).contains(&cosine));
            }
            if let Some(similarity) = row.rdma_similarity {
                prop_assert!((0.0..=1.0 + TOLERANCE).contains(&similarity));
            }
            prop_assert!(row.len_var >= 0.0);
            prop_assert!(row.tfidf >= 0.0);
        }
    }

    /// Property: the damped similarity is the similarity over `1 + LenVar`.
    #[test]
    fn damped_similarity_matches_its_definition(table in rating_table_strategy(60)) {
        let features = extract_features(&table, &everyone_authentic());
        for row in features.rows() {
            match (row.rdma_similarity, row.rdma_len_var) {
                (Some(similarity), Some(damped)) => {
                    let expected = similarity / (1.0 + row.len_var);
                    prop_assert!((damped - expected).abs() < TOLERANCE);
                }
                (None, None) => {}
                other => {
                    return Err(TestCaseError::fail(format!(
                        "damped similarity definedness diverged: {other:?}"
                    )));
                }
            }
        }
    }

    /// Property: a threaded run reproduces the sequential feature table.
    #[cfg(feature = "parallel")]
    #[test]
    fn threaded_runs_are_deterministic(
        table in rating_table_strategy(60),
        flagged in inauthentic_strategy(),
        threads in 1_usize..=4,
    ) {
        let sequential = extract_features(&table, &flagged);
        let options = ExtractionOptions::default().with_parallelism(Parallelism::Threads(threads));
        let pipeline = match FeatureExtractionPipeline::new(options) {
            Ok(pipeline) => pipeline,
            Err(err) => return Err(TestCaseError::fail(format!("build pipeline: {err}"))),
        };
        prop_assert_eq!(pipeline.run(&table, &flagged), sequential);
    }
}

const fn everyone_authentic() -> UniformLabel {
    UniformLabel(AuthenticityLabel::Authentic)
}
