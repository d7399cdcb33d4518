//! Corpus-wide TF-IDF weighting with users as documents and items as terms.
//!
//! Each user becomes a binary incidence row over the item catalogue: a cell
//! is `1` when the user rated the item, whatever the rating value. Rating
//! magnitude is discarded here on purpose; the deviation metrics cover it.
//!
//! Rows are weighted with the smoothed inverse document frequency
//! `ln((1 + N) / (1 + df)) + 1`, L2-normalised, and averaged across every
//! catalogue column (zeros included) to give one score per user. Document
//! frequencies depend on the whole population, so the weights are rebuilt
//! whenever the user set changes.

use std::collections::BTreeMap;

use shillscope_core::UserProfiles;

use crate::numeric::count_as_f64;

/// Mean TF-IDF weight per user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserWeights {
    weights: BTreeMap<u64, f64>,
}

impl UserWeights {
    /// Wrap a pre-computed map.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "weights are produced at runtime from profiles"
    )]
    #[must_use]
    pub fn new(weights: BTreeMap<u64, f64>) -> Self {
        Self { weights }
    }

    /// Weight of `user_id`, if the user was part of the corpus.
    #[must_use]
    pub fn get(&self, user_id: u64) -> Option<f64> {
        self.weights.get(&user_id).copied()
    }

    /// Iterate `(user_id, weight)` pairs in ascending user order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.weights.iter().map(|(&user, &weight)| (user, weight))
    }

    /// Number of weighted users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Report whether no user is weighted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Smoothed inverse document frequency of each catalogue item.
///
/// The result is aligned with `all_items`. `N` is the number of profiles and
/// `df` the number of profiles that rated the item.
///
/// # Examples
/// ```
/// use shillscope_core::{UserProfile, UserProfiles};
/// use shillscope_features::inverse_document_frequencies;
///
/// let profiles: UserProfiles = [
///     UserProfile::new(1).with_rating(10, 5),
///     UserProfile::new(2).with_rating(10, 1).with_rating(11, 4),
/// ]
/// .into_iter()
/// .collect();
/// let idf = inverse_document_frequencies(&profiles, &[10, 11]);
/// assert_eq!(idf[0], 1.0);
/// assert_eq!(idf[1], (3.0_f64 / 2.0).ln() + 1.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "inverse document frequency is a logarithm of a ratio"
)]
pub fn inverse_document_frequencies(profiles: &UserProfiles, all_items: &[u64]) -> Vec<f64> {
    let frequencies = document_frequencies(profiles);
    let documents = count_as_f64(profiles.len());
    all_items
        .iter()
        .map(|item_id| {
            let df = count_as_f64(frequencies.get(item_id).copied().unwrap_or(0));
            ((1.0 + documents) / (1.0 + df)).ln() + 1.0
        })
        .collect()
}

/// Mean L2-normalised TF-IDF weight of every user's incidence row.
///
/// Users without ratings, or an empty catalogue, score `0.0`. Items a user
/// rated that are missing from `all_items` are ignored.
#[must_use]
pub fn compute_user_weights(profiles: &UserProfiles, all_items: &[u64]) -> UserWeights {
    let idf = inverse_document_frequencies(profiles, all_items);
    let column_weights: BTreeMap<u64, f64> = all_items.iter().copied().zip(idf).collect();
    let columns = all_items.len();

    let weights = profiles
        .iter()
        .map(|profile| {
            let row: Vec<f64> = profile
                .ratings()
                .filter_map(|(item_id, _)| column_weights.get(&item_id).copied())
                .collect();
            (profile.user_id(), mean_normalised_weight(&row, columns))
        })
        .collect();
    UserWeights::new(weights)
}

fn document_frequencies(profiles: &UserProfiles) -> BTreeMap<u64, usize> {
    let mut frequencies = BTreeMap::new();
    for profile in profiles.iter() {
        for (item_id, _) in profile.ratings() {
            *frequencies.entry(item_id).or_insert(0) += 1;
        }
    }
    frequencies
}

/// Average of the L2-normalised row across `columns` cells.
///
/// `row` lists the non-zero cells only; the remaining cells are zero.
#[expect(
    clippy::float_arithmetic,
    reason = "row normalisation divides by the Euclidean norm"
)]
fn mean_normalised_weight(row: &[f64], columns: usize) -> f64 {
    if columns == 0 {
        return 0.0;
    }
    let norm = row.iter().map(|weight| weight * weight).sum::<f64>().sqrt();
    if norm == 0.0 {
        return 0.0;
    }
    let total: f64 = row.iter().map(|weight| weight / norm).sum();
    total / count_as_f64(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shillscope_core::UserProfile;
    use shillscope_core::test_support::worked_example_table;

    use crate::{all_items, build_profiles};

    const TOLERANCE: f64 = 1e-12;

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn worked_example_weights() {
        let table = worked_example_table();
        let profiles = build_profiles(&table);
        let items = all_items(&table);
        let weights = compute_user_weights(&profiles, &items);

        // Item 10 is rated by both users (idf 1), items 11 and 12 by one each.
        let rare = (3.0_f64 / 2.0).ln() + 1.0;
        let norm = (1.0 + rare * rare).sqrt();
        let expected = (1.0 / norm + rare / norm) / 3.0;

        for user_id in [1, 2] {
            let weight = weights.get(user_id).expect("user is weighted");
            assert!(
                (weight - expected).abs() < TOLERANCE,
                "user {user_id}: expected {expected}, got {weight}"
            );
        }
    }

    #[rstest]
    fn user_without_ratings_scores_zero() {
        let profiles: UserProfiles = [UserProfile::new(1).with_rating(5, 3), UserProfile::new(2)]
            .into_iter()
            .collect();
        let weights = compute_user_weights(&profiles, &[5]);
        assert_eq!(weights.get(2), Some(0.0));
        assert_eq!(weights.len(), 2);
    }

    #[rstest]
    fn empty_catalogue_scores_zero() {
        let profiles: UserProfiles = [UserProfile::new(1).with_rating(5, 3)].into_iter().collect();
        let weights = compute_user_weights(&profiles, &[]);
        assert_eq!(weights.get(1), Some(0.0));
    }

    #[rstest]
    fn rating_values_do_not_change_weights() {
        let low: UserProfiles = [
            UserProfile::new(1).with_rating(1, 1).with_rating(2, 1),
            UserProfile::new(2).with_rating(2, 1),
        ]
        .into_iter()
        .collect();
        let high: UserProfiles = [
            UserProfile::new(1).with_rating(1, 5).with_rating(2, 5),
            UserProfile::new(2).with_rating(2, 5),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            compute_user_weights(&low, &[1, 2]),
            compute_user_weights(&high, &[1, 2])
        );
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn unrated_catalogue_items_get_maximal_idf() {
        let profiles: UserProfiles = [UserProfile::new(1).with_rating(1, 4)].into_iter().collect();
        let idf = inverse_document_frequencies(&profiles, &[1, 2]);
        assert_eq!(idf.first().copied(), Some(1.0));
        let unrated = idf.get(1).copied().expect("idf for item 2");
        assert!((unrated - (2.0_f64.ln() + 1.0)).abs() < TOLERANCE);
    }
}
