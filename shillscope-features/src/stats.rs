//! Crowd baselines computed over the whole rating table.

use std::collections::BTreeMap;

use shillscope_core::{ItemStats, ItemStatsIndex, RatingDistribution, RatingScale, RatingTable};

use crate::numeric::{count_as_f64, sum_as_f64};

/// Mean rating and rating count for every item present in `table`.
///
/// Every event counts, including repeated ratings of one item by the same
/// user. Items that never appear are absent from the index.
///
/// # Examples
/// ```
/// use shillscope_core::{RatingEvent, RatingTable};
/// use shillscope_features::compute_item_stats;
///
/// let table: RatingTable = [(1, 10, 5), (2, 10, 1)].into_iter().map(RatingEvent::from).collect();
/// let stats = compute_item_stats(&table);
/// assert_eq!(stats.get(10).map(|s| (s.mean, s.count)), Some((3.0, 2)));
/// ```
#[must_use]
pub fn compute_item_stats(table: &RatingTable) -> ItemStatsIndex {
    let mut totals: BTreeMap<u64, (u64, usize)> = BTreeMap::new();
    for event in table {
        let (sum, count) = totals.entry(event.item_id).or_insert((0, 0));
        *sum += u64::from(event.rating);
        *count += 1;
    }
    ItemStatsIndex::new(
        totals
            .into_iter()
            .map(|(item_id, (sum, count))| {
                let stats = ItemStats {
                    mean: mean_of(sum, count),
                    count,
                };
                (item_id, stats)
            })
            .collect(),
    )
}

/// Share of all events carrying each value of `scale`.
///
/// Returns `None` for an empty table. Ratings outside the scale count towards
/// the total but fall in no bin, so they shrink the distribution's mass.
#[must_use]
pub fn compute_rating_distribution(
    table: &RatingTable,
    scale: RatingScale,
) -> Option<RatingDistribution> {
    rating_shares(table.iter().map(|event| event.rating), scale).map(RatingDistribution::new)
}

/// Mean of all per-item means, or `None` when no item has statistics.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "averaging item means requires floating-point division"
)]
pub fn overall_item_mean(stats: &ItemStatsIndex) -> Option<f64> {
    if stats.is_empty() {
        return None;
    }
    let total: f64 = stats.iter().map(|(_, item)| item.mean).sum();
    Some(total / count_as_f64(stats.len()))
}

/// Histogram of `ratings` over `scale`, normalised by the number of ratings.
///
/// Returns `None` when `ratings` is empty.
#[expect(
    clippy::float_arithmetic,
    reason = "shares divide bin counts by the number of ratings"
)]
pub(crate) fn rating_shares(
    ratings: impl Iterator<Item = u8>,
    scale: RatingScale,
) -> Option<Vec<f64>> {
    let mut bins = vec![0_usize; scale.len()];
    let mut total = 0_usize;
    for rating in ratings {
        total += 1;
        if let Some(slot) = scale.bin(rating).and_then(|bin| bins.get_mut(bin)) {
            *slot += 1;
        }
    }
    if total == 0 {
        return None;
    }
    let denominator = count_as_f64(total);
    Some(
        bins.into_iter()
            .map(|count| count_as_f64(count) / denominator)
            .collect(),
    )
}

#[expect(
    clippy::float_arithmetic,
    reason = "item means divide integer rating sums by counts"
)]
fn mean_of(sum: u64, count: usize) -> f64 {
    sum_as_f64(sum) / count_as_f64(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shillscope_core::test_support::{table_from, worked_example_table};

    #[rstest]
    fn worked_example_item_stats() {
        let stats = compute_item_stats(&worked_example_table());
        assert_eq!(stats.len(), 3);
        assert_eq!(stats.get(10), Some(&ItemStats { mean: 3.0, count: 2 }));
        assert_eq!(stats.get(11), Some(&ItemStats { mean: 3.0, count: 1 }));
        assert_eq!(stats.get(12), Some(&ItemStats { mean: 4.0, count: 1 }));
        assert!(stats.get(13).is_none());
    }

    #[rstest]
    fn repeated_ratings_all_count_towards_item_stats() {
        let stats = compute_item_stats(&table_from(&[(1, 10, 2), (1, 10, 4)]));
        assert_eq!(stats.get(10), Some(&ItemStats { mean: 3.0, count: 2 }));
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn worked_example_distribution() {
        let distribution = compute_rating_distribution(&worked_example_table(), RatingScale::default())
            .expect("non-empty table has a distribution");
        assert_eq!(distribution.shares(), &[0.25, 0.0, 0.25, 0.25, 0.25]);
        assert!((distribution.total() - 1.0).abs() < 1e-9);
    }

    #[rstest]
    fn empty_table_has_no_distribution() {
        let table = RatingTable::default();
        assert!(compute_rating_distribution(&table, RatingScale::default()).is_none());
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "tests compare floating point values"
    )]
    fn out_of_scale_ratings_shrink_the_mass() {
        let table = table_from(&[(1, 10, 5), (1, 11, 9)]);
        let distribution = compute_rating_distribution(&table, RatingScale::default())
            .expect("non-empty table has a distribution");
        assert!((distribution.total() - 0.5).abs() < 1e-12);
    }

    #[rstest]
    fn overall_mean_averages_item_means() {
        let stats = compute_item_stats(&worked_example_table());
        assert_eq!(overall_item_mean(&stats), Some(10.0 / 3.0));
        assert_eq!(overall_item_mean(&ItemStatsIndex::default()), None);
    }
}
