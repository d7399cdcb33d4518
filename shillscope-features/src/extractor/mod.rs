//! Per-user descriptors measured against the crowd baselines.
//!
//! Every descriptor resolves on its own. Those with unmet preconditions
//! return `None` instead of failing, and only the damped distribution
//! similarity reads another descriptor.

use log::trace;
use shillscope_core::{
    AuthenticityLabel, ItemStatsIndex, RatingDistribution, RatingScale, UserFeatureVector,
    UserProfile,
};

use crate::corpus::UserWeights;
use crate::numeric::count_as_f64;
use crate::stats::{overall_item_mean, rating_shares};

/// Computes the descriptors of one profile against shared baselines.
///
/// The extractor only borrows its inputs, so one instance can serve every
/// user, from any number of threads.
///
/// # Examples
/// ```
/// use shillscope_core::RatingScale;
/// use shillscope_core::test_support::worked_example_table;
/// use shillscope_features::{
///     FeatureExtractor, all_items, build_profiles, compute_item_stats,
///     compute_rating_distribution, compute_user_weights,
/// };
///
/// let table = worked_example_table();
/// let scale = RatingScale::default();
/// let stats = compute_item_stats(&table);
/// let distribution = compute_rating_distribution(&table, scale);
/// let items = all_items(&table);
/// let profiles = build_profiles(&table);
/// let weights = compute_user_weights(&profiles, &items);
/// let extractor = FeatureExtractor::new(&stats, distribution.as_ref(), &items, &weights, scale);
///
/// let user = profiles.get(1).expect("user 1 rated items");
/// assert_eq!(extractor.rdam(user), Some(1.0));
/// assert_eq!(extractor.len_var(user), 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor<'a> {
    item_stats: &'a ItemStatsIndex,
    distribution: Option<&'a RatingDistribution>,
    items: &'a [u64],
    weights: &'a UserWeights,
    scale: RatingScale,
    overall_item_mean: Option<f64>,
}

impl<'a> FeatureExtractor<'a> {
    /// Borrow the baselines needed for extraction.
    ///
    /// `items` is the canonical catalogue order used by the cosine
    /// similarity. A missing `distribution` leaves the distribution
    /// descriptors undefined.
    #[must_use]
    pub fn new(
        item_stats: &'a ItemStatsIndex,
        distribution: Option<&'a RatingDistribution>,
        items: &'a [u64],
        weights: &'a UserWeights,
        scale: RatingScale,
    ) -> Self {
        Self {
            item_stats,
            distribution,
            items,
            weights,
            scale,
            overall_item_mean: overall_item_mean(item_stats),
        }
    }

    /// Assemble every descriptor for `profile` and attach `authenticity`.
    #[must_use]
    pub fn extract(
        &self,
        profile: &UserProfile,
        authenticity: AuthenticityLabel,
    ) -> UserFeatureVector {
        let len_var = self.len_var(profile);
        let rdma_similarity = self.rdma_similarity(profile);
        let row = UserFeatureVector {
            user_id: profile.user_id(),
            rdam: self.rdam(profile),
            wda: self.wda(profile),
            cosine_similarity: self.cosine_similarity(profile),
            len_var,
            tfidf: self.tfidf(profile),
            rdma_similarity,
            rdma_len_var: Self::rdma_len_var(rdma_similarity, len_var),
            degree_of_similarity: self.degree_of_similarity(profile),
            authenticity,
        };
        if row.rdam.is_none() || row.cosine_similarity.is_none() || row.rdma_similarity.is_none() {
            trace!(
                "user {} has undefined descriptors (rated {} items)",
                row.user_id,
                profile.len()
            );
        }
        row
    }

    /// Mean absolute deviation of the user's ratings from the item means.
    ///
    /// Only items with statistics contribute; `None` when there are none.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "deviation averages require floating-point maths"
    )]
    pub fn rdam(&self, profile: &UserProfile) -> Option<f64> {
        let (total, contributing) = self
            .deviations(profile)
            .fold((0.0_f64, 0_usize), |(sum, n), (deviation, _)| {
                (sum + deviation, n + 1)
            });
        (contributing > 0).then(|| total / count_as_f64(contributing))
    }

    /// Deviation from the item means weighted by each item's rating count.
    ///
    /// `None` when no rated item has statistics.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "weighted deviation requires floating-point maths"
    )]
    pub fn wda(&self, profile: &UserProfile) -> Option<f64> {
        let (weighted, weight) = self
            .deviations(profile)
            .fold((0.0_f64, 0_usize), |(sum, total), (deviation, count)| {
                (sum + deviation * count_as_f64(count), total + count)
            });
        (weight > 0).then(|| weighted / count_as_f64(weight))
    }

    /// Cosine similarity between the user's ratings and the item means.
    ///
    /// Both vectors span the whole catalogue; unrated items and items without
    /// statistics contribute zero. `None` when either vector has zero norm.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "cosine similarity needs dot products and norms"
    )]
    pub fn cosine_similarity(&self, profile: &UserProfile) -> Option<f64> {
        let mut dot = 0.0_f64;
        let mut user_norm = 0.0_f64;
        let mut crowd_norm = 0.0_f64;
        for &item_id in self.items {
            let user = profile.rating(item_id).map_or(0.0, f64::from);
            let crowd = self.item_stats.get(item_id).map_or(0.0, |stats| stats.mean);
            dot += user * crowd;
            user_norm += user * user;
            crowd_norm += crowd * crowd;
        }
        if user_norm == 0.0 || crowd_norm == 0.0 {
            return None;
        }
        Some(dot / (user_norm.sqrt() * crowd_norm.sqrt()))
    }

    /// Population variance of the user's ratings.
    ///
    /// Zero for profiles with fewer than two ratings.
    #[must_use]
    #[expect(
        clippy::unused_self,
        reason = "kept as a method so every descriptor reads the same way"
    )]
    pub fn len_var(&self, profile: &UserProfile) -> f64 {
        rating_variance(profile)
    }

    /// The user's corpus weight; `0.0` when the user is not in the corpus.
    #[must_use]
    pub fn tfidf(&self, profile: &UserProfile) -> f64 {
        self.weights.get(profile.user_id()).unwrap_or(0.0)
    }

    /// One minus the mean absolute gap between the user's rating histogram
    /// and the global distribution.
    ///
    /// `None` for an empty profile or when there is no global distribution.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "histogram comparison requires floating-point maths"
    )]
    pub fn rdma_similarity(&self, profile: &UserProfile) -> Option<f64> {
        let distribution = self.distribution?;
        let shares = rating_shares(profile.values(), self.scale)?;
        let gap: f64 = shares
            .iter()
            .enumerate()
            .map(|(bin, share)| (share - distribution.share(bin).unwrap_or(0.0)).abs())
            .sum();
        Some(1.0 - gap / count_as_f64(self.scale.len()))
    }

    /// Distribution similarity divided by `1 + len_var`.
    ///
    /// Undefined exactly when `rdma_similarity` is undefined.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "damping divides by one plus the variance"
    )]
    pub fn rdma_len_var(rdma_similarity: Option<f64>, len_var: f64) -> Option<f64> {
        rdma_similarity.map(|similarity| similarity / (1.0 + len_var))
    }

    /// Pearson correlation between "rated above the item mean" and "item is
    /// above the overall average" across the user's items.
    ///
    /// Items without statistics use the overall average as their mean. Falls
    /// back to `0.0` with fewer than two items, when either indicator is
    /// constant, or when no item has statistics.
    #[must_use]
    pub fn degree_of_similarity(&self, profile: &UserProfile) -> f64 {
        let Some(overall) = self.overall_item_mean else {
            return 0.0;
        };
        if profile.len() < 2 {
            return 0.0;
        }
        let (above_mean, popular): (Vec<f64>, Vec<f64>) = profile
            .ratings()
            .map(|(item_id, rating)| {
                let mean = self.item_stats.get(item_id).map_or(overall, |stats| stats.mean);
                (indicator(f64::from(rating) > mean), indicator(mean > overall))
            })
            .unzip();
        pearson_correlation(&above_mean, &popular).unwrap_or(0.0)
    }

    /// `(|rating - mean|, count)` for each rated item with statistics.
    #[expect(
        clippy::float_arithmetic,
        reason = "deviation is the absolute difference from the item mean"
    )]
    fn deviations<'p>(
        &'p self,
        profile: &'p UserProfile,
    ) -> impl Iterator<Item = (f64, usize)> + 'p {
        profile.ratings().filter_map(|(item_id, rating)| {
            self.item_stats
                .get(item_id)
                .map(|stats| ((f64::from(rating) - stats.mean).abs(), stats.count))
        })
    }
}

/// Population variance of a profile's ratings; zero below two ratings.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "variance requires floating-point maths"
)]
pub fn rating_variance(profile: &UserProfile) -> f64 {
    if profile.len() < 2 {
        return 0.0;
    }
    let n = count_as_f64(profile.len());
    let mean = profile.values().map(f64::from).sum::<f64>() / n;
    let squares: f64 = profile
        .values()
        .map(|rating| {
            let delta = f64::from(rating) - mean;
            delta * delta
        })
        .sum();
    squares / n
}

const fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

/// Pearson correlation of two equally long samples.
///
/// `None` when either sample has zero variance or the samples are empty.
#[expect(
    clippy::float_arithmetic,
    reason = "correlation requires floating-point maths"
)]
fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }
    let n = count_as_f64(xs.len());
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let (covariance, var_x, var_y) = xs.iter().zip(ys).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(cov, vx, vy), (x, y)| {
            let dx = x - mean_x;
            let dy = y - mean_y;
            (cov + dx * dy, vx + dx * dx, vy + dy * dy)
        },
    );
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(covariance / (var_x * var_y).sqrt())
}
