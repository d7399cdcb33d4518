//! Orchestration of a full extraction run.
//!
//! Baselines are computed once per run and shared read-only with the
//! per-user stage. Rows come out in ascending user order whichever
//! scheduling mode is used.

use log::{debug, warn};
use shillscope_core::{
    FeatureTable, ItemStatsIndex, LabelSource, RatingDistribution, RatingScale, RatingTable,
    UserFeatureVector, UserProfiles,
};

use crate::corpus::{UserWeights, compute_user_weights};
use crate::error::ExtractionError;
use crate::extractor::FeatureExtractor;
use crate::profiles::{all_items, build_profiles};
use crate::stats::{compute_item_stats, compute_rating_distribution};
use crate::types::{ExtractionOptions, Parallelism};

/// Every snapshot the per-user stage reads.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineBaselines {
    scale: RatingScale,
    item_stats: ItemStatsIndex,
    distribution: Option<RatingDistribution>,
    items: Vec<u64>,
    profiles: UserProfiles,
    weights: UserWeights,
}

impl PipelineBaselines {
    /// Compute item statistics, the rating distribution, profiles, the item
    /// catalogue and corpus weights for `table`.
    #[must_use]
    pub fn compute(table: &RatingTable, scale: RatingScale) -> Self {
        if table.is_empty() {
            warn!("rating table is empty; the feature table will have no rows");
        }
        let out_of_scale = table.out_of_scale_count(scale);
        if out_of_scale > 0 {
            warn!(
                "{out_of_scale} ratings fall outside 1..={}; item means and distributions will be skewed",
                scale.max()
            );
        }

        let item_stats = compute_item_stats(table);
        let distribution = compute_rating_distribution(table, scale);
        let items = all_items(table);
        let profiles = build_profiles(table);
        let weights = compute_user_weights(&profiles, &items);
        debug!(
            "computed baselines from {} ratings: {} users, {} items",
            table.len(),
            profiles.len(),
            items.len()
        );

        Self {
            scale,
            item_stats,
            distribution,
            items,
            profiles,
            weights,
        }
    }

    /// Borrow an extractor over these baselines.
    #[must_use]
    pub fn extractor(&self) -> FeatureExtractor<'_> {
        FeatureExtractor::new(
            &self.item_stats,
            self.distribution.as_ref(),
            &self.items,
            &self.weights,
            self.scale,
        )
    }

    /// Rating scale the baselines were computed for.
    #[must_use]
    pub const fn scale(&self) -> RatingScale {
        self.scale
    }

    /// Per-item statistics.
    #[must_use]
    pub const fn item_stats(&self) -> &ItemStatsIndex {
        &self.item_stats
    }

    /// Global rating distribution; `None` for an empty table.
    #[must_use]
    pub const fn distribution(&self) -> Option<&RatingDistribution> {
        self.distribution.as_ref()
    }

    /// Canonical item order.
    #[must_use]
    pub fn items(&self) -> &[u64] {
        &self.items
    }

    /// Per-user profiles.
    #[must_use]
    pub const fn profiles(&self) -> &UserProfiles {
        &self.profiles
    }

    /// Per-user corpus weights.
    #[must_use]
    pub const fn weights(&self) -> &UserWeights {
        &self.weights
    }
}

/// Runs extraction with a fixed set of options.
///
/// # Examples
/// ```
/// use shillscope_core::test_support::{push_attack_table, push_attackers};
/// use shillscope_features::{ExtractionOptions, FeatureExtractionPipeline};
///
/// # fn main() -> Result<(), shillscope_features::ExtractionError> {
/// let pipeline = FeatureExtractionPipeline::new(ExtractionOptions::default())?;
/// let table = pipeline.run(&push_attack_table(), &push_attackers());
/// assert_eq!(table.len(), 8);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FeatureExtractionPipeline {
    options: ExtractionOptions,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl FeatureExtractionPipeline {
    /// Validate `options` and prepare any worker pool.
    ///
    /// # Errors
    /// Returns [`ExtractionError::InvalidThreadCount`] for a zero thread
    /// count, [`ExtractionError::ParallelUnavailable`] when threads are
    /// requested without the `parallel` feature, and
    /// `ExtractionError::ThreadPool` when the pool cannot be built.
    pub fn new(options: ExtractionOptions) -> Result<Self, ExtractionError> {
        match options.parallelism {
            Parallelism::Sequential => Ok(Self::sequential(options)),
            Parallelism::Threads(0) => Err(ExtractionError::InvalidThreadCount),
            Parallelism::Threads(threads) => Self::threaded(options, threads),
        }
    }

    /// Options this pipeline was built with.
    #[must_use]
    pub const fn options(&self) -> ExtractionOptions {
        self.options
    }

    /// Extract one labelled row per user of `table`.
    pub fn run<L>(&self, table: &RatingTable, labels: &L) -> FeatureTable
    where
        L: LabelSource + ?Sized,
    {
        let baselines = PipelineBaselines::compute(table, self.options.scale);
        self.run_with_baselines(&baselines, labels)
    }

    /// Extract rows against pre-computed baselines.
    pub fn run_with_baselines<L>(&self, baselines: &PipelineBaselines, labels: &L) -> FeatureTable
    where
        L: LabelSource + ?Sized,
    {
        let rows = self.extract_rows(baselines, labels);
        let table = FeatureTable::new(rows);
        let undefined = table.undefined_counts();
        debug!(
            "extracted {} feature rows with {} undefined values",
            table.len(),
            undefined.total()
        );
        table
    }

    const fn sequential(options: ExtractionOptions) -> Self {
        Self {
            options,
            #[cfg(feature = "parallel")]
            pool: None,
        }
    }

    #[cfg(feature = "parallel")]
    fn threaded(options: ExtractionOptions, threads: usize) -> Result<Self, ExtractionError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("shillscope-extract-{index}"))
            .build()
            .map_err(|source| ExtractionError::ThreadPool { threads, source })?;
        Ok(Self {
            options,
            pool: Some(pool),
        })
    }

    #[cfg(not(feature = "parallel"))]
    const fn threaded(_options: ExtractionOptions, _threads: usize) -> Result<Self, ExtractionError> {
        Err(ExtractionError::ParallelUnavailable)
    }

    #[cfg(feature = "parallel")]
    fn extract_rows<L>(&self, baselines: &PipelineBaselines, labels: &L) -> Vec<UserFeatureVector>
    where
        L: LabelSource + ?Sized,
    {
        use rayon::prelude::*;

        let Some(pool) = self.pool.as_ref() else {
            return extract_sequentially(baselines, labels);
        };
        let extractor = baselines.extractor();
        let profiles: Vec<_> = baselines.profiles().iter().collect();
        // Indexed collection keeps the input order.
        pool.install(|| {
            profiles
                .par_iter()
                .map(|profile| extractor.extract(profile, labels.label(profile.user_id())))
                .collect()
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn extract_rows<L>(&self, baselines: &PipelineBaselines, labels: &L) -> Vec<UserFeatureVector>
    where
        L: LabelSource + ?Sized,
    {
        extract_sequentially(baselines, labels)
    }
}

fn extract_sequentially<L>(baselines: &PipelineBaselines, labels: &L) -> Vec<UserFeatureVector>
where
    L: LabelSource + ?Sized,
{
    let extractor = baselines.extractor();
    baselines
        .profiles()
        .iter()
        .map(|profile| extractor.extract(profile, labels.label(profile.user_id())))
        .collect()
}

/// Extract one labelled feature row per user on the default five-point scale.
///
/// Rows are ordered by ascending user identifier and the run is sequential.
///
/// # Examples
/// ```
/// use shillscope_core::test_support::worked_example_table;
/// use shillscope_core::{AuthenticityLabel, UniformLabel};
/// use shillscope_features::extract_features;
///
/// let table = extract_features(&worked_example_table(), &UniformLabel(AuthenticityLabel::Authentic));
/// let first = table.get(1).expect("user 1 has a row");
/// assert_eq!(first.rdam, Some(1.0));
/// assert_eq!(first.len_var, 1.0);
/// ```
#[must_use]
pub fn extract_features<L>(table: &RatingTable, labels: &L) -> FeatureTable
where
    L: LabelSource + ?Sized,
{
    let baselines = PipelineBaselines::compute(table, RatingScale::default());
    FeatureTable::new(extract_sequentially(&baselines, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shillscope_core::AuthenticityLabel;
    use shillscope_core::test_support::{push_attack_table, push_attackers, worked_example_table};

    #[rstest]
    fn zero_threads_are_rejected() {
        let options = ExtractionOptions::default().with_parallelism(Parallelism::Threads(0));
        let err = FeatureExtractionPipeline::new(options).expect_err("zero threads should fail");
        assert!(matches!(err, ExtractionError::InvalidThreadCount));
    }

    #[rstest]
    fn rows_follow_user_order_and_labels() {
        let table = extract_features(&push_attack_table(), &push_attackers());
        assert_eq!(
            table.user_ids().collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5, 6, 900, 901]
        );
        let attacker = table.get(900).expect("attacker row");
        assert_eq!(attacker.authenticity, AuthenticityLabel::Inauthentic);
        let genuine = table.get(3).expect("genuine row");
        assert_eq!(genuine.authenticity, AuthenticityLabel::Authentic);
    }

    #[rstest]
    fn baselines_are_exposed_for_inspection() {
        let baselines = PipelineBaselines::compute(&worked_example_table(), RatingScale::default());
        assert_eq!(baselines.items(), &[10, 11, 12]);
        assert_eq!(baselines.profiles().len(), 2);
        assert_eq!(baselines.weights().len(), 2);
        assert!(baselines.distribution().is_some());
    }

    #[rstest]
    fn empty_table_yields_empty_feature_table() {
        let table = extract_features(&RatingTable::default(), &push_attackers());
        assert!(table.is_empty());
    }

    #[cfg(feature = "parallel")]
    #[rstest]
    #[case(1)]
    #[case(4)]
    fn threaded_runs_match_sequential_runs(#[case] threads: usize) {
        let ratings = push_attack_table();
        let sequential = extract_features(&ratings, &push_attackers());
        let options = ExtractionOptions::default().with_parallelism(Parallelism::Threads(threads));
        let pipeline = FeatureExtractionPipeline::new(options).expect("build threaded pipeline");
        assert_eq!(pipeline.run(&ratings, &push_attackers()), sequential);
    }
}
