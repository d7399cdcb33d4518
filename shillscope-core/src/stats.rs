//! Crowd baselines derived from a whole rating table.
//!
//! [`ItemStatsIndex`] holds the per-item mean and count; items nobody rated
//! are absent rather than zero-filled. [`RatingDistribution`] is the global
//! share of each rating value.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mean rating and rating count of one item.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemStats {
    /// Arithmetic mean of the item's ratings.
    pub mean: f64,
    /// Number of rating events for the item.
    pub count: usize,
}

/// Item statistics keyed by item identifier.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use shillscope_core::{ItemStats, ItemStatsIndex};
///
/// let index = ItemStatsIndex::new(BTreeMap::from([(10, ItemStats { mean: 3.0, count: 2 })]));
/// assert_eq!(index.get(10).map(|stats| stats.count), Some(2));
/// assert!(index.get(11).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemStatsIndex {
    stats: BTreeMap<u64, ItemStats>,
}

impl ItemStatsIndex {
    /// Wrap a pre-computed map.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "indices are produced at runtime from rating tables"
    )]
    #[must_use]
    pub fn new(stats: BTreeMap<u64, ItemStats>) -> Self {
        Self { stats }
    }

    /// Statistics for `item_id`, if the item was rated.
    #[must_use]
    pub fn get(&self, item_id: u64) -> Option<&ItemStats> {
        self.stats.get(&item_id)
    }

    /// Iterate items in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &ItemStats)> {
        self.stats.iter().map(|(&id, stats)| (id, stats))
    }

    /// Number of items with statistics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Report whether no item has statistics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Consume the wrapper and return the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<u64, ItemStats> {
        self.stats
    }
}

/// Share of all rating events that carry each value of the scale.
///
/// Entry `v - 1` holds the share of rating `v`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RatingDistribution {
    shares: Vec<f64>,
}

impl RatingDistribution {
    /// Wrap pre-computed shares.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "distributions are produced at runtime from rating tables"
    )]
    #[must_use]
    pub fn new(shares: Vec<f64>) -> Self {
        Self { shares }
    }

    /// Shares ordered by rating value.
    #[must_use]
    pub fn shares(&self) -> &[f64] {
        &self.shares
    }

    /// Share of the rating in histogram bin `bin`.
    #[must_use]
    pub fn share(&self, bin: usize) -> Option<f64> {
        self.shares.get(bin).copied()
    }

    /// Number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Report whether the distribution has no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of all shares.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.shares.iter().sum()
    }
}
