//! Labelled per-user feature rows and the table that collects them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::AuthenticityLabel;

/// Column names of a feature table, in output order.
pub const FEATURE_COLUMNS: [&str; 10] = [
    "user_id",
    "RDAM",
    "WDA",
    "cosine_similarity",
    "LenVar",
    "TFIDF",
    "RDMA_similarity",
    "RDMA_LenVar",
    "degree_of_similarity",
    "authenticity",
];

/// The eight descriptors of one user plus the supplied label.
///
/// Descriptors whose preconditions can fail are `Option<f64>`; `None` marks
/// an undefined value. `len_var`, `tfidf` and `degree_of_similarity` always
/// resolve to a number.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserFeatureVector {
    /// Identifier of the described user.
    pub user_id: u64,
    /// Mean absolute deviation from item means.
    #[cfg_attr(feature = "serde", serde(rename = "RDAM"))]
    pub rdam: Option<f64>,
    /// Deviation from item means weighted by item popularity.
    #[cfg_attr(feature = "serde", serde(rename = "WDA"))]
    pub wda: Option<f64>,
    /// Cosine similarity between the user's ratings and item means.
    pub cosine_similarity: Option<f64>,
    /// Population variance of the user's ratings.
    #[cfg_attr(feature = "serde", serde(rename = "LenVar"))]
    pub len_var: f64,
    /// Mean TF-IDF weight of the user's incidence row.
    #[cfg_attr(feature = "serde", serde(rename = "TFIDF"))]
    pub tfidf: f64,
    /// One minus the mean absolute gap to the global rating distribution.
    #[cfg_attr(feature = "serde", serde(rename = "RDMA_similarity"))]
    pub rdma_similarity: Option<f64>,
    /// Distribution similarity damped by rating variance.
    #[cfg_attr(feature = "serde", serde(rename = "RDMA_LenVar"))]
    pub rdma_len_var: Option<f64>,
    /// Correlation between above-mean ratings and above-average items.
    pub degree_of_similarity: f64,
    /// Externally supplied ground truth.
    pub authenticity: AuthenticityLabel,
}

/// Number of undefined values per optional descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UndefinedCounts {
    /// Rows without an RDAM value.
    pub rdam: usize,
    /// Rows without a WDA value.
    pub wda: usize,
    /// Rows without a cosine similarity.
    pub cosine_similarity: usize,
    /// Rows without a distribution similarity.
    pub rdma_similarity: usize,
    /// Rows without a damped distribution similarity.
    pub rdma_len_var: usize,
}

impl UndefinedCounts {
    fn record(&mut self, row: &UserFeatureVector) {
        self.rdam += usize::from(row.rdam.is_none());
        self.wda += usize::from(row.wda.is_none());
        self.cosine_similarity += usize::from(row.cosine_similarity.is_none());
        self.rdma_similarity += usize::from(row.rdma_similarity.is_none());
        self.rdma_len_var += usize::from(row.rdma_len_var.is_none());
    }

    /// Total undefined values across all descriptors.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.rdam + self.wda + self.cosine_similarity + self.rdma_similarity + self.rdma_len_var
    }
}

/// Feature rows ordered by ascending user identifier.
///
/// # Examples
/// ```
/// use shillscope_core::{AuthenticityLabel, FeatureTable, UserFeatureVector};
///
/// let row = |user_id| UserFeatureVector {
///     user_id,
///     rdam: None,
///     wda: None,
///     cosine_similarity: None,
///     len_var: 0.0,
///     tfidf: 0.0,
///     rdma_similarity: None,
///     rdma_len_var: None,
///     degree_of_similarity: 0.0,
///     authenticity: AuthenticityLabel::Authentic,
/// };
/// let table = FeatureTable::new(vec![row(3), row(1)]);
/// assert_eq!(table.user_ids().collect::<Vec<_>>(), vec![1, 3]);
/// assert!(table.get(3).is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FeatureTable {
    rows: Vec<UserFeatureVector>,
}

impl FeatureTable {
    /// Build a table, ordering rows by user identifier.
    #[must_use]
    pub fn new(mut rows: Vec<UserFeatureVector>) -> Self {
        rows.sort_by_key(|row| row.user_id);
        Self { rows }
    }

    /// Rows in ascending user order.
    #[must_use]
    pub fn rows(&self) -> &[UserFeatureVector] {
        &self.rows
    }

    /// Row for `user_id`, if present.
    #[must_use]
    pub fn get(&self, user_id: u64) -> Option<&UserFeatureVector> {
        self.rows
            .binary_search_by_key(&user_id, |row| row.user_id)
            .ok()
            .and_then(|index| self.rows.get(index))
    }

    /// Iterate user identifiers in row order.
    pub fn user_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.rows.iter().map(|row| row.user_id)
    }

    /// Count undefined values per descriptor.
    #[must_use]
    pub fn undefined_counts(&self) -> UndefinedCounts {
        let mut counts = UndefinedCounts::default();
        for row in &self.rows {
            counts.record(row);
        }
        counts
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume the table and return its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<UserFeatureVector> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a FeatureTable {
    type Item = &'a UserFeatureVector;
    type IntoIter = std::slice::Iter<'a, UserFeatureVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
