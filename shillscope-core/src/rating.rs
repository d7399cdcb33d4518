//! Rating events and the immutable table that owns them.
//!
//! A [`RatingTable`] is the input boundary of the feature pipeline. It keeps
//! events in the order they were supplied and never mutates them. Validation
//! against a [`RatingScale`] is opt-in: [`RatingTable::new`] trusts its input,
//! while [`RatingTable::validated`] rejects ratings outside the scale.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound of the ordinal rating scale.
pub const DEFAULT_RATING_MAX: u8 = 5;

/// A single `(user, item, rating)` observation.
///
/// # Examples
/// ```
/// use shillscope_core::RatingEvent;
///
/// let event = RatingEvent::new(1, 10, 5);
/// assert_eq!(event.item_id, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RatingEvent {
    /// Identifier of the rater.
    pub user_id: u64,
    /// Identifier of the rated item.
    pub item_id: u64,
    /// Ordinal rating value.
    pub rating: u8,
}

impl RatingEvent {
    /// Construct an event.
    #[must_use]
    pub const fn new(user_id: u64, item_id: u64, rating: u8) -> Self {
        Self {
            user_id,
            item_id,
            rating,
        }
    }
}

impl From<(u64, u64, u8)> for RatingEvent {
    fn from((user_id, item_id, rating): (u64, u64, u8)) -> Self {
        Self::new(user_id, item_id, rating)
    }
}

/// The ordinal scale `1..=max` that ratings are drawn from.
///
/// # Examples
/// ```
/// use shillscope_core::RatingScale;
///
/// let scale = RatingScale::default();
/// assert_eq!(scale.len(), 5);
/// assert_eq!(scale.bin(1), Some(0));
/// assert_eq!(scale.bin(6), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct RatingScale {
    max: u8,
}

/// Errors returned by [`RatingScale::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RatingScaleError {
    /// The scale has no values.
    #[error("rating scale must contain at least one value")]
    Empty,
}

impl RatingScale {
    /// Build the scale `1..=max`.
    ///
    /// # Errors
    /// Returns [`RatingScaleError::Empty`] when `max` is zero.
    pub const fn new(max: u8) -> Result<Self, RatingScaleError> {
        if max == 0 {
            return Err(RatingScaleError::Empty);
        }
        Ok(Self { max })
    }

    /// Highest rating on the scale.
    #[must_use]
    pub const fn max(self) -> u8 {
        self.max
    }

    /// Number of distinct rating values.
    #[must_use]
    pub fn len(self) -> usize {
        usize::from(self.max)
    }

    /// Always `false`; a constructed scale holds at least one value.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Report whether `rating` lies on the scale.
    #[must_use]
    pub const fn contains(self, rating: u8) -> bool {
        rating >= 1 && rating <= self.max
    }

    /// Histogram bin for `rating`, or `None` when it is off the scale.
    #[must_use]
    pub fn bin(self, rating: u8) -> Option<usize> {
        self.contains(rating)
            .then(|| usize::from(rating.saturating_sub(1)))
    }

    /// Iterate the scale's values in ascending order.
    pub fn values(self) -> impl Iterator<Item = u8> {
        1..=self.max
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            max: DEFAULT_RATING_MAX,
        }
    }
}

impl TryFrom<u8> for RatingScale {
    type Error = RatingScaleError;

    fn try_from(max: u8) -> Result<Self, Self::Error> {
        Self::new(max)
    }
}

impl From<RatingScale> for u8 {
    fn from(scale: RatingScale) -> Self {
        scale.max
    }
}

/// Errors returned by [`RatingTable::validated`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingTableError {
    /// A rating fell outside the declared scale.
    #[error("rating {rating} by user {user_id} for item {item_id} is outside 1..={max}")]
    RatingOutOfScale {
        /// Rater of the offending event.
        user_id: u64,
        /// Item of the offending event.
        item_id: u64,
        /// Offending rating value.
        rating: u8,
        /// Upper bound of the scale.
        max: u8,
    },
}

/// Immutable collection of rating events.
///
/// Out-of-scale ratings accepted through [`RatingTable::new`] are kept as-is
/// and will skew item means, variances and the rating distribution.
///
/// # Examples
/// ```
/// use shillscope_core::{RatingEvent, RatingTable};
///
/// let table: RatingTable = [(1, 10, 5), (2, 10, 1)]
///     .into_iter()
///     .map(RatingEvent::from)
///     .collect();
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RatingTable {
    events: Vec<RatingEvent>,
}

impl RatingTable {
    /// Wrap pre-validated events.
    #[must_use]
    pub const fn new(events: Vec<RatingEvent>) -> Self {
        Self { events }
    }

    /// Wrap events after checking every rating against `scale`.
    ///
    /// # Errors
    /// Returns [`RatingTableError::RatingOutOfScale`] for the first event
    /// whose rating is not on the scale.
    pub fn validated(
        events: Vec<RatingEvent>,
        scale: RatingScale,
    ) -> Result<Self, RatingTableError> {
        if let Some(bad) = events.iter().find(|event| !scale.contains(event.rating)) {
            return Err(RatingTableError::RatingOutOfScale {
                user_id: bad.user_id,
                item_id: bad.item_id,
                rating: bad.rating,
                max: scale.max(),
            });
        }
        Ok(Self { events })
    }

    /// Events in input order.
    #[must_use]
    pub fn events(&self) -> &[RatingEvent] {
        &self.events
    }

    /// Iterate events in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, RatingEvent> {
        self.events.iter()
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Report whether the table holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Count events whose rating is not on `scale`.
    #[must_use]
    pub fn out_of_scale_count(&self, scale: RatingScale) -> usize {
        self.events
            .iter()
            .filter(|event| !scale.contains(event.rating))
            .count()
    }
}

impl FromIterator<RatingEvent> for RatingTable {
    fn from_iter<I: IntoIterator<Item = RatingEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RatingTable {
    type Item = &'a RatingEvent;
    type IntoIter = std::slice::Iter<'a, RatingEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
