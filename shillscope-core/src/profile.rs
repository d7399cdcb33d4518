//! Per-user rating profiles: the items a user rated and the rating given.
//!
//! Profiles are assembled once from a rating table and are read-only
//! afterwards. Each item appears at most once per profile.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One user's item → rating map.
///
/// # Examples
/// ```
/// use shillscope_core::UserProfile;
///
/// let profile = UserProfile::new(1).with_rating(10, 5).with_rating(11, 3);
/// assert_eq!(profile.rating(10), Some(5));
/// assert_eq!(profile.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserProfile {
    user_id: u64,
    ratings: BTreeMap<u64, u8>,
}

impl UserProfile {
    /// Construct an empty profile.
    #[must_use]
    pub const fn new(user_id: u64) -> Self {
        Self {
            user_id,
            ratings: BTreeMap::new(),
        }
    }

    /// Construct a profile from a complete item → rating map.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "profiles are produced at runtime from rating tables"
    )]
    #[must_use]
    pub fn from_ratings(user_id: u64, ratings: BTreeMap<u64, u8>) -> Self {
        Self { user_id, ratings }
    }

    /// Add or replace a rating while returning `self` for chaining.
    ///
    /// A later rating for the same item replaces the earlier one.
    #[must_use]
    pub fn with_rating(mut self, item_id: u64, rating: u8) -> Self {
        self.ratings.insert(item_id, rating);
        self
    }

    /// Identifier of the profile's owner.
    #[must_use]
    pub const fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Rating given to `item_id`, if any.
    #[must_use]
    pub fn rating(&self, item_id: u64) -> Option<u8> {
        self.ratings.get(&item_id).copied()
    }

    /// Iterate `(item_id, rating)` pairs in ascending item order.
    pub fn ratings(&self) -> impl Iterator<Item = (u64, u8)> + '_ {
        self.ratings.iter().map(|(&item, &rating)| (item, rating))
    }

    /// Iterate rating values in ascending item order.
    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        self.ratings.values().copied()
    }

    /// Number of rated items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Report whether the user rated nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

/// All user profiles keyed by user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserProfiles {
    profiles: BTreeMap<u64, UserProfile>,
}

impl UserProfiles {
    /// Wrap a pre-built map.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "profile maps are produced at runtime from rating tables"
    )]
    #[must_use]
    pub fn new(profiles: BTreeMap<u64, UserProfile>) -> Self {
        Self { profiles }
    }

    /// Profile for `user_id`, if present.
    #[must_use]
    pub fn get(&self, user_id: u64) -> Option<&UserProfile> {
        self.profiles.get(&user_id)
    }

    /// Iterate profiles in ascending user order.
    pub fn iter(&self) -> impl Iterator<Item = &UserProfile> {
        self.profiles.values()
    }

    /// Iterate user identifiers in ascending order.
    pub fn user_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.profiles.keys().copied()
    }

    /// Number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Report whether there are no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FromIterator<UserProfile> for UserProfiles {
    fn from_iter<I: IntoIterator<Item = UserProfile>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|profile| (profile.user_id(), profile))
                .collect(),
        )
    }
}
