//! Grouping of rating events into per-user profiles.

use std::collections::{BTreeMap, BTreeSet};

use shillscope_core::{RatingTable, UserProfile, UserProfiles};

/// Group `table` by user into item → rating maps.
///
/// Events are applied in table order, so when a user rated the same item
/// more than once the last rating wins.
///
/// # Examples
/// ```
/// use shillscope_core::{RatingEvent, RatingTable};
/// use shillscope_features::build_profiles;
///
/// let table: RatingTable = [(1, 10, 2), (1, 10, 4), (2, 11, 3)]
///     .into_iter()
///     .map(RatingEvent::from)
///     .collect();
/// let profiles = build_profiles(&table);
/// assert_eq!(profiles.get(1).and_then(|p| p.rating(10)), Some(4));
/// assert_eq!(profiles.len(), 2);
/// ```
#[must_use]
pub fn build_profiles(table: &RatingTable) -> UserProfiles {
    let mut grouped: BTreeMap<u64, BTreeMap<u64, u8>> = BTreeMap::new();
    for event in table {
        grouped
            .entry(event.user_id)
            .or_default()
            .insert(event.item_id, event.rating);
    }
    UserProfiles::new(
        grouped
            .into_iter()
            .map(|(user_id, ratings)| (user_id, UserProfile::from_ratings(user_id, ratings)))
            .collect(),
    )
}

/// Distinct item identifiers of `table` in ascending order.
///
/// This is the canonical column order for matrix-based features.
#[must_use]
pub fn all_items(table: &RatingTable) -> Vec<u64> {
    table
        .iter()
        .map(|event| event.item_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shillscope_core::test_support::{table_from, worked_example_table};

    #[rstest]
    fn profiles_follow_the_table() {
        let profiles = build_profiles(&worked_example_table());
        let first = profiles.get(1).expect("user 1 has a profile");
        assert_eq!(first.ratings().collect::<Vec<_>>(), vec![(10, 5), (11, 3)]);
        let second = profiles.get(2).expect("user 2 has a profile");
        assert_eq!(second.ratings().collect::<Vec<_>>(), vec![(10, 1), (12, 4)]);
    }

    #[rstest]
    fn last_rating_wins_for_repeated_pairs() {
        let profiles = build_profiles(&table_from(&[(3, 7, 5), (3, 8, 1), (3, 7, 2)]));
        let profile = profiles.get(3).expect("user 3 has a profile");
        assert_eq!(profile.rating(7), Some(2));
        assert_eq!(profile.len(), 2);
    }

    #[rstest]
    fn items_are_sorted_and_distinct() {
        let table = table_from(&[(1, 30, 1), (2, 10, 1), (3, 30, 2), (3, 20, 5)]);
        assert_eq!(all_items(&table), vec![10, 20, 30]);
    }

    #[rstest]
    fn empty_table_has_no_profiles_or_items() {
        let table = RatingTable::default();
        assert!(build_profiles(&table).is_empty());
        assert!(all_items(&table).is_empty());
    }
}
