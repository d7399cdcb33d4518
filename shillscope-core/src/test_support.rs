//! Rating tables shared by unit, behaviour, and property tests.

use crate::{InauthenticUsers, RatingEvent, RatingTable};

/// Four-event table used throughout the documentation.
///
/// Item 10 has mean 3.0 over two ratings, item 11 mean 3.0 over one and
/// item 12 mean 4.0 over one.
#[must_use]
pub fn worked_example_table() -> RatingTable {
    table_from(&[(1, 10, 5), (1, 11, 3), (2, 10, 1), (2, 12, 4)])
}

/// Build a table from `(user, item, rating)` triples.
#[must_use]
pub fn table_from(triples: &[(u64, u64, u8)]) -> RatingTable {
    triples.iter().copied().map(RatingEvent::from).collect()
}

/// A small crowd of genuine raters plus two push-attack profiles.
///
/// Users 1 to 6 rate items 100 to 105 around each item's consensus. Users
/// 900 and 901 give maximum ratings to the target item 105 and filler
/// ratings elsewhere.
#[must_use]
pub fn push_attack_table() -> RatingTable {
    let mut triples = vec![
        (1, 100, 4),
        (1, 101, 3),
        (1, 102, 2),
        (1, 105, 1),
        (2, 100, 5),
        (2, 101, 3),
        (2, 103, 4),
        (2, 105, 2),
        (3, 100, 4),
        (3, 102, 1),
        (3, 104, 3),
        (4, 101, 2),
        (4, 103, 4),
        (4, 104, 3),
        (4, 105, 1),
        (5, 100, 5),
        (5, 102, 2),
        (5, 103, 5),
        (6, 101, 3),
        (6, 104, 4),
        (6, 105, 2),
    ];
    for attacker in [900, 901] {
        triples.extend([
            (attacker, 100, 1),
            (attacker, 101, 5),
            (attacker, 102, 5),
            (attacker, 103, 1),
            (attacker, 104, 5),
            (attacker, 105, 5),
        ]);
    }
    table_from(&triples)
}

/// Label source marking the attackers of [`push_attack_table`].
#[must_use]
pub fn push_attackers() -> InauthenticUsers {
    [900, 901].into_iter().collect()
}
