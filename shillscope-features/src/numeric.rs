//! Conversions from counts and integer sums into `f64`.
//!
//! Counts in this crate are bounded by the size of an in-memory rating
//! table, far below the 2^53 limit of exact `f64` integers.

#[expect(
    clippy::cast_precision_loss,
    reason = "counts stay well below 2^53 for in-memory tables"
)]
pub(crate) const fn count_as_f64(count: usize) -> f64 {
    count as f64
}

#[expect(
    clippy::cast_precision_loss,
    reason = "rating sums stay well below 2^53 for in-memory tables"
)]
pub(crate) const fn sum_as_f64(sum: u64) -> f64 {
    sum as f64
}
