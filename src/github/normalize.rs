//! Reshapes raw review comment pages into [`ReviewComment`]s.

use super::models::{RawReviewComment, ReviewComment};

/// Normalizes raw records in order, dropping those without a user.
///
/// Pure and deterministic: the output preserves the input order and never
/// duplicates a record.
#[must_use]
pub fn normalize(records: &[RawReviewComment]) -> Vec<ReviewComment> {
    records.iter().filter_map(ReviewComment::from_raw).collect()
}
