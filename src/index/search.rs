//! Binary search helpers over sorted slices

use std::ops::Range;

/// First position whose key is `>= target`
pub fn lower_bound<T, K, F>(items: &[T], target: &K, key: F) -> usize
where
    K: PartialOrd,
    F: Fn(&T) -> &K,
{
    items.partition_point(|item| key(item) < target)
}

/// First position whose key is `> target`
pub fn upper_bound<T, K, F>(items: &[T], target: &K, key: F) -> usize
where
    K: PartialOrd,
    F: Fn(&T) -> &K,
{
    items.partition_point(|item| key(item) <= target)
}

/// Range of positions in a sorted string list that start with `prefix`.
///
/// All strings sharing a prefix are contiguous in sorted order, so the range
/// starts at the lower bound of the prefix and ends at the first string that
/// no longer starts with it.
pub fn prefix_range<S: AsRef<str>>(sorted: &[S], prefix: &str) -> Range<usize> {
    let start = sorted.partition_point(|s| s.as_ref() < prefix);
    let len = sorted[start..].partition_point(|s| s.as_ref().starts_with(prefix));
    start..start + len
}
