//! Candidate results
//!
//! Indexes are correctness-neutral:
//! - `Exact` candidates are precisely the matching entities
//! - `Superset` candidates may hold false positives, never false negatives
//! - `Unsupported` means the caller must scan

use std::collections::BTreeSet;

use serde::Serialize;

use super::entity::EntityId;

/// Set of entity IDs, ordered for deterministic output
pub type IdSet = BTreeSet<EntityId>;

/// Whether a candidate set is precise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exactness {
    /// Exactly the matching entities
    Exact,
    /// All matches plus possibly non-matches; caller re-checks
    Superset,
}

impl Exactness {
    /// Combine two exactness flags; any superset poisons the result.
    pub fn and(self, other: Exactness) -> Exactness {
        match (self, other) {
            (Exactness::Exact, Exactness::Exact) => Exactness::Exact,
            _ => Exactness::Superset,
        }
    }
}

/// Outcome of evaluating a field predicate or a whole `Where`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateResult {
    /// The index cannot decide; fall back to a full scan
    Unsupported,
    /// No entity matches
    Empty,
    /// Non-empty candidate set
    Candidates { ids: IdSet, exactness: Exactness },
}

impl CandidateResult {
    /// Build a result from a set, normalising an empty set to `Empty`.
    pub fn from_set(ids: IdSet, exactness: Exactness) -> Self {
        if ids.is_empty() {
            CandidateResult::Empty
        } else {
            CandidateResult::Candidates { ids, exactness }
        }
    }

    /// Exact result from a set
    pub fn exact(ids: IdSet) -> Self {
        Self::from_set(ids, Exactness::Exact)
    }

    /// Superset result from a set
    pub fn superset(ids: IdSet) -> Self {
        Self::from_set(ids, Exactness::Superset)
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, CandidateResult::Unsupported)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CandidateResult::Empty)
    }

    /// Candidate IDs, if any
    pub fn ids(&self) -> Option<&IdSet> {
        match self {
            CandidateResult::Candidates { ids, .. } => Some(ids),
            _ => None,
        }
    }

    /// Exactness of a candidate set, if any
    pub fn exactness(&self) -> Option<Exactness> {
        match self {
            CandidateResult::Candidates { exactness, .. } => Some(*exactness),
            _ => None,
        }
    }

    /// Summary of the result without the IDs
    pub fn shape(&self) -> ResultShape {
        match self {
            CandidateResult::Unsupported => ResultShape::Unsupported,
            CandidateResult::Empty => ResultShape::Empty,
            CandidateResult::Candidates { ids, exactness } => ResultShape::Candidates {
                count: ids.len(),
                exactness: *exactness,
            },
        }
    }
}

/// ID-free summary of a `CandidateResult`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResultShape {
    Unsupported,
    Empty,
    Candidates { count: usize, exactness: Exactness },
}

/// Intersect sets smallest-first.
///
/// Stops as soon as an intermediate intersection is empty. An empty input
/// yields an empty set.
pub fn intersect_all(mut sets: Vec<IdSet>) -> IdSet {
    if sets.is_empty() {
        return IdSet::new();
    }
    sets.sort_by_key(|s| s.len());

    let mut iter = sets.into_iter();
    let mut acc = iter.next().unwrap_or_default();
    for set in iter {
        if acc.is_empty() {
            break;
        }
        acc.retain(|id| set.contains(id));
    }
    acc
}

/// Union several postings lists into one set
pub fn union_into<'a, I>(target: &mut IdSet, postings: I)
where
    I: IntoIterator<Item = &'a IdSet>,
{
    for set in postings {
        target.extend(set.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[i64]) -> IdSet {
        ids.iter().map(|i| EntityId::from(*i)).collect()
    }

    #[test]
    fn test_from_set_normalises_empty() {
        assert_eq!(CandidateResult::exact(IdSet::new()), CandidateResult::Empty);
        let result = CandidateResult::superset(set(&[1]));
        assert_eq!(result.exactness(), Some(Exactness::Superset));
    }

    #[test]
    fn test_exactness_poisoning() {
        assert_eq!(Exactness::Exact.and(Exactness::Exact), Exactness::Exact);
        assert_eq!(Exactness::Exact.and(Exactness::Superset), Exactness::Superset);
        assert_eq!(Exactness::Superset.and(Exactness::Exact), Exactness::Superset);
    }

    #[test]
    fn test_intersect_all() {
        let result = intersect_all(vec![set(&[1, 2, 3, 4]), set(&[2, 4]), set(&[4, 2, 9])]);
        assert_eq!(result, set(&[2, 4]));
    }

    #[test]
    fn test_intersect_all_disjoint() {
        let result = intersect_all(vec![set(&[1]), set(&[2]), set(&[1, 2])]);
        assert!(result.is_empty());
        assert!(intersect_all(Vec::new()).is_empty());
    }

    #[test]
    fn test_shape_serialization() {
        let shape = CandidateResult::exact(set(&[1, 2])).shape();
        let json = serde_json::to_value(shape).unwrap();
        assert_eq!(json["status"], "candidates");
        assert_eq!(json["count"], 2);
        assert_eq!(json["exactness"], "exact");
    }
}
