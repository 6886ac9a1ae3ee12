//! Field index contract
//!
//! Every index variant owns its private state and derived caches. Callers
//! pair `remove(old)` with `add(new)` on update; indexes do not track the
//! current value per entity (the text index keeps per-document tokens only
//! because tokenization is not invertible).

use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value;

use super::candidates::{CandidateResult, IdSet};
use super::definition::IndexType;
use super::entity::EntityId;
use super::errors::IndexResult;
use super::number::NumberIndex;
use super::predicate::FieldCondition;

/// Per-field index over one value type.
pub trait FieldIndex: Debug + Send + Sync {
    /// Field this index covers
    fn field(&self) -> &str;

    /// Index variant
    fn index_type(&self) -> IndexType;

    /// Check that `value` can be stored without mutating anything.
    ///
    /// `add` and `remove` succeed for every value that passes.
    fn validate(&self, value: &Value) -> IndexResult<()>;

    fn add(&mut self, id: &EntityId, value: &Value) -> IndexResult<()>;

    fn remove(&mut self, id: &EntityId, value: &Value) -> IndexResult<()>;

    fn clear(&mut self);

    /// Candidate lookup. May rebuild sorted caches.
    fn query(&mut self, condition: &FieldCondition) -> CandidateResult;

    /// Whether `value` satisfies `condition` under this index's semantics.
    ///
    /// An `Exact` answer from `query` is exactly the set of entities for
    /// which this holds; a `Superset` answer contains that set.
    fn matches(&self, condition: &FieldCondition, value: Option<&Value>) -> bool {
        condition.matches(value)
    }

    fn stats(&self) -> IndexStats;

    /// Whether a derived cache awaits rebuild
    fn is_dirty(&self) -> bool;

    /// Tokenizer name for indexes that tokenize
    fn tokenizer_name(&self) -> Option<&str> {
        None
    }

    /// Ordered traversal capability, only number/date indexes have it
    fn as_number_mut(&mut self) -> Option<&mut NumberIndex> {
        None
    }
}

/// Lazily rebuilt sorted cache.
///
/// Any mutation moves the cache to `Dirty`; the first read afterwards
/// rebuilds it and moves it to `Clean`.
#[derive(Debug, Clone)]
pub enum SortedCache<T> {
    Dirty,
    Clean(Vec<T>),
}

impl<T> SortedCache<T> {
    pub fn invalidate(&mut self) {
        *self = SortedCache::Dirty;
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, SortedCache::Dirty)
    }

    /// Current contents, rebuilt first if dirty
    pub fn get_or_rebuild<F>(&mut self, rebuild: F) -> &[T]
    where
        F: FnOnce() -> Vec<T>,
    {
        if self.is_dirty() {
            *self = SortedCache::Clean(rebuild());
        }
        match self {
            SortedCache::Clean(items) => items,
            SortedCache::Dirty => &[],
        }
    }
}

impl<T> Default for SortedCache<T> {
    fn default() -> Self {
        SortedCache::Dirty
    }
}

/// Statistics for observability
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Distinct entities present in the index
    pub total_docs: usize,
    /// Distinct indexed values (tokens for the text index)
    pub distinct_values: usize,
    pub avg_set_size: f64,
    pub max_set_size: usize,
    pub min_set_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_doc_tokens: Option<f64>,
}

impl IndexStats {
    /// Compute stats over value → postings maps
    pub fn from_postings<'a, I>(postings: I) -> Self
    where
        I: IntoIterator<Item = &'a IdSet>,
    {
        let mut docs = IdSet::new();
        let mut stats = IndexStats::default();
        let mut total = 0usize;
        for set in postings {
            stats.distinct_values += 1;
            total += set.len();
            stats.max_set_size = stats.max_set_size.max(set.len());
            stats.min_set_size = if stats.distinct_values == 1 {
                set.len()
            } else {
                stats.min_set_size.min(set.len())
            };
            docs.extend(set.iter().cloned());
        }
        stats.total_docs = docs.len();
        if stats.distinct_values > 0 {
            stats.avg_set_size = total as f64 / stats.distinct_values as f64;
        }
        stats
    }
}

/// Per-field snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSnapshot {
    pub field: String,
    #[serde(rename = "type")]
    pub index_type: IndexType,
    pub dirty: bool,
    /// Tokenizer name, text indexes only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,
    pub stats: IndexStats,
}

/// Insert `id` into the postings for `key`
pub(crate) fn post<K>(map: &mut std::collections::HashMap<K, IdSet>, key: K, id: &EntityId)
where
    K: std::hash::Hash + Eq,
{
    map.entry(key).or_default().insert(id.clone());
}

/// Remove `id` from the postings for `key`, dropping the key when empty
pub(crate) fn unpost<K, Q>(map: &mut std::collections::HashMap<K, IdSet>, key: &Q, id: &EntityId)
where
    K: std::hash::Hash + Eq + std::borrow::Borrow<Q>,
    Q: std::hash::Hash + Eq + ?Sized,
{
    if let Some(ids) = map.get_mut(key) {
        ids.remove(id);
        if ids.is_empty() {
            map.remove(key);
        }
    }
}
