//! Substring index
//!
//! Values are lower-cased and indexed three ways:
//! - value → IDs, with a sorted value list for `startsWith`
//! - reversed value → IDs, with a sorted list for `endsWith`
//! - n-gram → IDs for `contains`
//!
//! N-gram membership does not prove a contiguous match, so `contains`
//! answers are supersets.

use std::collections::HashMap;

use serde_json::Value;

use super::candidates::{intersect_all, union_into, CandidateResult, IdSet};
use super::definition::IndexType;
use super::entity::EntityId;
use super::errors::{IndexError, IndexResult};
use super::field::{post, unpost, FieldIndex, IndexStats, SortedCache};
use super::predicate::FieldCondition;
use super::search::prefix_range;

pub const DEFAULT_NGRAM_SIZE: usize = 3;
pub const MIN_NGRAM_SIZE: usize = 2;
pub const MAX_NGRAM_SIZE: usize = 6;

/// Sliding windows of `n` characters over `s`, deduplicated.
///
/// Strings shorter than `n` have no grams.
pub fn ngrams(s: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    if n == 0 || chars.len() < n {
        return Vec::new();
    }
    let mut grams: Vec<String> = chars.windows(n).map(|w| w.iter().collect()).collect();
    grams.sort();
    grams.dedup();
    grams
}

fn reversed(s: &str) -> String {
    s.chars().rev().collect()
}

#[derive(Debug)]
pub struct SubstringIndex {
    field: String,
    ngram_size: usize,
    values: HashMap<String, IdSet>,
    reversed: HashMap<String, IdSet>,
    grams: HashMap<String, IdSet>,
    sorted_values: SortedCache<String>,
    sorted_reversed: SortedCache<String>,
}

impl SubstringIndex {
    /// `ngram_size` is clamped to [2, 6].
    pub fn new(field: impl Into<String>, ngram_size: usize) -> Self {
        Self {
            field: field.into(),
            ngram_size: ngram_size.clamp(MIN_NGRAM_SIZE, MAX_NGRAM_SIZE),
            values: HashMap::new(),
            reversed: HashMap::new(),
            grams: HashMap::new(),
            sorted_values: SortedCache::Dirty,
            sorted_reversed: SortedCache::Dirty,
        }
    }

    pub fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    fn normalized(&self, value: &Value) -> IndexResult<String> {
        value
            .as_str()
            .map(str::to_lowercase)
            .ok_or_else(|| IndexError::invalid_value(&self.field, "a string", value))
    }

    fn invalidate(&mut self) {
        self.sorted_values.invalidate();
        self.sorted_reversed.invalidate();
    }

    fn starts_with(&mut self, prefix: &str) -> CandidateResult {
        let values = &self.values;
        let sorted = self.sorted_values.get_or_rebuild(|| sorted_keys(values));
        CandidateResult::exact(union_range(values, sorted, prefix))
    }

    fn ends_with(&mut self, suffix: &str) -> CandidateResult {
        let reversed_values = &self.reversed;
        let sorted = self.sorted_reversed.get_or_rebuild(|| sorted_keys(reversed_values));
        CandidateResult::exact(union_range(reversed_values, sorted, &reversed(suffix)))
    }

    fn contains(&self, needle: &str) -> CandidateResult {
        if needle.chars().count() < self.ngram_size {
            return CandidateResult::Unsupported;
        }

        let mut postings = Vec::new();
        for gram in ngrams(needle, self.ngram_size) {
            match self.grams.get(&gram) {
                Some(ids) => postings.push(ids.clone()),
                None => return CandidateResult::Empty,
            }
        }
        CandidateResult::superset(intersect_all(postings))
    }

    fn lookup(&self, value: &Value) -> Option<&IdSet> {
        self.values.get(&value.as_str()?.to_lowercase())
    }
}

fn sorted_keys(map: &HashMap<String, IdSet>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

fn union_range(map: &HashMap<String, IdSet>, sorted: &[String], prefix: &str) -> IdSet {
    let mut ids = IdSet::new();
    for key in &sorted[prefix_range(sorted, prefix)] {
        if let Some(set) = map.get(key) {
            ids.extend(set.iter().cloned());
        }
    }
    ids
}

impl FieldIndex for SubstringIndex {
    fn field(&self) -> &str {
        &self.field
    }

    fn index_type(&self) -> IndexType {
        IndexType::Substring
    }

    fn validate(&self, value: &Value) -> IndexResult<()> {
        self.normalized(value).map(|_| ())
    }

    fn add(&mut self, id: &EntityId, value: &Value) -> IndexResult<()> {
        let value = self.normalized(value)?;
        for gram in ngrams(&value, self.ngram_size) {
            post(&mut self.grams, gram, id);
        }
        post(&mut self.reversed, reversed(&value), id);
        post(&mut self.values, value, id);
        self.invalidate();
        Ok(())
    }

    fn remove(&mut self, id: &EntityId, value: &Value) -> IndexResult<()> {
        let value = self.normalized(value)?;
        for gram in ngrams(&value, self.ngram_size) {
            unpost(&mut self.grams, gram.as_str(), id);
        }
        unpost(&mut self.reversed, reversed(&value).as_str(), id);
        unpost(&mut self.values, value.as_str(), id);
        self.invalidate();
        Ok(())
    }

    fn clear(&mut self) {
        self.values.clear();
        self.reversed.clear();
        self.grams.clear();
        self.invalidate();
    }

    fn query(&mut self, condition: &FieldCondition) -> CandidateResult {
        match condition {
            FieldCondition::StartsWith(p) if !p.is_empty() => self.starts_with(&p.to_lowercase()),
            FieldCondition::EndsWith(s) if !s.is_empty() => self.ends_with(&s.to_lowercase()),
            FieldCondition::Contains(n) if !n.is_empty() => self.contains(&n.to_lowercase()),
            // lower-cased lookups may admit values that differ only in case
            FieldCondition::Eq(value) if value.is_string() => {
                CandidateResult::superset(self.lookup(value).cloned().unwrap_or_default())
            }
            FieldCondition::In(values) => {
                let mut ids = IdSet::new();
                union_into(&mut ids, values.iter().filter_map(|v| self.lookup(v)));
                CandidateResult::superset(ids)
            }
            _ => CandidateResult::Unsupported,
        }
    }

    fn stats(&self) -> IndexStats {
        let mut stats = IndexStats::from_postings(self.values.values());
        stats.total_tokens = Some(self.grams.len());
        stats
    }

    fn is_dirty(&self) -> bool {
        self.sorted_values.is_dirty() || self.sorted_reversed.is_dirty()
    }
}
