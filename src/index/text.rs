//! Full-text index
//!
//! Tokens (after dropping those shorter than `min_token_length`) map to the
//! documents containing them. Each document's token list is kept so removal
//! does not depend on re-tokenizing a possibly stale value. Fuzzy search
//! expands a query token to every indexed token within `fuzzy_distance`
//! edits.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use super::candidates::{intersect_all, CandidateResult, IdSet};
use super::definition::IndexType;
use super::distance::bounded_levenshtein_chars;
use super::entity::EntityId;
use super::errors::{IndexError, IndexResult};
use super::field::{post, unpost, FieldIndex, IndexStats, SortedCache};
use super::predicate::FieldCondition;
use super::search::prefix_range;
use super::tokenizer::{Tokenizer, WordTokenizer};

pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;
pub const DEFAULT_FUZZY_DISTANCE: usize = 1;
pub const MAX_FUZZY_DISTANCE: usize = 2;

/// Text index settings
#[derive(Debug, Clone)]
pub struct TextIndexOptions {
    pub tokenizer: Arc<dyn Tokenizer>,
    /// Tokens with fewer characters are not indexed
    pub min_token_length: usize,
    /// Maximum edits for fuzzy matches, clamped to 2
    pub fuzzy_distance: usize,
}

impl Default for TextIndexOptions {
    fn default() -> Self {
        Self {
            tokenizer: Arc::new(WordTokenizer),
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            fuzzy_distance: DEFAULT_FUZZY_DISTANCE,
        }
    }
}

#[derive(Debug)]
pub struct TextIndex {
    field: String,
    tokenizer: Arc<dyn Tokenizer>,
    min_token_length: usize,
    fuzzy_distance: usize,
    postings: HashMap<String, IdSet>,
    doc_tokens: HashMap<EntityId, Vec<String>>,
    sorted_tokens: SortedCache<String>,
}

impl TextIndex {
    pub fn new(field: impl Into<String>, options: TextIndexOptions) -> Self {
        Self {
            field: field.into(),
            tokenizer: options.tokenizer,
            min_token_length: options.min_token_length.max(1),
            fuzzy_distance: options.fuzzy_distance.min(MAX_FUZZY_DISTANCE),
            postings: HashMap::new(),
            doc_tokens: HashMap::new(),
            sorted_tokens: SortedCache::Dirty,
        }
    }

    pub fn fuzzy_distance(&self) -> usize {
        self.fuzzy_distance
    }

    pub fn min_token_length(&self) -> usize {
        self.min_token_length
    }

    /// Distinct indexable tokens of `text`, in first-seen order
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.tokenizer
            .tokenize(text)
            .into_iter()
            .filter(|t| t.chars().count() >= self.min_token_length)
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }

    fn text<'v>(&self, value: &'v Value) -> IndexResult<&'v str> {
        value
            .as_str()
            .ok_or_else(|| IndexError::invalid_value(&self.field, "a string", value))
    }

    /// Normalise a prefix/suffix operand the way indexed tokens are.
    ///
    /// `None` unless it is a single token long enough to be indexed.
    fn affix(&self, raw: &str) -> Option<String> {
        let mut tokens = self.tokenizer.tokenize(raw).into_iter();
        match (tokens.next(), tokens.next()) {
            (Some(affix), None) if affix.chars().count() >= self.min_token_length => Some(affix),
            _ => None,
        }
    }

    /// Whether `doc` holds every indexable token of `query`
    fn has_tokens(&self, doc: &HashSet<String>, query: &str) -> bool {
        self.tokens(query).iter().all(|t| doc.contains(t))
    }

    fn starts_with(&mut self, raw: &str) -> CandidateResult {
        let Some(prefix) = self.affix(raw) else {
            return CandidateResult::Empty;
        };
        let postings = &self.postings;
        let sorted = self.sorted_tokens.get_or_rebuild(|| {
            let mut tokens: Vec<String> = postings.keys().cloned().collect();
            tokens.sort();
            tokens
        });

        let mut ids = IdSet::new();
        for token in &sorted[prefix_range(sorted, &prefix)] {
            if let Some(set) = postings.get(token) {
                ids.extend(set.iter().cloned());
            }
        }
        CandidateResult::exact(ids)
    }

    /// Linear scan; suffixes have no sorted structure
    fn ends_with(&self, raw: &str) -> CandidateResult {
        let Some(suffix) = self.affix(raw) else {
            return CandidateResult::Empty;
        };
        let mut ids = IdSet::new();
        for (token, set) in &self.postings {
            if token.ends_with(&suffix) {
                ids.extend(set.iter().cloned());
            }
        }
        CandidateResult::exact(ids)
    }

    /// Every query token must be present verbatim
    fn exact_search(&self, query: &str) -> Option<IdSet> {
        let tokens = self.tokens(query);
        if tokens.is_empty() {
            return None;
        }
        let mut postings = Vec::with_capacity(tokens.len());
        for token in &tokens {
            match self.postings.get(token) {
                Some(ids) => postings.push(ids.clone()),
                None => return Some(IdSet::new()),
            }
        }
        Some(intersect_all(postings))
    }

    /// Exact-or-fuzzy expansion per query token, AND-ed across tokens.
    ///
    /// A token with no exact or fuzzy match is skipped rather than forcing
    /// the result empty, so the answer is always marked as a superset.
    fn full_text_search(&self, query: &str) -> CandidateResult {
        let tokens = self.tokens(query);
        if tokens.is_empty() {
            return CandidateResult::Unsupported;
        }

        let mut per_token = Vec::with_capacity(tokens.len());
        for token in &tokens {
            if let Some(ids) = self.postings.get(token) {
                per_token.push(ids.clone());
                continue;
            }
            if self.fuzzy_distance == 0 {
                continue;
            }
            let expanded = self.fuzzy_expand(token);
            if !expanded.is_empty() {
                per_token.push(expanded);
            }
        }

        if per_token.is_empty() {
            return CandidateResult::Empty;
        }
        CandidateResult::superset(intersect_all(per_token))
    }

    fn fuzzy_expand(&self, token: &str) -> IdSet {
        let query: Vec<char> = token.chars().collect();
        let mut ids = IdSet::new();
        for (candidate, set) in &self.postings {
            let chars: Vec<char> = candidate.chars().collect();
            if chars.len().abs_diff(query.len()) > self.fuzzy_distance {
                continue;
            }
            if bounded_levenshtein_chars(&query, &chars, self.fuzzy_distance).is_some() {
                ids.extend(set.iter().cloned());
            }
        }
        ids
    }

    /// Number of documents currently tracked
    pub fn doc_count(&self) -> usize {
        self.doc_tokens.len()
    }
}

impl FieldIndex for TextIndex {
    fn field(&self) -> &str {
        &self.field
    }

    fn index_type(&self) -> IndexType {
        IndexType::Text
    }

    fn validate(&self, value: &Value) -> IndexResult<()> {
        self.text(value).map(|_| ())
    }

    fn add(&mut self, id: &EntityId, value: &Value) -> IndexResult<()> {
        let tokens = self.tokens(self.text(value)?);
        for token in &tokens {
            post(&mut self.postings, token.clone(), id);
        }

        let known = self.doc_tokens.entry(id.clone()).or_default();
        for token in tokens {
            if !known.contains(&token) {
                known.push(token);
            }
        }
        self.sorted_tokens.invalidate();
        Ok(())
    }

    fn remove(&mut self, id: &EntityId, value: &Value) -> IndexResult<()> {
        let text = self.text(value)?;
        let tokens = match self.doc_tokens.remove(id) {
            Some(tokens) => tokens,
            None => self.tokens(text),
        };
        for token in &tokens {
            unpost(&mut self.postings, token.as_str(), id);
        }
        self.sorted_tokens.invalidate();
        Ok(())
    }

    fn clear(&mut self) {
        self.postings.clear();
        self.doc_tokens.clear();
        self.sorted_tokens.invalidate();
    }

    fn query(&mut self, condition: &FieldCondition) -> CandidateResult {
        match condition {
            FieldCondition::StartsWith(p) => self.starts_with(p),
            FieldCondition::EndsWith(s) => self.ends_with(s),
            FieldCondition::Contains(q) | FieldCondition::Match(q) => self.full_text_search(q),
            FieldCondition::Eq(Value::String(q)) => match self.exact_search(q) {
                None => CandidateResult::Unsupported,
                Some(ids) if ids.is_empty() && self.fuzzy_distance > 0 => {
                    self.full_text_search(q)
                }
                Some(ids) => CandidateResult::exact(ids),
            },
            FieldCondition::In(values) => {
                let mut ids = IdSet::new();
                for q in values.iter().filter_map(Value::as_str) {
                    match self.exact_search(q) {
                        Some(found) => ids.extend(found),
                        None => return CandidateResult::Unsupported,
                    }
                }
                CandidateResult::exact(ids)
            }
            _ => CandidateResult::Unsupported,
        }
    }

    fn matches(&self, condition: &FieldCondition, value: Option<&Value>) -> bool {
        let doc: Option<HashSet<String>> = value
            .and_then(Value::as_str)
            .map(|text| self.tokens(text).into_iter().collect());
        match condition {
            FieldCondition::StartsWith(p) => match (&doc, self.affix(p)) {
                (Some(doc), Some(prefix)) => doc.iter().any(|t| t.starts_with(&prefix)),
                _ => false,
            },
            FieldCondition::EndsWith(s) => match (&doc, self.affix(s)) {
                (Some(doc), Some(suffix)) => doc.iter().any(|t| t.ends_with(&suffix)),
                _ => false,
            },
            FieldCondition::Eq(Value::String(q))
            | FieldCondition::Contains(q)
            | FieldCondition::Match(q) => doc.is_some_and(|doc| self.has_tokens(&doc, q)),
            FieldCondition::In(values) => doc.is_some_and(|doc| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|q| self.has_tokens(&doc, q))
            }),
            other => other.matches(value),
        }
    }

    fn stats(&self) -> IndexStats {
        let mut stats = IndexStats::from_postings(self.postings.values());
        let total_tokens: usize = self.doc_tokens.values().map(Vec::len).sum();
        stats.total_docs = self.doc_tokens.len();
        stats.total_tokens = Some(total_tokens);
        stats.avg_doc_tokens = Some(if self.doc_tokens.is_empty() {
            0.0
        } else {
            total_tokens as f64 / self.doc_tokens.len() as f64
        });
        stats
    }

    fn is_dirty(&self) -> bool {
        self.sorted_tokens.is_dirty()
    }

    fn tokenizer_name(&self) -> Option<&str> {
        Some(self.tokenizer.name())
    }
}
