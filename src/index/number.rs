//! Number and date range index
//!
//! Maps normalised numeric values (dates become epoch milliseconds) to entity
//! sets. A lazily rebuilt ascending list of `{value, ids}` entries serves
//! range queries by binary search and ordered traversal for pagination.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::candidates::{union_into, CandidateResult, IdSet};
use super::definition::IndexType;
use super::entity::EntityId;
use super::errors::{IndexError, IndexResult};
use super::field::{post, unpost, FieldIndex, IndexStats, SortedCache};
use super::predicate::{FieldCondition, RangeCondition};
use super::search::{lower_bound, upper_bound};

/// Totally ordered encoding of a finite `f64`.
///
/// Negative values have all bits flipped, positive values only the sign
/// bit, so unsigned ordering matches numeric ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumberKey(u64);

impl NumberKey {
    pub fn from_f64(v: f64) -> Self {
        // fold -0.0 into 0.0 so both hash alike
        let v = if v == 0.0 { 0.0 } else { v };
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        NumberKey(ordered)
    }

    pub fn to_f64(self) -> f64 {
        let bits = if (self.0 >> 63) == 1 {
            self.0 ^ (1 << 63)
        } else {
            !self.0
        };
        f64::from_bits(bits)
    }
}

/// Parse a date string into epoch milliseconds (UTC).
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS[.fff]` without offset,
/// and plain `YYYY-MM-DD` dates (midnight).
pub fn date_to_millis(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis() as f64);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
}

/// Traversal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Paging and filtering for ordered traversal
#[derive(Debug, Clone, Copy, Default)]
pub struct TraversalOptions<'a> {
    /// Only yield IDs in this set
    pub candidates: Option<&'a IdSet>,
    /// Matching IDs to skip before collecting
    pub offset: usize,
    /// Maximum IDs to collect
    pub limit: Option<usize>,
}

/// One entry of the sorted cache
#[derive(Debug, Clone)]
pub struct NumberEntry {
    pub value: f64,
    pub ids: Vec<EntityId>,
}

fn entry_value(entry: &NumberEntry) -> &f64 {
    &entry.value
}

/// Range index over numbers or dates.
#[derive(Debug)]
pub struct NumberIndex {
    field: String,
    dates: bool,
    values: HashMap<NumberKey, IdSet>,
    sorted: SortedCache<NumberEntry>,
}

impl NumberIndex {
    /// Index over plain numbers
    pub fn numbers(field: impl Into<String>) -> Self {
        Self::new(field, false)
    }

    /// Index over dates; numbers are taken as epoch milliseconds
    pub fn dates(field: impl Into<String>) -> Self {
        Self::new(field, true)
    }

    fn new(field: impl Into<String>, dates: bool) -> Self {
        Self {
            field: field.into(),
            dates,
            values: HashMap::new(),
            sorted: SortedCache::Dirty,
        }
    }

    /// Normalise a raw value to a finite number
    pub fn normalize(&self, value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if self.dates => date_to_millis(s),
            _ => None,
        }?;
        n.is_finite().then_some(n)
    }

    fn key_of(&self, value: &Value) -> IndexResult<NumberKey> {
        self.normalize(value).map(NumberKey::from_f64).ok_or_else(|| {
            let expected = if self.dates {
                "a date or epoch milliseconds"
            } else {
                "a finite number"
            };
            IndexError::invalid_value(&self.field, expected, value)
        })
    }

    fn entries(&mut self) -> &[NumberEntry] {
        let values = &self.values;
        self.sorted.get_or_rebuild(|| {
            let mut keys: Vec<&NumberKey> = values.keys().collect();
            keys.sort();
            keys.into_iter()
                .map(|key| NumberEntry {
                    value: key.to_f64(),
                    ids: values[key].iter().cloned().collect(),
                })
                .collect()
        })
    }

    fn lookup(&self, value: &Value) -> Option<&IdSet> {
        let key = NumberKey::from_f64(self.normalize(value)?);
        self.values.get(&key)
    }

    fn query_range(&mut self, range: &RangeCondition) -> CandidateResult {
        let bound = |b: &Option<Value>| -> Result<Option<f64>, ()> {
            match b {
                None => Ok(None),
                Some(v) => self.normalize(v).map(Some).ok_or(()),
            }
        };
        let (Ok(gt), Ok(gte), Ok(lt), Ok(lte)) = (
            bound(&range.gt),
            bound(&range.gte),
            bound(&range.lt),
            bound(&range.lte),
        ) else {
            return CandidateResult::Unsupported;
        };

        let entries = self.entries();
        let key = entry_value;

        let mut start = 0;
        if let Some(v) = gte {
            start = start.max(lower_bound(entries, &v, key));
        }
        if let Some(v) = gt {
            start = start.max(upper_bound(entries, &v, key));
        }
        let mut end = entries.len();
        if let Some(v) = lt {
            end = end.min(lower_bound(entries, &v, key));
        }
        if let Some(v) = lte {
            end = end.min(upper_bound(entries, &v, key));
        }
        if start >= end {
            return CandidateResult::Empty;
        }

        let ids: IdSet = entries[start..end]
            .iter()
            .flat_map(|e| e.ids.iter().cloned())
            .collect();
        CandidateResult::exact(ids)
    }

    /// Walk IDs in value order.
    ///
    /// IDs sharing a value come out in ascending ID order in both directions.
    /// Stops as soon as `limit` IDs are collected.
    pub fn ordered_keys(
        &mut self,
        direction: SortDirection,
        options: TraversalOptions<'_>,
    ) -> Vec<EntityId> {
        let limit = options.limit.unwrap_or(usize::MAX);
        let mut out = Vec::new();
        if limit == 0 {
            return out;
        }

        let entries = self.entries();
        let ordered: Box<dyn Iterator<Item = &NumberEntry>> = match direction {
            SortDirection::Asc => Box::new(entries.iter()),
            SortDirection::Desc => Box::new(entries.iter().rev()),
        };

        let mut skipped = 0;
        for entry in ordered {
            for id in &entry.ids {
                if options.candidates.is_some_and(|c| !c.contains(id)) {
                    continue;
                }
                if skipped < options.offset {
                    skipped += 1;
                    continue;
                }
                out.push(id.clone());
                if out.len() >= limit {
                    return out;
                }
            }
        }
        out
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FieldIndex for NumberIndex {
    fn field(&self) -> &str {
        &self.field
    }

    fn index_type(&self) -> IndexType {
        if self.dates {
            IndexType::Date
        } else {
            IndexType::Number
        }
    }

    fn validate(&self, value: &Value) -> IndexResult<()> {
        self.key_of(value).map(|_| ())
    }

    fn add(&mut self, id: &EntityId, value: &Value) -> IndexResult<()> {
        let key = self.key_of(value)?;
        post(&mut self.values, key, id);
        self.sorted.invalidate();
        Ok(())
    }

    fn remove(&mut self, id: &EntityId, value: &Value) -> IndexResult<()> {
        let key = self.key_of(value)?;
        unpost(&mut self.values, &key, id);
        self.sorted.invalidate();
        Ok(())
    }

    fn clear(&mut self) {
        self.values.clear();
        self.sorted.invalidate();
    }

    fn query(&mut self, condition: &FieldCondition) -> CandidateResult {
        match condition {
            FieldCondition::In(values) => {
                let mut ids = IdSet::new();
                union_into(&mut ids, values.iter().filter_map(|v| self.lookup(v)));
                CandidateResult::exact(ids)
            }
            FieldCondition::Range(range) => self.query_range(range),
            FieldCondition::Eq(value) => {
                if self.normalize(value).is_none() {
                    return CandidateResult::Unsupported;
                }
                CandidateResult::exact(self.lookup(value).cloned().unwrap_or_default())
            }
            _ => CandidateResult::Unsupported,
        }
    }

    fn matches(&self, condition: &FieldCondition, value: Option<&Value>) -> bool {
        let normalized = value.and_then(|v| self.normalize(v));
        let key = normalized.map(NumberKey::from_f64);
        let same = |literal: &Value| {
            key.is_some() && self.normalize(literal).map(NumberKey::from_f64) == key
        };
        match condition {
            FieldCondition::Eq(literal) => same(literal),
            FieldCondition::In(literals) => literals.iter().any(same),
            FieldCondition::Range(range) => {
                let Some(v) = normalized else {
                    return false;
                };
                let check = |bound: &Option<Value>, ok: fn(f64, f64) -> bool| match bound {
                    None => true,
                    Some(b) => self.normalize(b).is_some_and(|limit| ok(v, limit)),
                };
                check(&range.gt, |v, l| v > l)
                    && check(&range.gte, |v, l| v >= l)
                    && check(&range.lt, |v, l| v < l)
                    && check(&range.lte, |v, l| v <= l)
            }
            other => other.matches(value),
        }
    }

    fn stats(&self) -> IndexStats {
        IndexStats::from_postings(self.values.values())
    }

    fn is_dirty(&self) -> bool {
        self.sorted.is_dirty()
    }

    fn as_number_mut(&mut self) -> Option<&mut NumberIndex> {
        Some(self)
    }
}
