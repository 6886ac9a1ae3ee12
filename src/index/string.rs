//! Exact-match string index

use std::collections::HashMap;

use serde_json::Value;

use super::candidates::{union_into, CandidateResult, IdSet};
use super::definition::IndexType;
use super::entity::EntityId;
use super::errors::{IndexError, IndexResult};
use super::field::{post, unpost, FieldIndex, IndexStats};
use super::predicate::FieldCondition;

/// Value → entity set for exact string values.
#[derive(Debug, Default)]
pub struct StringIndex {
    field: String,
    values: HashMap<String, IdSet>,
}

impl StringIndex {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            values: HashMap::new(),
        }
    }

    fn as_str<'v>(&self, value: &'v Value) -> IndexResult<&'v str> {
        value
            .as_str()
            .ok_or_else(|| IndexError::invalid_value(&self.field, "a string", value))
    }

    fn lookup(&self, value: &Value) -> Option<&IdSet> {
        self.values.get(value.as_str()?)
    }
}

impl FieldIndex for StringIndex {
    fn field(&self) -> &str {
        &self.field
    }

    fn index_type(&self) -> IndexType {
        IndexType::String
    }

    fn validate(&self, value: &Value) -> IndexResult<()> {
        self.as_str(value).map(|_| ())
    }

    fn add(&mut self, id: &EntityId, value: &Value) -> IndexResult<()> {
        let s = self.as_str(value)?;
        post(&mut self.values, s.to_string(), id);
        Ok(())
    }

    fn remove(&mut self, id: &EntityId, value: &Value) -> IndexResult<()> {
        let s = self.as_str(value)?;
        unpost(&mut self.values, s, id);
        Ok(())
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    fn query(&mut self, condition: &FieldCondition) -> CandidateResult {
        match condition {
            FieldCondition::In(values) => {
                let mut ids = IdSet::new();
                union_into(&mut ids, values.iter().filter_map(|v| self.lookup(v)));
                CandidateResult::exact(ids)
            }
            FieldCondition::Eq(value) if value.is_string() => {
                CandidateResult::exact(self.lookup(value).cloned().unwrap_or_default())
            }
            _ => CandidateResult::Unsupported,
        }
    }

    fn stats(&self) -> IndexStats {
        IndexStats::from_postings(self.values.values())
    }

    fn is_dirty(&self) -> bool {
        false
    }
}
