//! Entity identifiers and field extraction
//!
//! Entities are JSON objects. Indexes never interpret identifiers beyond
//! using them as set members, so `EntityId` only needs a total order.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{IndexError, IndexResult};

/// Identifier of an entity within its collection.
///
/// Ordering is deterministic: Int < Str.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Integer key
    Int(i64),
    /// String key
    Str(String),
}

impl EntityId {
    /// Read an identifier from a JSON value.
    ///
    /// Strings and integral numbers are accepted, anything else is `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(EntityId::Str(s.clone())),
            Value::Number(n) => n.as_i64().map(EntityId::Int),
            _ => None,
        }
    }

    /// Extract the identifier of `entity` stored under `id_field`
    pub fn of(entity: &Value, id_field: &str) -> IndexResult<Self> {
        field_value(entity, id_field)
            .and_then(EntityId::from_json)
            .ok_or_else(|| IndexError::MissingEntityId {
                id_field: id_field.to_string(),
            })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(i) => write!(f, "{}", i),
            EntityId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Str(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Str(s)
    }
}

impl From<i64> for EntityId {
    fn from(i: i64) -> Self {
        EntityId::Int(i)
    }
}

/// Resolve a field on an entity.
///
/// A direct key wins; otherwise `a.b.c` walks nested objects. `null` counts
/// as absent.
pub fn field_value<'a>(entity: &'a Value, field: &str) -> Option<&'a Value> {
    let object = entity.as_object()?;
    if let Some(value) = object.get(field) {
        return non_null(value);
    }
    if !field.contains('.') {
        return None;
    }

    let mut current = entity;
    for segment in field.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    non_null(current)
}

fn non_null(value: &Value) -> Option<&Value> {
    if value.is_null() { None } else { Some(value) }
}
