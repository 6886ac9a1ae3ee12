//! Field predicates
//!
//! A `Where` maps field names to per-field conditions. The surface grammar is
//! owned by the query executor; this module only carries the condition shapes
//! the indexes understand, plus a field-type-agnostic reference evaluator.
//! Indexed fields are re-checked through `FieldIndex::matches` instead, which
//! applies the semantics of the field's index.

use std::fmt;

use serde_json::{Map, Value};

use super::entity::field_value;
use super::number::date_to_millis;

/// Bounds of a range condition. Absent bounds are open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeCondition {
    pub gt: Option<Value>,
    pub gte: Option<Value>,
    pub lt: Option<Value>,
    pub lte: Option<Value>,
}

impl RangeCondition {
    pub fn gt(mut self, v: impl Into<Value>) -> Self {
        self.gt = Some(v.into());
        self
    }

    pub fn gte(mut self, v: impl Into<Value>) -> Self {
        self.gte = Some(v.into());
        self
    }

    pub fn lt(mut self, v: impl Into<Value>) -> Self {
        self.lt = Some(v.into());
        self
    }

    pub fn lte(mut self, v: impl Into<Value>) -> Self {
        self.lte = Some(v.into());
        self
    }

    fn is_open(&self) -> bool {
        self.gt.is_none() && self.gte.is_none() && self.lt.is_none() && self.lte.is_none()
    }
}

/// Condition on a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCondition {
    /// Literal equality
    Eq(Value),
    /// Membership in a set of literals
    In(Vec<Value>),
    /// Numeric or date range
    Range(RangeCondition),
    StartsWith(String),
    EndsWith(String),
    Contains(String),
    /// Full-text query
    Match(String),
    /// Object shape no index understands
    Unrecognized(Value),
}

impl FieldCondition {
    pub fn eq(value: impl Into<Value>) -> Self {
        FieldCondition::Eq(value.into())
    }

    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        FieldCondition::In(values.into_iter().map(Into::into).collect())
    }

    /// Start an open range; narrow it with the `RangeCondition` builders.
    pub fn range(range: RangeCondition) -> Self {
        FieldCondition::Range(range)
    }

    pub fn starts_with(s: impl Into<String>) -> Self {
        FieldCondition::StartsWith(s.into())
    }

    pub fn ends_with(s: impl Into<String>) -> Self {
        FieldCondition::EndsWith(s.into())
    }

    pub fn contains(s: impl Into<String>) -> Self {
        FieldCondition::Contains(s.into())
    }

    pub fn text_match(s: impl Into<String>) -> Self {
        FieldCondition::Match(s.into())
    }

    /// Interpret a JSON condition.
    ///
    /// Non-objects are equality literals. Objects must consist of exactly one
    /// recognised operator shape, otherwise they are `Unrecognized`.
    pub fn from_json(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return FieldCondition::Eq(value.clone());
        };

        if map.len() == 1 {
            if let Some((op, operand)) = map.iter().next() {
                match (op.as_str(), operand) {
                    ("in", Value::Array(items)) => return FieldCondition::In(items.clone()),
                    ("startsWith", Value::String(s)) => {
                        return FieldCondition::StartsWith(s.clone());
                    }
                    ("endsWith", Value::String(s)) => return FieldCondition::EndsWith(s.clone()),
                    ("contains", Value::String(s)) => return FieldCondition::Contains(s.clone()),
                    ("match", Value::String(s)) => return FieldCondition::Match(s.clone()),
                    _ => {}
                }
            }
        }

        if let Some(range) = range_from_map(map) {
            return FieldCondition::Range(range);
        }

        FieldCondition::Unrecognized(value.clone())
    }

    /// Reference evaluation against a field value (`None` when absent).
    ///
    /// Equality is literal, except that numbers compare by value. Ranges read
    /// strings as dates. String operators compare case-insensitively. `Match`
    /// and `Unrecognized` cannot be refuted here and always pass.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        match self {
            FieldCondition::Match(_) | FieldCondition::Unrecognized(_) => true,
            FieldCondition::Eq(literal) => value.is_some_and(|v| values_equal(v, literal)),
            FieldCondition::In(literals) => {
                value.is_some_and(|v| literals.iter().any(|l| values_equal(v, l)))
            }
            FieldCondition::Range(range) => value.is_some_and(|v| range_matches(range, v)),
            FieldCondition::StartsWith(p) => {
                lowered(value).is_some_and(|s| s.starts_with(&p.to_lowercase()))
            }
            FieldCondition::EndsWith(p) => {
                lowered(value).is_some_and(|s| s.ends_with(&p.to_lowercase()))
            }
            FieldCondition::Contains(p) => {
                lowered(value).is_some_and(|s| s.contains(&p.to_lowercase()))
            }
        }
    }
}

fn range_from_map(map: &Map<String, Value>) -> Option<RangeCondition> {
    let mut range = RangeCondition::default();
    for (op, operand) in map {
        let slot = match op.as_str() {
            "gt" => &mut range.gt,
            "gte" => &mut range.gte,
            "lt" => &mut range.lt,
            "lte" => &mut range.lte,
            _ => return None,
        };
        *slot = Some(operand.clone());
    }
    if range.is_open() { None } else { Some(range) }
}

fn lowered(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_lowercase)
}

fn comparable(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => date_to_millis(s),
        _ => None,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn range_matches(range: &RangeCondition, value: &Value) -> bool {
    let Some(v) = comparable(value) else {
        return false;
    };
    let bound = |b: &Option<Value>| b.as_ref().map(comparable);
    let check = |b: Option<Option<f64>>, ok: fn(f64, f64) -> bool| match b {
        None => true,
        Some(None) => false,
        Some(Some(limit)) => ok(v, limit),
    };
    check(bound(&range.gt), |v, l| v > l)
        && check(bound(&range.gte), |v, l| v >= l)
        && check(bound(&range.lt), |v, l| v < l)
        && check(bound(&range.lte), |v, l| v <= l)
}

/// Predicate over a whole entity.
pub enum Where {
    /// Field name to condition, in caller order
    Fields(Vec<(String, FieldCondition)>),
    /// Opaque caller-defined filter; indexes cannot see through it
    Filter(Box<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl Where {
    /// Empty field predicate
    pub fn new() -> Self {
        Where::Fields(Vec::new())
    }

    /// Add a field condition. Has no effect on a `Filter`.
    pub fn field(mut self, name: impl Into<String>, condition: FieldCondition) -> Self {
        if let Where::Fields(fields) = &mut self {
            fields.push((name.into(), condition));
        }
        self
    }

    pub fn filter<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Where::Filter(Box::new(f))
    }

    /// Interpret a JSON predicate object. `null` means no predicate.
    pub fn from_json(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Where::Fields(
            map.iter()
                .map(|(field, condition)| (field.clone(), FieldCondition::from_json(condition)))
                .collect(),
        ))
    }

    /// Reference evaluation against a whole entity
    pub fn matches(&self, entity: &Value) -> bool {
        match self {
            Where::Filter(f) => f(entity),
            Where::Fields(fields) => fields
                .iter()
                .all(|(field, condition)| condition.matches(field_value(entity, field))),
        }
    }
}

impl Default for Where {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Where::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Where::Filter(_) => f.write_str("Filter(<fn>)"),
        }
    }
}
