//! Index Manager
//!
//! Owns one field index per configured field, routes entity mutations to
//! them and resolves multi-field predicates into one candidate result.
//!
//! # API
//!
//! - `add(item)` / `remove(item)` / `update(previous, next)` - Incremental maintenance
//! - `rebuild(items)` - Clear and re-add a full snapshot
//! - `collect_candidates(where)` - Candidate set for a predicate
//! - `ordered_keys(field, direction, options)` - Pre-sorted traversal
//! - `stats(field)` / `index_snapshots()` / `last_query_plan()` - Introspection
//!
//! # Invariants
//!
//! - Field names are unique
//! - Mutations validate every touched value before changing any index
//! - `Exact` results are only produced when every predicate field answered exactly

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::candidates::{intersect_all, CandidateResult, Exactness, ResultShape};
use super::definition::{IndexDefinition, IndexType, ManagerConfig};
use super::entity::{field_value, EntityId};
use super::errors::{IndexError, IndexResult};
use super::field::{FieldIndex, IndexSnapshot, IndexStats};
use super::number::{SortDirection, TraversalOptions};
use super::predicate::{FieldCondition, Where};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, Severity};

/// Per-field outcome recorded in a query plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldStatus {
    /// No index configured for the field
    NoIndex,
    /// The index could not decide this condition
    Unsupported,
    /// The index proved no entity matches
    Empty,
    /// Not evaluated because an earlier field was empty
    Skipped,
    Candidates { count: usize, exactness: Exactness },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPlan {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_type: Option<IndexType>,
    #[serde(flatten)]
    pub status: FieldStatus,
}

/// How the predicate reached the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    Absent,
    Filter,
    Fields,
}

/// Trace of the most recent `collect_candidates` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPlan {
    pub predicate: PredicateKind,
    pub fields: Vec<FieldPlan>,
    pub result: ResultShape,
}

/// Index Manager that maintains the configured field indexes
#[derive(Debug)]
pub struct IndexManager {
    id_field: String,
    record_query_plan: bool,
    /// In definition order
    indexes: Vec<Box<dyn FieldIndex>>,
    positions: HashMap<String, usize>,
    last_plan: Option<QueryPlan>,
}

impl IndexManager {
    /// Build with default settings (`id` identifier field, plans recorded)
    pub fn new(definitions: Vec<IndexDefinition>) -> IndexResult<Self> {
        Self::with_config(ManagerConfig::new(definitions))
    }

    /// Build from a configuration.
    ///
    /// Fails on an unknown index type or a duplicate field.
    pub fn with_config(config: ManagerConfig) -> IndexResult<Self> {
        let mut indexes: Vec<Box<dyn FieldIndex>> = Vec::with_capacity(config.indexes.len());
        let mut positions = HashMap::new();

        for definition in &config.indexes {
            let built = if positions.contains_key(&definition.field) {
                Err(IndexError::DuplicateField {
                    field: definition.field.clone(),
                })
            } else {
                definition.build()
            };

            match built {
                Ok(index) => {
                    positions.insert(definition.field.clone(), indexes.len());
                    indexes.push(index);
                }
                Err(err) => {
                    log_event_with_fields(
                        Event::ConfigRejected,
                        &[
                            ("code", err.code()),
                            ("field", definition.field.as_str()),
                            ("reason", err.to_string().as_str()),
                        ],
                    );
                    return Err(err);
                }
            }
        }

        log_event_with_fields(
            Event::ManagerCreated,
            &[
                ("id_field", config.id_field.as_str()),
                ("indexes", indexes.len().to_string().as_str()),
            ],
        );

        Ok(Self {
            id_field: config.id_field,
            record_query_plan: config.record_query_plan,
            indexes,
            positions,
            last_plan: None,
        })
    }

    /// Build from a JSON configuration document
    pub fn from_json(config: &Value) -> IndexResult<Self> {
        Self::with_config(ManagerConfig::from_json(config)?)
    }

    /// Resolve the identifier and every indexed value, validating each one.
    fn prepare<'v>(&self, item: &'v Value) -> IndexResult<(EntityId, Vec<(usize, &'v Value)>)> {
        let id = EntityId::of(item, &self.id_field)?;
        let mut touched = Vec::with_capacity(self.indexes.len());
        for (position, index) in self.indexes.iter().enumerate() {
            if let Some(value) = field_value(item, index.field()) {
                index.validate(value)?;
                touched.push((position, value));
            }
        }
        Ok((id, touched))
    }

    fn prepare_logged<'v>(
        &self,
        item: &'v Value,
        operation: &str,
    ) -> IndexResult<(EntityId, Vec<(usize, &'v Value)>)> {
        self.prepare(item).inspect_err(|err| {
            log_event_with_fields(
                Event::MutationRejected,
                &[
                    ("code", err.code()),
                    ("operation", operation),
                    ("reason", err.to_string().as_str()),
                ],
            );
        })
    }

    /// Index an entity. `None` is a no-op; missing or null fields are skipped.
    ///
    /// A value error leaves every index untouched.
    pub fn add(&mut self, item: Option<&Value>) -> IndexResult<()> {
        let Some(item) = item else {
            return Ok(());
        };
        let (id, touched) = self.prepare_logged(item, "add")?;
        for (position, value) in touched {
            self.indexes[position].add(&id, value)?;
        }
        Ok(())
    }

    /// Unindex an entity using the values it was indexed with.
    pub fn remove(&mut self, item: Option<&Value>) -> IndexResult<()> {
        let Some(item) = item else {
            return Ok(());
        };
        let (id, touched) = self.prepare_logged(item, "remove")?;
        for (position, value) in touched {
            self.indexes[position].remove(&id, value)?;
        }
        Ok(())
    }

    /// Replace `previous` with `next`.
    ///
    /// Both versions are validated before anything is mutated.
    pub fn update(&mut self, previous: Option<&Value>, next: Option<&Value>) -> IndexResult<()> {
        let old = previous
            .map(|item| self.prepare_logged(item, "update"))
            .transpose()?;
        let new = next
            .map(|item| self.prepare_logged(item, "update"))
            .transpose()?;

        if let Some((id, touched)) = old {
            for (position, value) in touched {
                self.indexes[position].remove(&id, value)?;
            }
        }
        if let Some((id, touched)) = new {
            for (position, value) in touched {
                self.indexes[position].add(&id, value)?;
            }
        }
        Ok(())
    }

    /// Clear every index, then add each item in order.
    ///
    /// Returns the number of items indexed. An invalid item stops the
    /// rebuild; items before it stay indexed.
    pub fn rebuild<'a, I>(&mut self, items: I) -> IndexResult<usize>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        log_event(Event::RebuildBegin);
        for index in &mut self.indexes {
            index.clear();
        }

        let mut count = 0usize;
        for item in items {
            if let Err(err) = self.add(Some(item)) {
                log_event_with_fields(
                    Event::RebuildFailed,
                    &[("code", err.code()), ("indexed", count.to_string().as_str())],
                );
                return Err(err);
            }
            count += 1;
        }

        log_event_with_fields(Event::RebuildComplete, &[("items", count.to_string().as_str())]);
        Ok(count)
    }

    /// Clear every index
    pub fn clear(&mut self) {
        for index in &mut self.indexes {
            index.clear();
        }
        log_event_with_fields(
            Event::IndexCleared,
            &[("indexes", self.indexes.len().to_string().as_str())],
        );
    }

    /// Resolve a predicate into one candidate result.
    ///
    /// Fields without an index, or whose index cannot decide, do not abort:
    /// they only downgrade the result to a superset. An empty field
    /// short-circuits the whole result to `Empty`.
    pub fn collect_candidates(&mut self, predicate: Option<&Where>) -> CandidateResult {
        let (result, plan) = match predicate {
            None => (CandidateResult::Unsupported, opaque_plan(PredicateKind::Absent)),
            Some(Where::Filter(_)) => {
                (CandidateResult::Unsupported, opaque_plan(PredicateKind::Filter))
            }
            Some(Where::Fields(fields)) => self.resolve(fields),
        };

        if Logger::enabled(Severity::Trace) {
            let shape = serde_json::to_string(&plan.result).unwrap_or_default();
            log_event_with_fields(
                Event::CandidatesCollected,
                &[("fields", plan.fields.len().to_string().as_str()), ("result", shape.as_str())],
            );
        }
        if self.record_query_plan {
            self.last_plan = Some(plan);
        }
        result
    }

    fn resolve(&mut self, fields: &[(String, FieldCondition)]) -> (CandidateResult, QueryPlan) {
        let mut exactness = Exactness::Exact;
        let mut sets = Vec::with_capacity(fields.len());
        let mut empty = false;
        let mut plans = Vec::with_capacity(fields.len());

        for (field, condition) in fields {
            let Some(&position) = self.positions.get(field) else {
                exactness = Exactness::Superset;
                plans.push(FieldPlan {
                    field: field.clone(),
                    index_type: None,
                    status: FieldStatus::NoIndex,
                });
                continue;
            };

            let index = &mut self.indexes[position];
            let status = if empty {
                FieldStatus::Skipped
            } else {
                match index.query(condition) {
                    CandidateResult::Unsupported => {
                        exactness = Exactness::Superset;
                        FieldStatus::Unsupported
                    }
                    CandidateResult::Empty => {
                        empty = true;
                        sets.clear();
                        FieldStatus::Empty
                    }
                    CandidateResult::Candidates {
                        ids,
                        exactness: field_exactness,
                    } => {
                        exactness = exactness.and(field_exactness);
                        let status = FieldStatus::Candidates {
                            count: ids.len(),
                            exactness: field_exactness,
                        };
                        sets.push(ids);
                        status
                    }
                }
            };
            plans.push(FieldPlan {
                field: field.clone(),
                index_type: Some(index.index_type()),
                status,
            });
        }

        let result = if empty {
            CandidateResult::Empty
        } else if sets.is_empty() {
            CandidateResult::Unsupported
        } else {
            CandidateResult::from_set(intersect_all(sets), exactness)
        };

        let plan = QueryPlan {
            predicate: PredicateKind::Fields,
            fields: plans,
            result: result.shape(),
        };
        (result, plan)
    }

    /// Re-check `entity` against `predicate`.
    ///
    /// Indexed fields are judged under their index's semantics, other fields
    /// by `FieldCondition::matches`. An `Exact` result from
    /// `collect_candidates` holds exactly the entities accepted here.
    pub fn matches(&self, predicate: &Where, entity: &Value) -> bool {
        match predicate {
            Where::Filter(f) => f(entity),
            Where::Fields(fields) => fields.iter().all(|(field, condition)| {
                let value = field_value(entity, field);
                match self.positions.get(field) {
                    Some(&position) => self.indexes[position].matches(condition, value),
                    None => condition.matches(value),
                }
            }),
        }
    }

    /// Entity IDs of `field` in value order; `None` without a number/date index.
    pub fn ordered_keys(
        &mut self,
        field: &str,
        direction: SortDirection,
        options: TraversalOptions<'_>,
    ) -> Option<Vec<EntityId>> {
        let position = *self.positions.get(field)?;
        let index = self.indexes[position].as_number_mut()?;
        Some(index.ordered_keys(direction, options))
    }

    /// Trace of the most recent `collect_candidates` call
    pub fn last_query_plan(&self) -> Option<&QueryPlan> {
        self.last_plan.as_ref()
    }

    pub fn stats(&self, field: &str) -> Option<IndexStats> {
        let position = *self.positions.get(field)?;
        Some(self.indexes[position].stats())
    }

    /// Snapshot of every index, in definition order
    pub fn index_snapshots(&self) -> Vec<IndexSnapshot> {
        self.indexes
            .iter()
            .map(|index| IndexSnapshot {
                field: index.field().to_string(),
                index_type: index.index_type(),
                dirty: index.is_dirty(),
                tokenizer: index.tokenizer_name().map(str::to_string),
                stats: index.stats(),
            })
            .collect()
    }

    /// Indexed fields, in definition order
    pub fn fields(&self) -> Vec<&str> {
        self.indexes.iter().map(|index| index.field()).collect()
    }

    pub fn has_index(&self, field: &str) -> bool {
        self.positions.contains_key(field)
    }

    pub fn index_kind(&self, field: &str) -> Option<IndexType> {
        let position = *self.positions.get(field)?;
        Some(self.indexes[position].index_type())
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }
}

fn opaque_plan(predicate: PredicateKind) -> QueryPlan {
    QueryPlan {
        predicate,
        fields: Vec::new(),
        result: ResultShape::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::candidates::IdSet;
    use crate::index::definition::IndexOptions;
    use crate::index::predicate::RangeCondition;
    use serde_json::json;

    fn ids(list: &[&str]) -> IdSet {
        list.iter().map(|s| EntityId::from(*s)).collect()
    }

    fn books() -> Vec<Value> {
        vec![
            json!({"id": "b1", "genre": "sci-fi", "updatedAt": 100, "title": "Dune Messiah"}),
            json!({"id": "b2", "genre": "fantasy", "updatedAt": 200, "title": "The Hobbit"}),
            json!({"id": "b3", "genre": "horror", "updatedAt": 300, "title": "Dune Road"}),
            json!({"id": "b4", "genre": "sci-fi", "updatedAt": 400, "title": "Neuromancer"}),
            json!({"id": "b5", "genre": "fantasy", "title": "Earthsea"}),
        ]
    }

    fn manager() -> IndexManager {
        let mut manager = IndexManager::new(vec![
            IndexDefinition::string("genre"),
            IndexDefinition::number("updatedAt"),
            IndexDefinition::substring("title").with_options(IndexOptions::default().ngram_size(3)),
        ])
        .unwrap();
        let items = books();
        manager.rebuild(&items).unwrap();
        manager
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = IndexManager::new(vec![
            IndexDefinition::string("genre"),
            IndexDefinition::text("genre"),
        ])
        .unwrap_err();
        assert_eq!(err.code(), "INDEX_DUPLICATE_FIELD");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = IndexManager::new(vec![IndexDefinition::new("loc", "geo")]).unwrap_err();
        assert_eq!(err.code(), "INDEX_UNKNOWN_TYPE");
    }

    #[test]
    fn test_intersection_exact() {
        let mut manager = manager();
        let predicate = Where::new()
            .field("genre", FieldCondition::one_of(["sci-fi", "fantasy"]))
            .field("updatedAt", FieldCondition::range(RangeCondition::default().gte(150)));
        let result = manager.collect_candidates(Some(&predicate));
        assert_eq!(result, CandidateResult::exact(ids(&["b2", "b4"])));
    }

    #[test]
    fn test_missing_index_downgrades_to_superset() {
        let mut manager = manager();
        let predicate = Where::new()
            .field("genre", FieldCondition::eq("sci-fi"))
            .field("author", FieldCondition::eq("Herbert"));
        let result = manager.collect_candidates(Some(&predicate));
        assert_eq!(result, CandidateResult::superset(ids(&["b1", "b4"])));

        let plan = manager.last_query_plan().unwrap();
        assert_eq!(plan.fields[1].status, FieldStatus::NoIndex);
    }

    #[test]
    fn test_unsupported_only_is_unsupported() {
        let mut manager = manager();
        let predicate = Where::new()
            .field("author", FieldCondition::eq("Herbert"))
            .field("title", FieldCondition::contains("du"));
        assert!(manager.collect_candidates(Some(&predicate)).is_unsupported());
        assert!(manager.collect_candidates(None).is_unsupported());
        let filter = Where::filter(|_| true);
        assert!(manager.collect_candidates(Some(&filter)).is_unsupported());
        assert_eq!(
            manager.last_query_plan().unwrap().predicate,
            PredicateKind::Filter
        );
    }

    #[test]
    fn test_empty_short_circuits() {
        let mut manager = manager();
        let predicate = Where::new()
            .field("genre", FieldCondition::eq("sci-fi"))
            .field("genre_missing", FieldCondition::eq("x"))
            .field("updatedAt", FieldCondition::eq(999))
            .field("title", FieldCondition::contains("dune"));
        assert_eq!(manager.collect_candidates(Some(&predicate)), CandidateResult::Empty);

        let plan = manager.last_query_plan().unwrap();
        let statuses: Vec<FieldStatus> = plan.fields.iter().map(|f| f.status).collect();
        assert_eq!(
            statuses,
            vec![
                FieldStatus::Candidates {
                    count: 2,
                    exactness: Exactness::Exact
                },
                FieldStatus::NoIndex,
                FieldStatus::Empty,
                FieldStatus::Skipped,
            ]
        );
        assert_eq!(plan.result, ResultShape::Empty);
    }

    #[test]
    fn test_superset_field_poisons_exactness() {
        let mut manager = manager();
        let predicate = Where::new()
            .field("title", FieldCondition::contains("dune"))
            .field("genre", FieldCondition::eq("sci-fi"));
        let result = manager.collect_candidates(Some(&predicate));
        assert_eq!(result, CandidateResult::superset(ids(&["b1"])));
    }

    #[test]
    fn test_add_skips_missing_fields() {
        let mut manager = manager();
        let predicate = Where::new().field("genre", FieldCondition::eq("fantasy"));
        assert_eq!(
            manager.collect_candidates(Some(&predicate)),
            CandidateResult::exact(ids(&["b2", "b5"]))
        );
        assert_eq!(manager.stats("updatedAt").unwrap().total_docs, 4);
    }

    #[test]
    fn test_add_none_is_noop() {
        let mut manager = manager();
        manager.add(None).unwrap();
        manager.remove(None).unwrap();
        assert_eq!(manager.stats("genre").unwrap().total_docs, 5);
    }

    #[test]
    fn test_invalid_value_leaves_indexes_untouched() {
        let mut manager = manager();
        let bad = json!({"id": "b9", "genre": "poetry", "updatedAt": "yesterday"});
        let err = manager.add(Some(&bad)).unwrap_err();
        assert_eq!(err.code(), "INDEX_INVALID_VALUE");

        let predicate = Where::new().field("genre", FieldCondition::eq("poetry"));
        assert_eq!(manager.collect_candidates(Some(&predicate)), CandidateResult::Empty);
    }

    #[test]
    fn test_missing_id_rejected() {
        let mut manager = manager();
        let err = manager.add(Some(&json!({"genre": "x"}))).unwrap_err();
        assert_eq!(err.code(), "INDEX_MISSING_ENTITY_ID");
    }

    #[test]
    fn test_update_replaces_values() {
        let mut manager = manager();
        let items = books();
        let next = json!({"id": "b1", "genre": "horror", "updatedAt": 100, "title": "Dune Messiah"});
        manager.update(Some(&items[0]), Some(&next)).unwrap();

        let predicate = Where::new().field("genre", FieldCondition::eq("horror"));
        assert_eq!(
            manager.collect_candidates(Some(&predicate)),
            CandidateResult::exact(ids(&["b1", "b3"]))
        );
        let predicate = Where::new().field("genre", FieldCondition::eq("sci-fi"));
        assert_eq!(
            manager.collect_candidates(Some(&predicate)),
            CandidateResult::exact(ids(&["b4"]))
        );
    }

    #[test]
    fn test_update_validates_before_removing() {
        let mut manager = manager();
        let items = books();
        let bad = json!({"id": "b1", "genre": 5});
        assert!(manager.update(Some(&items[0]), Some(&bad)).is_err());

        let predicate = Where::new().field("genre", FieldCondition::eq("sci-fi"));
        assert_eq!(
            manager.collect_candidates(Some(&predicate)),
            CandidateResult::exact(ids(&["b1", "b4"]))
        );
    }

    #[test]
    fn test_ordered_keys() {
        let mut manager = manager();
        let desc = manager
            .ordered_keys(
                "updatedAt",
                SortDirection::Desc,
                TraversalOptions {
                    limit: Some(2),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(desc, vec![EntityId::from("b4"), EntityId::from("b3")]);
        assert!(manager
            .ordered_keys("genre", SortDirection::Asc, TraversalOptions::default())
            .is_none());
        assert!(manager
            .ordered_keys("nope", SortDirection::Asc, TraversalOptions::default())
            .is_none());
    }

    #[test]
    fn test_snapshots() {
        let mut manager = manager();
        let snapshots = manager.index_snapshots();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].field, "genre");
        assert!(!snapshots[0].dirty);
        assert!(snapshots[1].dirty);

        let predicate = Where::new().field("updatedAt", FieldCondition::range(RangeCondition::default().lt(1)));
        manager.collect_candidates(Some(&predicate));
        assert!(!manager.index_snapshots()[1].dirty);

        let json = serde_json::to_value(&manager.index_snapshots()).unwrap();
        assert_eq!(json[1]["type"], "number");
        assert_eq!(json[1]["stats"]["totalDocs"], 4);
    }

    #[test]
    fn test_matches_uses_text_semantics() {
        let mut manager = IndexManager::new(vec![IndexDefinition::text("body")]).unwrap();
        let entity = json!({"id": 1, "body": "quick brown fox"});
        manager.add(Some(&entity)).unwrap();

        let predicate = Where::new().field("body", FieldCondition::eq("brown"));
        let result = manager.collect_candidates(Some(&predicate));
        assert_eq!(result, CandidateResult::exact([EntityId::from(1)].into_iter().collect()));
        assert!(manager.matches(&predicate, &entity));
        assert!(!predicate.matches(&entity));
    }

    #[test]
    fn test_matches_string_equality_is_literal() {
        let mut manager = IndexManager::new(vec![
            IndexDefinition::string("label"),
            IndexDefinition::date("at"),
        ])
        .unwrap();
        let entity = json!({"id": 1, "label": "2024-01-01T00:00:00Z", "at": "2024-01-01T00:00:00Z"});
        manager.add(Some(&entity)).unwrap();

        let on_label = Where::new().field("label", FieldCondition::eq("2024-01-01"));
        assert_eq!(manager.collect_candidates(Some(&on_label)), CandidateResult::Empty);
        assert!(!manager.matches(&on_label, &entity));

        let on_date = Where::new().field("at", FieldCondition::eq("2024-01-01"));
        assert_eq!(
            manager.collect_candidates(Some(&on_date)).exactness(),
            Some(Exactness::Exact)
        );
        assert!(manager.matches(&on_date, &entity));
    }

    #[test]
    fn test_matches_unindexed_and_filter() {
        let manager = manager();
        let item = &books()[0];
        let unindexed = Where::new().field("author", FieldCondition::Unrecognized(json!({})));
        assert!(manager.matches(&unindexed, item));
        let indexed = Where::new().field("genre", FieldCondition::eq("horror"));
        assert!(!manager.matches(&indexed, item));
        assert!(manager.matches(&Where::filter(|e| e["id"] == "b1"), item));
    }

    #[test]
    fn test_snapshot_reports_tokenizer() {
        let manager = IndexManager::new(vec![
            IndexDefinition::string("genre"),
            IndexDefinition::text("body"),
        ])
        .unwrap();
        let json = serde_json::to_value(manager.index_snapshots()).unwrap();
        assert!(json[0].get("tokenizer").is_none());
        assert_eq!(json[1]["tokenizer"], "unicode_word");
    }

    #[test]
    fn test_plan_recording_disabled() {
        let mut manager =
            IndexManager::with_config(ManagerConfig::new(vec![IndexDefinition::string("genre")]).without_query_plan())
                .unwrap();
        manager.collect_candidates(Some(&Where::new().field("genre", FieldCondition::eq("x"))));
        assert!(manager.last_query_plan().is_none());
    }

    #[test]
    fn test_custom_id_field() {
        let mut manager = IndexManager::with_config(
            ManagerConfig::new(vec![IndexDefinition::number("n")]).with_id_field("key"),
        )
        .unwrap();
        manager.add(Some(&json!({"key": 7, "n": 1}))).unwrap();
        let result = manager.collect_candidates(Some(&Where::new().field("n", FieldCondition::eq(1))));
        assert_eq!(result.ids().unwrap().iter().next(), Some(&EntityId::from(7)));
        assert_eq!(manager.id_field(), "key");
    }

    #[test]
    fn test_from_json() {
        let mut manager = IndexManager::from_json(&json!({
            "indexes": [{"field": "tags", "type": "text"}]
        }))
        .unwrap();
        assert_eq!(manager.fields(), vec!["tags"]);
        assert_eq!(manager.index_kind("tags"), Some(IndexType::Text));
        assert!(manager.has_index("tags"));
        manager.clear();
    }
}
