//! Index Property Tests
//!
//! Randomized checks against direct evaluation:
//! - Superset results never miss a true match
//! - Exact results equal the true matches
//! - Ordered traversal is monotonic
//! - Bounded edit distance agrees with the unbounded one
//! - Fuzzy text search admits exactly the tokens within the edit bound

use entity_index::index::{
    bounded_levenshtein, CandidateResult, EntityId, Exactness, FieldCondition, IdSet,
    IndexDefinition, IndexManager, IndexOptions, RangeCondition, SortDirection, TraversalOptions,
    Where,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn entities(field: &str, values: &[Value]) -> Vec<Value> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| json!({ "id": i as i64, field: v }))
        .collect()
}

fn matching(items: &[Value], predicate: &Where) -> IdSet {
    items
        .iter()
        .filter(|item| predicate.matches(item))
        .filter_map(|item| EntityId::of(item, "id").ok())
        .collect()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for i in 1..=a.len() {
        let mut row = vec![i; b.len() + 1];
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            row[j] = (prev[j] + 1).min(row[j - 1] + 1).min(prev[j - 1] + cost);
        }
        prev = row;
    }
    prev[b.len()]
}

fn arb_names() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec("[abcAB ]{0,10}".prop_map(Value::from), 0..12)
}

fn arb_numbers() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec((-50i64..50).prop_map(Value::from), 0..16)
}

proptest! {
    #[test]
    fn substring_contains_never_misses(names in arb_names(), needle in "[abc]{3,5}") {
        let items = entities("name", &names);
        let mut manager = IndexManager::new(vec![IndexDefinition::substring("name")]).unwrap();
        manager.rebuild(&items).unwrap();

        let predicate = Where::new().field("name", FieldCondition::contains(needle));
        let expected = matching(&items, &predicate);
        match manager.collect_candidates(Some(&predicate)) {
            CandidateResult::Candidates { ids, exactness } => {
                prop_assert_eq!(exactness, Exactness::Superset);
                prop_assert!(expected.is_subset(&ids));
            }
            CandidateResult::Empty => prop_assert!(expected.is_empty()),
            CandidateResult::Unsupported => prop_assert!(false, "needle is long enough"),
        }
    }

    #[test]
    fn substring_affixes_are_exact(names in arb_names(), affix in "[abAB]{1,3}") {
        let items = entities("name", &names);
        let mut manager = IndexManager::new(vec![IndexDefinition::substring("name")]).unwrap();
        manager.rebuild(&items).unwrap();

        for condition in [
            FieldCondition::starts_with(affix.clone()),
            FieldCondition::ends_with(affix.clone()),
        ] {
            let predicate = Where::new().field("name", condition);
            let expected = matching(&items, &predicate);
            let result = manager.collect_candidates(Some(&predicate));
            prop_assert_eq!(result, CandidateResult::exact(expected));
        }
    }

    #[test]
    fn number_range_is_exact(values in arb_numbers(), low in -60i64..60, span in 0i64..40) {
        let items = entities("n", &values);
        let mut manager = IndexManager::new(vec![IndexDefinition::number("n")]).unwrap();
        manager.rebuild(&items).unwrap();

        for range in [
            RangeCondition::default().gte(low).lt(low + span),
            RangeCondition::default().gt(low).lte(low + span),
            RangeCondition::default().gt(low),
            RangeCondition::default().lte(low),
        ] {
            let predicate = Where::new().field("n", FieldCondition::range(range));
            let expected = matching(&items, &predicate);
            let result = manager.collect_candidates(Some(&predicate));
            prop_assert_eq!(result, CandidateResult::exact(expected));
        }
    }

    #[test]
    fn ordered_traversal_is_monotonic(values in arb_numbers(), offset in 0usize..4) {
        let items = entities("n", &values);
        let mut manager = IndexManager::new(vec![IndexDefinition::number("n")]).unwrap();
        manager.rebuild(&items).unwrap();

        let value_of = |id: &EntityId| match id {
            EntityId::Int(i) => values[*i as usize].as_i64().unwrap(),
            EntityId::Str(_) => unreachable!(),
        };

        let asc = manager
            .ordered_keys("n", SortDirection::Asc, TraversalOptions::default())
            .unwrap();
        prop_assert_eq!(asc.len(), values.len());
        prop_assert!(asc.windows(2).all(|w| value_of(&w[0]) <= value_of(&w[1])));

        let desc = manager
            .ordered_keys("n", SortDirection::Desc, TraversalOptions { offset, ..Default::default() })
            .unwrap();
        prop_assert_eq!(desc.len(), values.len().saturating_sub(offset));
        prop_assert!(desc.windows(2).all(|w| value_of(&w[0]) >= value_of(&w[1])));
    }

    #[test]
    fn bounded_distance_agrees(a in "[abc]{0,8}", b in "[abc]{0,8}", max in 0usize..3) {
        let full = levenshtein(&a, &b);
        let bounded = bounded_levenshtein(&a, &b, max);
        if full <= max {
            prop_assert_eq!(bounded, Some(full));
        } else {
            prop_assert_eq!(bounded, None);
        }
    }

    #[test]
    fn text_fuzzy_search_respects_distance(
        words in prop::collection::vec("[ab]{3,5}", 1..10),
        query in "[ab]{3,5}",
        distance in 0usize..3,
    ) {
        let values: Vec<Value> = words.iter().map(|w| Value::from(w.as_str())).collect();
        let items = entities("body", &values);
        let mut manager = IndexManager::new(vec![IndexDefinition::text("body")
            .with_options(IndexOptions::default().fuzzy_distance(distance))])
        .unwrap();
        manager.rebuild(&items).unwrap();

        // an exact hit is used as-is; only a miss expands fuzzily
        let exact_hit = words.contains(&query);
        let expected: IdSet = words
            .iter()
            .enumerate()
            .filter(|(_, w)| {
                if exact_hit {
                    **w == query
                } else {
                    levenshtein(w, &query) <= distance
                }
            })
            .map(|(i, _)| EntityId::from(i as i64))
            .collect();

        let predicate = Where::new().field("body", FieldCondition::contains(query.clone()));
        let result = manager.collect_candidates(Some(&predicate));
        if expected.is_empty() {
            prop_assert_eq!(result, CandidateResult::Empty);
        } else {
            prop_assert_eq!(result, CandidateResult::superset(expected));
        }
    }

    #[test]
    fn text_token_search_finds_source(words in prop::collection::vec("[a-e]{3,6}", 1..6)) {
        let text = words.join(" ");
        let mut manager = IndexManager::new(vec![IndexDefinition::text("body")
            .with_options(IndexOptions::default().fuzzy_distance(0))])
        .unwrap();
        manager.add(Some(&json!({"id": 1, "body": text}))).unwrap();

        for word in &words {
            let predicate = Where::new().field("body", FieldCondition::eq(word.as_str()));
            let result = manager.collect_candidates(Some(&predicate));
            prop_assert!(result.ids().is_some_and(|ids| ids.contains(&EntityId::from(1))));
        }
    }
}
