//! Property-based tests for record accessors, snippets and the page
//! hierarchy.

mod common;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use tokio_test::block_on;

use common::fixture_with_limits;
use mddb_content::core::{PageHierarchy, QuotaGetter};
use mddb_content::error::{ContentError, IntegrityError};
use mddb_content::ids::{PageId, TableId};
use mddb_content::search::{create_snippet, find_ignore_case, truncate};
use mddb_content::types::{DataRecord, PropertyValue, QuotaLimits};

fn arb_value() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        any::<bool>().prop_map(PropertyValue::Bool),
        (-1.0e9f64..1.0e9).prop_map(PropertyValue::Number),
        "[a-z]{0,8}".prop_map(PropertyValue::String),
    ]
}

proptest! {
    #[test]
    fn time_round_trips_at_second_precision(secs in 0i64..4_102_444_800, nanos in 0u32..1_000_000_000) {
        let time = DateTime::<Utc>::from_timestamp(secs, nanos).unwrap();
        let mut record = DataRecord::new(TableId::new("t"));
        record.set_time("due", time);

        let read = record.get_time("due");
        prop_assert_eq!(read.timestamp(), secs);
        prop_assert_eq!(read.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn get_strings_keeps_only_string_elements(items in proptest::collection::vec(arb_value(), 0..12)) {
        let expected: Vec<String> = items
            .iter()
            .filter_map(|v| match v {
                PropertyValue::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect();

        let mut record = DataRecord::new(TableId::new("t"));
        record.set_value("tags", items);
        prop_assert_eq!(record.get_strings("tags"), expected);
    }

    #[test]
    fn typed_accessors_never_panic(value in arb_value()) {
        let mut record = DataRecord::new(TableId::new("t"));
        record.set_value("v", value.clone());

        let _ = record.get_string("v");
        let _ = record.get_number("v");
        let _ = record.get_bool("v");
        let _ = record.get_time("v");
        prop_assert_eq!(record.get_any("v"), Some(&value));
    }

    #[test]
    fn snippet_contains_the_match(
        prefix in "[a-zäöü ]{0,120}",
        needle in "[a-z]{1,6}",
        suffix in "[a-zäöü ]{0,120}",
    ) {
        let text = format!("{}{}{}", prefix, needle.to_uppercase(), suffix);
        let snippet = create_snippet(&text, &needle);
        prop_assert!(find_ignore_case(&snippet, &needle).is_some());
    }

    #[test]
    fn truncate_respects_char_boundaries(text in "\\PC{0,80}", max in 0usize..100) {
        let cut = truncate(&text, max);
        if text.len() <= max {
            prop_assert_eq!(cut, text);
        } else {
            prop_assert!(cut.ends_with("..."));
            prop_assert!(cut.len() <= max + 3);
        }
    }
}

fn parent_map(pages: &[mddb_content::types::Page]) -> HashMap<PageId, Option<PageId>> {
    pages
        .iter()
        .map(|p| (p.id.clone(), p.parent_id.clone()))
        .collect()
}

fn is_acyclic(parents: &HashMap<PageId, Option<PageId>>) -> bool {
    parents.keys().all(|start| {
        let mut seen = HashSet::new();
        let mut current = Some(start.clone());
        while let Some(id) = current {
            if !seen.insert(id.clone()) {
                return false;
            }
            current = parents.get(&id).cloned().flatten();
        }
        true
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_moves_keep_hierarchy_acyclic(
        moves in proptest::collection::vec((0usize..6, proptest::option::of(0usize..6)), 1..40)
    ) {
        block_on(async {
            let f = fixture_with_limits(QuotaLimits::unlimited()).await;
            let mut ids = Vec::new();
            for i in 0..6 {
                ids.push(f.page(&format!("p{}", i), None).await);
            }

            for (page, parent) in moves {
                let before = parent_map(&f.store.list_pages(&f.ctx, f.ws()).await.unwrap());
                let parent_id = parent.map(|i| ids[i].clone());
                let result = f
                    .store
                    .move_page(&f.ctx, f.ws(), &ids[page], parent_id.as_ref())
                    .await;
                let after = parent_map(&f.store.list_pages(&f.ctx, f.ws()).await.unwrap());

                match result {
                    Ok(moved) => assert_eq!(moved.parent_id, parent_id),
                    Err(ContentError::Integrity(IntegrityError::CycleDetected { .. })) => {
                        assert_eq!(before, after);
                    }
                    Err(other) => panic!("unexpected error: {}", other),
                }
                assert!(is_acyclic(&after));
            }

            let quota = f.store.get_quota(&f.ctx, &f.org.id).await.unwrap();
            assert_eq!(quota.usage.page_count, 6);
        });
    }
}
