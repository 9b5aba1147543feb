//! Property-based tests for the import pipeline.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Distinct well-formed records all import
//! - Records missing a word or definition are always rejected
//! - Every record yields exactly one outcome
//! - The canonical fold is idempotent

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{Value, json};
use wordvault::io::{Format, ImportRecord, ImportService, ImportTarget, Rejection, normalize};
use wordvault::storage::{CollectionStore, EntrySort, SqliteStore, WordStore};
use wordvault::{Collection, OwnerId, canonical_text};

fn fresh() -> (Arc<SqliteStore>, Collection) {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let collection = Collection::new("props", OwnerId::new("prop"));
    store.create(&collection).unwrap();
    (store, collection)
}

/// A required field that is absent, blank, or not a string.
fn unusable_field() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        "[ \t]{0,4}".prop_map(|s| Some(Value::String(s))),
        any::<i64>().prop_map(|n| Some(json!(n))),
        Just(Some(Value::Null)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: N distinct well-formed JSON records give N successes.
    #[test]
    fn prop_unique_records_all_import(words in prop::collection::btree_set("[a-z]{1,12}", 1..25)) {
        let (store, collection) = fresh();
        let records: Vec<Value> = words
            .iter()
            .map(|w| json!({"word": w, "definition": format!("meaning of {w}")}))
            .collect();
        let payload = json!({ "words": records }).to_string();

        let result = ImportService::new(store.clone())
            .import(&payload, Format::Json, &ImportTarget::from(&collection));

        prop_assert_eq!(result.success_count, words.len());
        prop_assert_eq!(result.error_count, 0);
        let stored: BTreeSet<String> = store
            .find_by_collection(&collection.id, EntrySort::CanonicalTextAsc)
            .unwrap()
            .into_iter()
            .map(|e| e.word)
            .collect();
        prop_assert_eq!(stored, words);
    }

    /// Property: an unusable word or definition is always rejected.
    #[test]
    fn prop_unusable_required_field_rejected(
        field in unusable_field(),
        good in "[a-z]{1,10}",
        break_word in any::<bool>(),
    ) {
        let mut record = ImportRecord::new(Format::Json);
        let (broken, kept) = if break_word { ("word", "definition") } else { ("definition", "word") };
        record = record.with_field(kept, good);
        if let Some(value) = field {
            record = record.with_field(broken, value);
        }

        let rejection = normalize(&record).unwrap_err();
        let expected_kind = matches!(
            rejection,
            Rejection::MissingFields | Rejection::EmptyFields | Rejection::NotAString { .. }
        );
        prop_assert!(expected_kind);
    }

    /// Property: rejected CSV rows are never persisted, and every row is reported.
    #[test]
    fn prop_every_row_has_one_outcome(rows in prop::collection::vec(("[a-zA-Z ]{0,6}", "[a-z ]{0,6}"), 1..20)) {
        let (store, collection) = fresh();
        let mut payload = String::from("word,definition\n");
        for (word, definition) in &rows {
            payload.push_str(&format!("{word},{definition}\n"));
        }

        let result = ImportService::new(store.clone())
            .import(&payload, Format::Csv, &ImportTarget::from(&collection));

        prop_assert_eq!(result.success_count + result.error_count, rows.len());
        prop_assert_eq!(result.errors.len(), result.error_count);
        let stored = store
            .find_by_collection(&collection.id, EntrySort::CanonicalTextAsc)
            .unwrap();
        prop_assert_eq!(stored.len(), result.success_count);
        prop_assert!(stored.iter().all(|e| !e.word.is_empty() && !e.definition.is_empty()));
    }

    /// Property: folding twice equals folding once.
    #[test]
    fn prop_canonical_text_idempotent(s in "\\PC{0,40}") {
        let once = canonical_text(&s);
        prop_assert_eq!(canonical_text(&once), once.clone());
        prop_assert_eq!(once.trim(), once.as_str());
    }
}
