//! Exact-match duplicate checker.
//!
//! Detects a duplicate word by comparing canonical text against the entries
//! already stored in the same collection.

use crate::Result;
use crate::models::{CollectionId, EntryId, canonical_text};
use crate::storage::WordStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Checker for an exact canonical-text match within one collection.
///
/// The input is folded with [`canonical_text`] before the lookup, so callers
/// may pass either raw or already normalized words.
///
/// # Example
///
/// ```rust,ignore
/// use wordvault::services::DuplicateChecker;
///
/// let checker = DuplicateChecker::new(store.clone());
/// if checker.exists("Apple", &collection.id, None)? {
///     println!("already in the dictionary");
/// }
/// ```
#[derive(Clone)]
pub struct DuplicateChecker {
    words: Arc<dyn WordStore>,
}

impl DuplicateChecker {
    /// Creates a new duplicate checker over `words`.
    #[must_use]
    pub fn new(words: Arc<dyn WordStore>) -> Self {
        Self { words }
    }

    /// Returns whether `word` already exists in the collection.
    ///
    /// `exclude_id` skips one entry, so an entry being edited does not count
    /// as a duplicate of itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    #[instrument(
        skip(self, word),
        fields(operation = "duplicate_check", collection.id = %collection_id)
    )]
    pub fn exists(
        &self,
        word: &str,
        collection_id: &CollectionId,
        exclude_id: Option<&EntryId>,
    ) -> Result<bool> {
        let start = Instant::now();
        let word = canonical_text(word);
        let found = self.words.exists(&word, collection_id, exclude_id)?;

        metrics::histogram!(
            "deduplication_check_duration_ms",
            "found" => if found { "true" } else { "false" }
        )
        .record(start.elapsed().as_secs_f64() * 1000.0);
        tracing::debug!(word = %word, found, "duplicate check");

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Collection, Entry, EntryFields, OwnerId};
    use crate::storage::{CollectionStore, SqliteStore};

    fn checker_with(words: &[&str]) -> (DuplicateChecker, Collection, Vec<Entry>) {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let collection = Collection::new("Test", OwnerId::new("alice"));
        store.create(&collection).unwrap();
        let entries: Vec<_> = words
            .iter()
            .map(|w| {
                let entry = Entry::create(
                    collection.id.clone(),
                    collection.owner_id.clone(),
                    EntryFields::new(w, "definition"),
                );
                store.insert(&entry).unwrap();
                entry
            })
            .collect();
        (DuplicateChecker::new(store), collection, entries)
    }

    #[test]
    fn test_detects_existing_word_regardless_of_case() {
        let (checker, collection, _) = checker_with(&["apple"]);

        assert!(checker.exists("apple", &collection.id, None).unwrap());
        assert!(checker.exists(" APPLE\t", &collection.id, None).unwrap());
        assert!(!checker.exists("apples", &collection.id, None).unwrap());
    }

    #[test]
    fn test_scoped_to_collection() {
        let (checker, _, _) = checker_with(&["apple"]);
        assert!(
            !checker
                .exists("apple", &CollectionId::new("elsewhere"), None)
                .unwrap()
        );
    }

    #[test]
    fn test_exclude_id_skips_self() {
        let (checker, collection, entries) = checker_with(&["apple"]);
        assert!(
            !checker
                .exists("Apple", &collection.id, Some(&entries[0].id))
                .unwrap()
        );
    }
}
