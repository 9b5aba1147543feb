//! Batch import orchestration.
//!
//! A batch is validate, then import, then exactly one reconciliation of the
//! collection's cached entry count.

use super::import::{ImportResult, ImportService, ImportTarget};
use crate::io::formats::Format;
use crate::io::validation::FormatValidator;
use crate::models::Collection;
use crate::storage::{CollectionStore, WordStore};
use std::sync::Arc;
use tracing::instrument;

/// Outcome of a batch import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The payload failed structural validation; nothing was imported.
    ValidationFailed {
        /// Validation errors, in check order.
        errors: Vec<String>,
    },
    /// The import ran.
    Completed {
        /// Per-record counts and errors.
        result: ImportResult,
        /// Entry count after reconciliation, or `None` if reconciling failed.
        reconciled_count: Option<usize>,
    },
}

impl BatchOutcome {
    /// Returns the import result, if the import ran.
    #[must_use]
    pub const fn result(&self) -> Option<&ImportResult> {
        match self {
            Self::ValidationFailed { .. } => None,
            Self::Completed { result, .. } => Some(result),
        }
    }
}

/// Runs whole import batches against one pair of stores.
pub struct BatchImporter {
    validator: FormatValidator,
    importer: ImportService,
    collections: Arc<dyn CollectionStore>,
}

impl BatchImporter {
    /// Creates a batch importer.
    #[must_use]
    pub fn new(words: Arc<dyn WordStore>, collections: Arc<dyn CollectionStore>) -> Self {
        Self {
            validator: FormatValidator::new(),
            importer: ImportService::new(words),
            collections,
        }
    }

    /// Validates and imports `payload` into `collection`, then reconciles
    /// its cached entry count once.
    ///
    /// A failed reconciliation is logged and reported as
    /// `reconciled_count: None`; the import result is still returned.
    #[instrument(skip(self, payload, collection), fields(format = %format, collection.id = %collection.id))]
    pub fn run(&self, payload: &str, format: Format, collection: &Collection) -> BatchOutcome {
        let report = self.validator.validate(payload, format);
        if !report.is_valid {
            tracing::info!(errors = report.errors.len(), "payload failed validation");
            return BatchOutcome::ValidationFailed {
                errors: report.errors,
            };
        }

        let result = self
            .importer
            .import(payload, format, &ImportTarget::from(collection));

        let reconciled_count = match self.collections.recount_entries(&collection.id) {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::error!(error = %e, "failed to reconcile word count");
                None
            },
        };

        BatchOutcome::Completed {
            result,
            reconciled_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CollectionId, OwnerId};
    use crate::storage::SqliteStore;
    use crate::{Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Collection store that counts reconciliations and can fail them.
    struct CountingCollections {
        recounts: AtomicUsize,
        fail: bool,
    }

    impl CountingCollections {
        fn new(fail: bool) -> Self {
            Self {
                recounts: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl CollectionStore for CountingCollections {
        fn create(&self, _: &Collection) -> Result<bool> {
            Ok(true)
        }

        fn get(&self, _: &CollectionId) -> Result<Option<Collection>> {
            Ok(None)
        }

        fn find_by_name(&self, _: &OwnerId, _: &str) -> Result<Option<Collection>> {
            Ok(None)
        }

        fn list_by_owner(&self, _: &OwnerId) -> Result<Vec<Collection>> {
            Ok(Vec::new())
        }

        fn recount_entries(&self, _: &CollectionId) -> Result<usize> {
            self.recounts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::operation("recount_entries", "connection lost"))
            } else {
                Ok(42)
            }
        }
    }

    fn setup(fail: bool) -> (BatchImporter, Arc<CountingCollections>, Collection) {
        let words = Arc::new(SqliteStore::in_memory().unwrap());
        let collection = Collection::new("Test", OwnerId::new("alice"));
        words.create(&collection).unwrap();
        let collections = Arc::new(CountingCollections::new(fail));
        let batch = BatchImporter::new(words, collections.clone());
        (batch, collections, collection)
    }

    #[test]
    fn test_reconciles_exactly_once_per_batch() {
        let (batch, collections, collection) = setup(false);
        let payload = r#"{"words": [
            {"word": "a", "definition": "1"},
            {"word": "b", "definition": "2"},
            {"word": "a", "definition": "dup"}
        ]}"#;

        let outcome = batch.run(payload, Format::Json, &collection);
        assert_eq!(collections.recounts.load(Ordering::SeqCst), 1);
        let BatchOutcome::Completed {
            result,
            reconciled_count,
        } = outcome
        else {
            unreachable!("payload is structurally valid");
        };
        assert_eq!(result.success_count, 2);
        assert_eq!(result.error_count, 1);
        assert_eq!(reconciled_count, Some(42));
    }

    #[test]
    fn test_invalid_payload_skips_import_and_reconcile() {
        let (batch, collections, collection) = setup(false);

        let outcome = batch.run("word,meaning\na,b\n", Format::Csv, &collection);
        assert_eq!(
            outcome,
            BatchOutcome::ValidationFailed {
                errors: vec![
                    "CSV must contain 'word' and 'definition' columns (missing: definition)"
                        .to_string()
                ]
            }
        );
        assert!(outcome.result().is_none());
        assert_eq!(collections.recounts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reconcile_failure_keeps_import_result() {
        let (batch, collections, collection) = setup(true);

        let outcome = batch.run(
            "word,definition\nuno,one\n",
            Format::Csv,
            &collection,
        );
        assert_eq!(collections.recounts.load(Ordering::SeqCst), 1);
        assert!(matches!(
            outcome,
            BatchOutcome::Completed {
                reconciled_count: None,
                ..
            }
        ));
        assert_eq!(outcome.result().map(|r| r.success_count), Some(1));
    }

    #[test]
    fn test_sqlite_reconciliation_matches_stored_entries() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let collection = Collection::new("Real", OwnerId::new("alice"));
        store.create(&collection).unwrap();
        let batch = BatchImporter::new(store.clone(), store.clone());

        let outcome = batch.run(
            "word,definition\nuno,one\ndos,two\nUNO,again\n",
            Format::Csv,
            &collection,
        );
        assert!(matches!(
            outcome,
            BatchOutcome::Completed {
                reconciled_count: Some(2),
                ..
            }
        ));
        assert_eq!(store.get(&collection.id).unwrap().unwrap().word_count, 2);
    }
}
