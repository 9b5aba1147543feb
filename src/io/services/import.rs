//! Word import service.
//!
//! Runs every record of a payload through normalize, duplicate check and
//! insert, collecting one outcome per record. A bad record never stops the
//! batch.

use crate::io::formats::{Format, create_import_source};
use crate::io::normalize::normalize;
use crate::io::traits::{PayloadError, RawRecord, Rejection};
use crate::models::{Collection, CollectionId, Entry, OwnerId};
use crate::services::DuplicateChecker;
use crate::storage::WordStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Number of error messages shown to a user after an import.
pub const MAX_DISPLAYED_ERRORS: usize = 10;

/// The collection an import writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    /// Destination collection.
    pub collection_id: CollectionId,
    /// Owner stamped on every imported entry.
    pub owner_id: OwnerId,
}

impl From<&Collection> for ImportTarget {
    fn from(collection: &Collection) -> Self {
        Self {
            collection_id: collection.id.clone(),
            owner_id: collection.owner_id.clone(),
        }
    }
}

/// Outcome of importing a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The record was stored under this canonical word.
    Imported {
        /// Canonical word.
        word: String,
    },
    /// The record was not stored.
    Rejected(Rejection),
}

impl RecordOutcome {
    /// Returns the metrics label for this outcome.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Imported { .. } => "imported",
            Self::Rejected(rejection) => rejection.label(),
        }
    }
}

/// Result of an import operation.
///
/// `success_count + error_count` equals the number of records in the
/// payload, or is `0 + 1` when the payload could not be read at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    /// Records stored.
    pub success_count: usize,
    /// Records rejected.
    pub error_count: usize,
    /// One message per rejected record, in input order.
    pub errors: Vec<String>,
}

impl ImportResult {
    /// Creates an empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            success_count: 0,
            error_count: 0,
            errors: Vec::new(),
        }
    }

    /// Builds the result for a payload that could not be read.
    #[must_use]
    pub fn from_payload_error(error: &PayloadError) -> Self {
        Self {
            success_count: 0,
            error_count: 1,
            errors: vec![error.to_string()],
        }
    }

    /// Accumulates the outcome of the record at `position`.
    pub fn record(&mut self, position: usize, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Imported { .. } => self.success_count += 1,
            RecordOutcome::Rejected(rejection) => {
                self.error_count += 1;
                self.errors.push(format!("Row {position}: {rejection}"));
            },
        }
    }

    /// Returns the errors meant for display.
    #[must_use]
    pub fn displayed_errors(&self) -> &[String] {
        &self.errors[..self.errors.len().min(MAX_DISPLAYED_ERRORS)]
    }

    /// Returns how many errors [`Self::displayed_errors`] leaves out.
    #[must_use]
    pub fn hidden_error_count(&self) -> usize {
        self.errors.len().saturating_sub(MAX_DISPLAYED_ERRORS)
    }

    /// Returns whether any record was rejected.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Service for importing words into a collection.
///
/// Does not validate the payload up front and does not reconcile the
/// collection's cached count. Both are the caller's job; see
/// [`BatchImporter`](super::batch::BatchImporter).
#[derive(Clone)]
pub struct ImportService {
    words: Arc<dyn WordStore>,
    duplicates: DuplicateChecker,
}

impl ImportService {
    /// Creates a new import service.
    #[must_use]
    pub fn new(words: Arc<dyn WordStore>) -> Self {
        Self {
            duplicates: DuplicateChecker::new(Arc::clone(&words)),
            words,
        }
    }

    /// Imports every record of `payload` into `target`.
    #[instrument(
        skip(self, payload, format, target),
        fields(format = %format, collection.id = %target.collection_id, payload_len = payload.len())
    )]
    pub fn import(&self, payload: &str, format: Format, target: &ImportTarget) -> ImportResult {
        let mut source = match create_import_source(payload, format) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(error = %e, "import payload rejected");
                return ImportResult::from_payload_error(&e);
            },
        };

        if let Some(expected) = source.size_hint() {
            tracing::debug!(expected, "importing records");
        }

        let mut result = ImportResult::new();
        let mut position = source.first_position();
        while let Some(raw) = source.next() {
            let outcome = self.import_record(raw, target);
            metrics::counter!("import_records_total", "outcome" => outcome.label()).increment(1);
            if let RecordOutcome::Rejected(rejection) = &outcome {
                tracing::debug!(position, reason = %rejection, "record rejected");
            }
            result.record(position, outcome);
            position += 1;
        }

        tracing::info!(
            imported = result.success_count,
            rejected = result.error_count,
            "import finished"
        );
        result
    }

    /// Runs one record through normalize, duplicate check and insert.
    pub fn import_record(&self, raw: RawRecord, target: &ImportTarget) -> RecordOutcome {
        let fields = match raw.and_then(|record| normalize(&record)) {
            Ok(fields) => fields,
            Err(rejection) => return RecordOutcome::Rejected(rejection),
        };

        match self
            .duplicates
            .exists(&fields.word, &target.collection_id, None)
        {
            Ok(false) => {},
            Ok(true) => {
                return RecordOutcome::Rejected(Rejection::Duplicate { word: fields.word });
            },
            Err(e) => {
                return RecordOutcome::Rejected(Rejection::LookupFailed {
                    word: fields.word,
                    cause: e.to_string(),
                });
            },
        }

        let entry = Entry::create(
            target.collection_id.clone(),
            target.owner_id.clone(),
            fields,
        );
        match self.words.insert(&entry) {
            Ok(true) => RecordOutcome::Imported { word: entry.word },
            Ok(false) => RecordOutcome::Rejected(Rejection::SaveFailed { word: entry.word }),
            Err(e) => {
                tracing::warn!(word = %entry.word, error = %e, "failed to save word");
                RecordOutcome::Rejected(Rejection::SaveFailed { word: entry.word })
            },
        }
    }
}
