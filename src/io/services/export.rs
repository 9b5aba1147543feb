//! Collection export service.
//!
//! Serializes a collection and all of its entries into JSON or CSV.

use crate::io::formats::{Format, create_export_sink};
use crate::io::traits::{DictionaryMeta, ExportedEntry};
use crate::models::Collection;
use crate::storage::{EntrySort, WordStore};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Service for exporting collections to external formats.
#[derive(Clone)]
pub struct ExportService {
    words: Arc<dyn WordStore>,
}

impl ExportService {
    /// Creates a new export service.
    #[must_use]
    pub fn new(words: Arc<dyn WordStore>) -> Self {
        Self { words }
    }

    /// Exports `collection` as a string.
    ///
    /// Any failure is logged and yields an empty string. Use
    /// [`Self::try_export`] to get the error instead.
    #[instrument(skip(self, collection), fields(collection.id = %collection.id, format = %format))]
    pub fn export(&self, collection: &Collection, format: Format) -> String {
        let start = Instant::now();
        let (output, status) = match self.try_export(collection, format) {
            Ok(output) => (output, "success"),
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                (String::new(), "error")
            },
        };

        metrics::counter!("export_operations_total", "format" => format.extension(), "status" => status)
            .increment(1);
        metrics::histogram!("export_duration_ms", "format" => format.extension())
            .record(start.elapsed().as_secs_f64() * 1000.0);
        output
    }

    /// Exports `collection` as a string, returning any error.
    ///
    /// Entries are written in the order the store returns them, ascending by
    /// canonical word. The metadata `word_count` is the number of entries
    /// actually exported, not the cached count.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries cannot be loaded or serialized.
    pub fn try_export(&self, collection: &Collection, format: Format) -> Result<String> {
        let entries = self
            .words
            .find_by_collection(&collection.id, EntrySort::CanonicalTextAsc)?;
        let meta = DictionaryMeta::new(collection, entries.len());

        let mut buffer = Vec::new();
        let mut sink = create_export_sink(&mut buffer, format);
        sink.begin(&meta)?;
        for entry in &entries {
            sink.write(&ExportedEntry::from(entry))?;
        }
        sink.finalize()?;

        tracing::debug!(exported = entries.len(), "export serialized");
        String::from_utf8(buffer).map_err(|e| Error::operation("export_utf8", e))
    }
}
