//! Core traits and record types for import/export.
//!
//! Defines the [`ImportSource`] and [`ExportSink`] traits that format adapters
//! implement, plus the transient records that flow between the adapters, the
//! normalizer and the services.

use super::formats::Format;
use crate::Result;
use crate::models::{Collection, Entry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// One raw record read from an import payload.
///
/// Field values are untrusted. JSON records keep their original value types;
/// CSV cells are always [`Value::String`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRecord {
    /// Format the record was read from. Decides how list fields are parsed.
    pub source: Format,
    /// Raw field map keyed by field name.
    pub fields: BTreeMap<String, Value>,
}

impl ImportRecord {
    /// Creates an empty record for `source`.
    #[must_use]
    pub const fn new(source: Format) -> Self {
        Self {
            source,
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns a raw field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Why a single record was not imported.
///
/// The display text is the user-facing reason; the importer prefixes it with
/// the record position.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Rejection {
    /// `word` or `definition` is absent.
    #[error("Missing required fields (word, definition)")]
    MissingFields,

    /// `word` or `definition` is empty after trimming.
    #[error("Word and definition cannot be empty")]
    EmptyFields,

    /// A required field holds a non-string JSON value.
    #[error("Field '{field}' must be a string")]
    NotAString {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A JSON list element is not an object.
    #[error("Record is not an object")]
    NotAnObject,

    /// The record could not be read from the payload.
    #[error("{0}")]
    Malformed(String),

    /// The canonical word is already present in the collection.
    #[error("Word '{word}' already exists")]
    Duplicate {
        /// Canonical word.
        word: String,
    },

    /// The duplicate lookup itself failed.
    #[error("Failed to check word '{word}': {cause}")]
    LookupFailed {
        /// Canonical word.
        word: String,
        /// Underlying store error.
        cause: String,
    },

    /// The store refused or failed the insert.
    #[error("Failed to save word '{word}'")]
    SaveFailed {
        /// Canonical word.
        word: String,
    },
}

impl Rejection {
    /// Returns a short label used for metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingFields | Self::EmptyFields | Self::NotAString { .. } => "invalid",
            Self::NotAnObject | Self::Malformed(_) => "malformed",
            Self::Duplicate { .. } => "duplicate",
            Self::LookupFailed { .. } => "lookup_failed",
            Self::SaveFailed { .. } => "save_failed",
        }
    }
}

/// A record as yielded by an [`ImportSource`]: parsed, or already rejected.
pub type RawRecord = std::result::Result<ImportRecord, Rejection>;

/// A failure that prevents reading any record from a payload.
///
/// Converted by the importer into a single error with zero successes.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum PayloadError {
    /// The payload is not valid JSON.
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),

    /// The top-level JSON value is not an object.
    #[error("Invalid JSON format: expected an object at the top level")]
    NotAnObject,

    /// The JSON object has no `words` key.
    #[error("Invalid JSON format: 'words' key not found")]
    WordsKeyMissing,

    /// `words` is not a list.
    #[error("Invalid JSON format: 'words' should be a list")]
    WordsNotList,

    /// The CSV header could not be read.
    #[error("CSV parsing error: {0}")]
    Csv(String),

    /// The CSV header lacks `word` or `definition`.
    #[error("Missing required columns: word, definition")]
    MissingColumns,
}

/// Source of import records.
///
/// Implementations yield one record per input element, in input order, and
/// never stop early on a bad record. A bad record is yielded as a
/// [`Rejection`] so that it still occupies its position.
pub trait ImportSource {
    /// Reads the next record. Returns `None` when the source is exhausted.
    fn next(&mut self) -> Option<RawRecord>;

    /// Position reported for the first record.
    ///
    /// CSV sources return 2 because the header occupies row 1.
    fn first_position(&self) -> usize {
        1
    }

    /// Returns the number of records, if known up front.
    fn size_hint(&self) -> Option<usize> {
        None
    }
}

/// Collection metadata written at the top of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryMeta {
    /// Collection name.
    pub name: String,
    /// Collection description.
    pub description: String,
    /// Collection creation time.
    pub created_at: DateTime<Utc>,
    /// Number of exported entries, counted live.
    pub word_count: usize,
}

impl DictionaryMeta {
    /// Builds metadata for `collection` with `word_count` exported entries.
    #[must_use]
    pub fn new(collection: &Collection, word_count: usize) -> Self {
        Self {
            name: collection.name.clone(),
            description: collection.description.clone(),
            created_at: collection.created_at,
            word_count,
        }
    }
}

/// Entry projection for export.
///
/// Excludes ids, ownership and the update timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedEntry {
    /// Canonical word.
    pub word: String,
    /// Definition.
    pub definition: String,
    /// Pronunciation hint.
    pub pronunciation: String,
    /// Usage examples, in order.
    pub examples: Vec<String>,
    /// Category tags.
    pub categories: Vec<String>,
    /// Free-text notes.
    pub notes: String,
    /// Entry creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Entry> for ExportedEntry {
    fn from(entry: &Entry) -> Self {
        Self {
            word: entry.word.clone(),
            definition: entry.definition.clone(),
            pronunciation: entry.pronunciation.clone(),
            examples: entry.examples.clone(),
            categories: entry.categories.clone(),
            notes: entry.notes.clone(),
            created_at: entry.created_at,
        }
    }
}

/// The full JSON export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Collection metadata.
    pub dictionary: DictionaryMeta,
    /// Exported entries in store order.
    pub words: Vec<ExportedEntry>,
}

/// Sink for exported entries.
///
/// # Lifecycle
///
/// 1. Call `begin()` once with the collection metadata
/// 2. Call `write()` for each entry
/// 3. Call `finalize()` to complete the export
pub trait ExportSink {
    /// Starts the export.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or I/O fails.
    fn begin(&mut self, meta: &DictionaryMeta) -> Result<()>;

    /// Writes a single entry to the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or I/O fails.
    fn write(&mut self, entry: &ExportedEntry) -> Result<()>;

    /// Finalizes the export, writing any footers and flushing buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if I/O fails.
    fn finalize(self: Box<Self>) -> Result<()>;
}
