//! Row conversion for entries and collections.
//!
//! Lists (examples, categories) are stored as JSON arrays and timestamps as
//! RFC 3339 strings with nanosecond precision, which sort lexicographically.

use crate::models::{Collection, CollectionId, Entry, EntryId, OwnerId};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};

/// Column list selected for entries, in [`EntryRow::from_row`] order.
pub const ENTRY_COLUMNS: &str = "id, collection_id, owner_id, word, definition, pronunciation, \
     examples, categories, notes, created_at, updated_at";

/// Column list selected for collections, in [`CollectionRow::from_row`] order.
pub const COLLECTION_COLUMNS: &str =
    "id, name, description, owner_id, created_at, updated_at, word_count";

/// Raw `words` row as stored in the database.
#[derive(Debug)]
pub struct EntryRow {
    id: String,
    collection_id: String,
    owner_id: String,
    word: String,
    definition: String,
    pronunciation: String,
    examples: String,
    categories: String,
    notes: String,
    created_at: String,
    updated_at: String,
}

impl EntryRow {
    /// Reads a row selected with [`ENTRY_COLUMNS`].
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            collection_id: row.get(1)?,
            owner_id: row.get(2)?,
            word: row.get(3)?,
            definition: row.get(4)?,
            pronunciation: row.get(5)?,
            examples: row.get(6)?,
            categories: row.get(7)?,
            notes: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    /// Converts the row into an [`Entry`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if a list column is not a JSON
    /// string array or a timestamp is not RFC 3339.
    pub fn into_entry(self) -> Result<Entry> {
        Ok(Entry {
            id: EntryId::new(self.id),
            collection_id: CollectionId::new(self.collection_id),
            owner_id: OwnerId::new(self.owner_id),
            word: self.word,
            definition: self.definition,
            pronunciation: self.pronunciation,
            examples: decode_list(&self.examples)?,
            categories: decode_list(&self.categories)?,
            notes: self.notes,
            created_at: decode_timestamp(&self.created_at)?,
            updated_at: decode_timestamp(&self.updated_at)?,
        })
    }
}

/// Raw `collections` row as stored in the database.
#[derive(Debug)]
pub struct CollectionRow {
    id: String,
    name: String,
    description: String,
    owner_id: String,
    created_at: String,
    updated_at: String,
    word_count: i64,
}

impl CollectionRow {
    /// Reads a row selected with [`COLLECTION_COLUMNS`].
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            owner_id: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
            word_count: row.get(6)?,
        })
    }

    /// Converts the row into a [`Collection`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if a timestamp is not RFC 3339.
    pub fn into_collection(self) -> Result<Collection> {
        Ok(Collection {
            id: CollectionId::new(self.id),
            name: self.name,
            description: self.description,
            owner_id: OwnerId::new(self.owner_id),
            created_at: decode_timestamp(&self.created_at)?,
            updated_at: decode_timestamp(&self.updated_at)?,
            word_count: usize::try_from(self.word_count).unwrap_or(0),
        })
    }
}

/// Encodes a string list column.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if serialization fails.
pub fn encode_list(values: &[String]) -> Result<String> {
    serde_json::to_string(values).map_err(|e| Error::operation("encode_list", e))
}

fn decode_list(raw: &str) -> Result<Vec<String>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|e| Error::operation("decode_list", e))
}

/// Encodes a timestamp column.
#[must_use]
pub fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::operation("decode_timestamp", format!("{raw}: {e}")))
}
