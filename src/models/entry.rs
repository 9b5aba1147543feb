//! Word entries and the canonical text fold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CollectionId, OwnerId};

string_id!(
    /// Unique identifier for a word entry.
    EntryId
);

/// Folds a word into its canonical form: trimmed, then lowercased.
///
/// This is the only fold used for storage and duplicate comparison. The
/// record normalizer, the duplicate checker and the `SQLite` store all call it.
///
/// # Examples
///
/// ```
/// use wordvault::canonical_text;
///
/// assert_eq!(canonical_text("  Apple "), "apple");
/// assert_eq!(canonical_text("ÉCOLE"), "école");
/// ```
#[must_use]
pub fn canonical_text(word: &str) -> String {
    word.trim().to_lowercase()
}

/// The user-supplied content of an entry, already normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFields {
    /// Canonical word text.
    pub word: String,
    /// Trimmed definition.
    pub definition: String,
    /// Pronunciation hint, empty when absent.
    pub pronunciation: String,
    /// Usage examples, in order.
    pub examples: Vec<String>,
    /// Category tags. Order carries no meaning.
    pub categories: Vec<String>,
    /// Free-text notes, empty when absent.
    pub notes: String,
}

impl EntryFields {
    /// Creates fields from a word and definition, folding and trimming both.
    #[must_use]
    pub fn new(word: &str, definition: &str) -> Self {
        Self {
            word: canonical_text(word),
            definition: definition.trim().to_string(),
            ..Self::default()
        }
    }

    /// Sets the pronunciation.
    #[must_use]
    pub fn with_pronunciation(mut self, pronunciation: &str) -> Self {
        self.pronunciation = pronunciation.trim().to_string();
        self
    }

    /// Adds an example.
    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Adds a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.trim().to_string();
        self
    }
}

/// A stored word entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier.
    pub id: EntryId,
    /// Owning collection.
    pub collection_id: CollectionId,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Canonical word text.
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
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Creates a new entry in `collection_id` with a generated id.
    #[must_use]
    pub fn create(collection_id: CollectionId, owner_id: OwnerId, fields: EntryFields) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::generate(),
            collection_id,
            owner_id,
            word: fields.word,
            definition: fields.definition,
            pronunciation: fields.pronunciation,
            examples: fields.examples,
            categories: fields.categories,
            notes: fields.notes,
            created_at: now,
            updated_at: now,
        }
    }

}
