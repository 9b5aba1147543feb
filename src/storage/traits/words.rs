//! Word store trait.
//!
//! The word store is the authoritative source of entries. The import/export
//! pipeline depends only on this trait, never on a concrete backend.
//!
//! # Uniqueness
//!
//! Implementations must enforce that no two entries in one collection share
//! a canonical word. A conflicting [`WordStore::insert`] returns `Ok(false)`
//! rather than an error, so a race between two concurrent imports surfaces
//! as an ordinary rejected record.

use crate::Result;
use crate::models::{CollectionId, Entry, EntryId, canonical_text};

/// Ordering applied by [`WordStore::find_by_collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntrySort {
    /// Canonical word, ascending.
    #[default]
    CanonicalTextAsc,
    /// Creation time, oldest first.
    CreatedAtAsc,
}

impl EntrySort {
    /// Parses a sort name.
    ///
    /// Returns `None` if the name is not recognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "word" | "text" | "alpha" => Some(Self::CanonicalTextAsc),
            "created" | "created_at" | "date" => Some(Self::CreatedAtAsc),
            _ => None,
        }
    }
}

/// Which entry fields a search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    /// Match the word only.
    #[default]
    Word,
    /// Match the definition only.
    Definition,
    /// Match either the word or the definition.
    Both,
}

impl SearchField {
    /// Parses a search field name.
    ///
    /// Returns `None` if the name is not recognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "word" => Some(Self::Word),
            "definition" | "def" => Some(Self::Definition),
            "both" | "all" => Some(Self::Both),
            _ => None,
        }
    }

    /// Returns whether `entry` matches an already folded `needle`.
    #[must_use]
    pub fn matches(self, entry: &Entry, needle: &str) -> bool {
        let in_word = || entry.word.contains(needle);
        let in_definition = || entry.definition.to_lowercase().contains(needle);
        match self {
            Self::Word => in_word(),
            Self::Definition => in_definition(),
            Self::Both => in_word() || in_definition(),
        }
    }
}

/// Trait for word entry storage.
///
/// # Implementor Notes
///
/// - Methods use `&self` to enable sharing via `Arc<dyn WordStore>`
/// - Use interior mutability (e.g., `Mutex<Connection>`) for mutable state
/// - Compare words with [`canonical_text`] so the fold matches the importer's
pub trait WordStore: Send + Sync {
    /// Returns every entry of a collection in the requested order.
    fn find_by_collection(&self, collection_id: &CollectionId, sort: EntrySort)
    -> Result<Vec<Entry>>;

    /// Returns whether `word` already exists in the collection.
    ///
    /// `exclude_id` skips one entry, so an entry being edited does not collide
    /// with itself.
    fn exists(
        &self,
        word: &str,
        collection_id: &CollectionId,
        exclude_id: Option<&EntryId>,
    ) -> Result<bool>;

    /// Inserts a new entry.
    ///
    /// Returns `Ok(false)` when the store refused the write, for example
    /// because the canonical word is already taken in that collection.
    fn insert(&self, entry: &Entry) -> Result<bool>;

    /// Searches a collection for entries containing `query`.
    ///
    /// The default implementation filters [`WordStore::find_by_collection`].
    fn search(
        &self,
        collection_id: &CollectionId,
        query: &str,
        field: SearchField,
    ) -> Result<Vec<Entry>> {
        let needle = canonical_text(query);
        Ok(self
            .find_by_collection(collection_id, EntrySort::CanonicalTextAsc)?
            .into_iter()
            .filter(|entry| field.matches(entry, &needle))
            .collect())
    }

    /// Returns the distinct, non-empty categories used in a collection, sorted.
    fn categories(&self, collection_id: &CollectionId) -> Result<Vec<String>> {
        let mut categories: Vec<String> = self
            .find_by_collection(collection_id, EntrySort::CanonicalTextAsc)?
            .into_iter()
            .flat_map(|entry| entry.categories)
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}
