//! Collections ("dictionaries") and their identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_id!(
    /// Unique identifier for a collection.
    CollectionId
);

string_id!(
    /// Reference to the user that owns a collection and its entries.
    OwnerId
);

/// A named, user-owned group of word entries.
///
/// `word_count` is a cache. It is only guaranteed to match the number of
/// stored entries right after [`CollectionStore::recount_entries`] runs.
///
/// [`CollectionStore::recount_entries`]: crate::storage::CollectionStore::recount_entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier.
    pub id: CollectionId,
    /// Display name, unique per owner.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Cached number of entries.
    pub word_count: usize,
}

impl Collection {
    /// Creates a new, empty collection with a generated id.
    #[must_use]
    pub fn new(name: impl Into<String>, owner_id: OwnerId) -> Self {
        let now = Utc::now();
        Self {
            id: CollectionId::generate(),
            name: name.into().trim().to_string(),
            description: String::new(),
            owner_id,
            created_at: now,
            updated_at: now,
            word_count: 0,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_string();
        self
    }
}
