//! Collection store trait.

use crate::Result;
use crate::models::{Collection, CollectionId, OwnerId};

/// Trait for collection ("dictionary") storage.
///
/// Besides plain lookups, the collection store owns the cached entry count
/// and is the word-count reconciler the batch importer calls once per batch.
pub trait CollectionStore: Send + Sync {
    /// Creates a collection.
    ///
    /// Returns `Ok(false)` if the owner already has a collection with that name.
    fn create(&self, collection: &Collection) -> Result<bool>;

    /// Retrieves a collection by ID.
    fn get(&self, id: &CollectionId) -> Result<Option<Collection>>;

    /// Retrieves one of an owner's collections by name.
    fn find_by_name(&self, owner_id: &OwnerId, name: &str) -> Result<Option<Collection>>;

    /// Lists an owner's collections sorted by name.
    ///
    /// `word_count` is the cached value and may be stale.
    fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Collection>>;

    /// Recomputes the cached entry count from the word store and returns it.
    ///
    /// Cost is proportional to the collection size; call it once per batch.
    fn recount_entries(&self, id: &CollectionId) -> Result<usize>;
}
