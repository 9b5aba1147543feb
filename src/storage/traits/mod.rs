//! Storage backend traits.

mod collections;
mod words;

pub use collections::CollectionStore;
pub use words::{EntrySort, SearchField, WordStore};
