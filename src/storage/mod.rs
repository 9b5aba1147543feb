//! Storage layer.
//!
//! The pipeline depends only on the [`WordStore`] and [`CollectionStore`]
//! traits. [`SqliteStore`] is the bundled implementation of both.

// Dropping the connection guard slightly earlier provides no meaningful benefit.
#![allow(clippy::significant_drop_tightening)]

pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteStore;
pub use traits::{CollectionStore, EntrySort, SearchField, WordStore};
