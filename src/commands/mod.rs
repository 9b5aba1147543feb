//! Command handlers module.
//!
//! - `dictionary.rs`: dictionary create/list
//! - `io.rs`: validate, import and export
//! - `words.rs`: word listing, search and categories

mod dictionary;
mod io;
mod words;

use std::path::Path;
use std::sync::Arc;

use wordvault::config::WordvaultConfig;
use wordvault::io::Format;
use wordvault::storage::{CollectionStore, SqliteStore};
use wordvault::{Collection, Error, Result};

pub use dictionary::{DictAction, cmd_dict};
pub use io::{cmd_export, cmd_import, cmd_validate};
pub use words::{cmd_categories, cmd_search, cmd_words};

/// Opens the configured store.
fn open_store(config: &WordvaultConfig) -> Result<Arc<SqliteStore>> {
    SqliteStore::new(config.database_path()).map(Arc::new)
}

/// Looks up one of the configured owner's dictionaries by name.
fn resolve_dictionary(
    store: &SqliteStore,
    config: &WordvaultConfig,
    name: &str,
) -> Result<Collection> {
    store
        .find_by_name(&config.owner, name)?
        .ok_or_else(|| Error::NotFound(format!("dictionary '{}'", name.trim())))
}

/// Picks the format from an explicit argument or the file extension.
fn resolve_format(format: Option<&str>, file: &Path) -> Result<Format> {
    match format {
        Some(format) => format.parse(),
        None => Format::from_path(file),
    }
}
