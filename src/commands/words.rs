//! Word listing, search and category command handlers.

use wordvault::config::WordvaultConfig;
use wordvault::storage::{EntrySort, SearchField, WordStore};
use wordvault::{Entry, Error, Result};

use super::{open_store, resolve_dictionary};

fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        println!("No words found.");
    }
    for entry in entries {
        println!("{}: {}", entry.word, entry.definition);
        if !entry.pronunciation.is_empty() {
            println!("    /{}/", entry.pronunciation);
        }
        if !entry.categories.is_empty() {
            println!("    [{}]", entry.categories.join(", "));
        }
    }
}

/// Executes the words command.
pub fn cmd_words(config: &WordvaultConfig, dictionary: &str, sort: &str) -> Result<()> {
    let sort = EntrySort::parse(sort)
        .ok_or_else(|| Error::InvalidInput(format!("Unknown sort order: {sort}")))?;
    let store = open_store(config)?;
    let collection = resolve_dictionary(&store, config, dictionary)?;

    print_entries(&store.find_by_collection(&collection.id, sort)?);
    Ok(())
}

/// Executes the search command.
pub fn cmd_search(
    config: &WordvaultConfig,
    dictionary: &str,
    query: &str,
    field: &str,
) -> Result<()> {
    let field = SearchField::parse(field)
        .ok_or_else(|| Error::InvalidInput(format!("Unknown search field: {field}")))?;
    let store = open_store(config)?;
    let collection = resolve_dictionary(&store, config, dictionary)?;

    print_entries(&store.search(&collection.id, query, field)?);
    Ok(())
}

/// Executes the categories command.
pub fn cmd_categories(config: &WordvaultConfig, dictionary: &str) -> Result<()> {
    let store = open_store(config)?;
    let collection = resolve_dictionary(&store, config, dictionary)?;

    for category in store.categories(&collection.id)? {
        println!("{category}");
    }
    Ok(())
}
