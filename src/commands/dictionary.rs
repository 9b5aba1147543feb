//! Dictionary management command handlers.

use clap::Subcommand;

use wordvault::config::WordvaultConfig;
use wordvault::storage::CollectionStore;
use wordvault::{Collection, Error, Result};

use super::open_store;

/// Dictionary subcommands.
#[derive(Subcommand)]
pub enum DictAction {
    /// Create a dictionary.
    Create {
        /// Dictionary name, unique per owner.
        name: String,

        /// Free-text description.
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List your dictionaries.
    List,
}

/// Executes a dictionary subcommand.
pub fn cmd_dict(config: &WordvaultConfig, action: DictAction) -> Result<()> {
    let store = open_store(config)?;

    match action {
        DictAction::Create { name, description } => {
            if name.trim().is_empty() {
                return Err(Error::InvalidInput(
                    "dictionary name cannot be empty".to_string(),
                ));
            }
            let collection =
                Collection::new(name, config.owner.clone()).with_description(description);
            if !store.create(&collection)? {
                return Err(Error::InvalidInput(format!(
                    "dictionary '{}' already exists",
                    collection.name
                )));
            }
            tracing::info!(collection.id = %collection.id, "dictionary created");
            println!("Created dictionary '{}' ({})", collection.name, collection.id);
        },
        DictAction::List => {
            let collections = store.list_by_owner(&config.owner)?;
            if collections.is_empty() {
                println!("No dictionaries yet.");
            }
            for collection in collections {
                println!(
                    "{:<24} {:>6} words  {}",
                    collection.name, collection.word_count, collection.description
                );
            }
        },
    }

    Ok(())
}
