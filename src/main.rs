//! Binary entry point for wordvault.
//!
//! This binary provides the CLI interface for managing dictionaries and
//! bulk importing or exporting their words.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    DictAction, cmd_categories, cmd_dict, cmd_export, cmd_import, cmd_search, cmd_validate,
    cmd_words,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wordvault::config::WordvaultConfig;
use wordvault::observability::{self, LoggingConfig};

/// Wordvault - personal dictionaries with bulk import and export.
#[derive(Parser)]
#[command(name = "wordvault")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "WORDVAULT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Manage dictionaries.
    Dict {
        #[command(subcommand)]
        action: DictAction,
    },

    /// Check the structure of an import file without importing it.
    Validate {
        /// File to check.
        file: PathBuf,

        /// Format: json or csv (default: from the file extension).
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Import words from a JSON or CSV file into a dictionary.
    Import {
        /// Dictionary name.
        dictionary: String,

        /// File to import.
        file: PathBuf,

        /// Format: json or csv (default: from the file extension).
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Export a dictionary as JSON or CSV.
    Export {
        /// Dictionary name.
        dictionary: String,

        /// Format: json or csv (default: from the output extension, else json).
        #[arg(short, long)]
        format: Option<String>,

        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the words of a dictionary.
    Words {
        /// Dictionary name.
        dictionary: String,

        /// Sort order: word or created.
        #[arg(short, long, default_value = "word")]
        sort: String,
    },

    /// Search a dictionary.
    Search {
        /// Dictionary name.
        dictionary: String,

        /// Text to look for.
        query: String,

        /// Field to search: word, definition or both.
        #[arg(short, long, default_value = "word")]
        field: String,
    },

    /// List the categories used in a dictionary.
    Categories {
        /// Dictionary name.
        dictionary: String,
    },
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let logging = LoggingConfig::from_settings(Some(&config.logging), cli.verbose);
    if let Err(e) = observability::init(&logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

fn load_config(path: Option<&Path>) -> wordvault::Result<WordvaultConfig> {
    match path {
        Some(path) => WordvaultConfig::load_from_file(path),
        None => Ok(WordvaultConfig::load_default()),
    }
}

fn run_command(command: Commands, config: &WordvaultConfig) -> wordvault::Result<()> {
    match command {
        Commands::Dict { action } => cmd_dict(config, action),
        Commands::Validate { file, format } => cmd_validate(file, format),
        Commands::Import {
            dictionary,
            file,
            format,
        } => cmd_import(config, &dictionary, file, format),
        Commands::Export {
            dictionary,
            format,
            output,
        } => cmd_export(config, &dictionary, format, output),
        Commands::Words { dictionary, sort } => cmd_words(config, &dictionary, &sort),
        Commands::Search {
            dictionary,
            query,
            field,
        } => cmd_search(config, &dictionary, &query, &field),
        Commands::Categories { dictionary } => cmd_categories(config, &dictionary),
    }
}
