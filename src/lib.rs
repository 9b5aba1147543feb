//! # Wordvault
//!
//! Personal dictionary storage with bulk import and export.
//!
//! Users own named word collections ("dictionaries") holding word/definition
//! entries. The heart of the crate is the [`io`] pipeline, which ingests
//! untrusted JSON or CSV payloads record by record, tolerating partial
//! failure, and serializes a collection back into the same formats.
//!
//! ## Features
//!
//! - Structural pre-validation of JSON and CSV payloads
//! - Per-record normalization with case-folded canonical word text
//! - Duplicate detection scoped to a collection
//! - Deterministic success/error reports that never abort a batch
//! - `SQLite` storage enforcing `(collection, word)` uniqueness
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wordvault::io::{BatchImporter, BatchOutcome, Format};
//! use wordvault::storage::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::in_memory()?);
//! let batch = BatchImporter::new(store.clone(), store.clone());
//! if let BatchOutcome::Completed { result, .. } = batch.run(payload, Format::Json, &collection) {
//!     println!("{} imported, {} rejected", result.success_count, result.error_count);
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::WordvaultConfig;
pub use models::{Collection, CollectionId, Entry, EntryId, OwnerId, canonical_text};
pub use storage::{CollectionStore, SqliteStore, WordStore};

/// Error type for wordvault operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unknown format names, bad CLI arguments, malformed config values |
/// | `OperationFailed` | `SQLite`, CSV, JSON or filesystem operations fail |
/// | `NotFound` | A dictionary looked up by name or id does not exist |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` statements fail to prepare or execute
    /// - CSV or JSON serialization fails during export
    /// - Config or payload files cannot be read
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from an operation label and any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for wordvault operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "test".to_string(),
            cause: "failed".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'test' failed: failed");

        let err = Error::NotFound("dictionary 'spanish'".to_string());
        assert_eq!(err.to_string(), "not found: dictionary 'spanish'");
    }

    #[test]
    fn test_operation_helper() {
        let err = Error::operation("insert_word", "UNIQUE constraint failed");
        assert!(matches!(
            err,
            Error::OperationFailed { ref operation, ref cause }
                if operation == "insert_word" && cause.contains("UNIQUE")
        ));
    }
}
