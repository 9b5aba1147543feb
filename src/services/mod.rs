//! Business logic services.
//!
//! Services sit between the import/export pipeline and the storage backends.

pub mod deduplication;

pub use deduplication::DuplicateChecker;
