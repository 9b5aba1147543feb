//! Import and export service implementations.
//!
//! Orchestrates format parsing, validation, and storage operations.

pub mod batch;
pub mod export;
pub mod import;

pub use batch::{BatchImporter, BatchOutcome};
pub use export::ExportService;
pub use import::{ImportResult, ImportService, ImportTarget, MAX_DISPLAYED_ERRORS, RecordOutcome};
