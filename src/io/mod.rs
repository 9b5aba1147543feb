//! Import/Export I/O subsystem.
//!
//! Bulk import of untrusted JSON or CSV payloads into a collection, and
//! export of a collection back into the same formats.
//!
//! # Architecture
//!
//! - **Format adapters** implement [`ImportSource`] and [`ExportSink`]
//! - **Validation** is a cheap structural pre-check of a whole payload
//! - **Normalization** turns one raw record into canonical entry fields
//! - **Services** run records through normalize, duplicate check and insert
//!
//! # Supported Formats
//!
//! | Format | Import shape | Export shape |
//! |--------|--------------|--------------|
//! | JSON | `{"words": [{...}]}` | `{"dictionary": {...}, "words": [...]}`, pretty-printed |
//! | CSV | header row with `word`, `definition` | `word,definition,pronunciation,examples,categories,notes` |
//!
//! # Examples
//!
//! ```rust,ignore
//! use wordvault::io::{BatchImporter, BatchOutcome, Format};
//!
//! let batch = BatchImporter::new(store.clone(), store.clone());
//! if let BatchOutcome::Completed { result, .. } = batch.run(payload, Format::Csv, &collection) {
//!     println!("Imported {} words", result.success_count);
//! }
//! ```

pub mod formats;
pub mod normalize;
pub mod services;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use formats::Format;
pub use normalize::normalize;
pub use services::{
    BatchImporter, BatchOutcome, ExportService, ImportResult, ImportService, ImportTarget,
    MAX_DISPLAYED_ERRORS, RecordOutcome,
};
pub use traits::{
    DictionaryMeta, ExportDocument, ExportSink, ExportedEntry, ImportRecord, ImportSource,
    PayloadError, RawRecord, Rejection,
};
pub use validation::{FormatValidator, ValidationReport};
