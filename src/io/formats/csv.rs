//! CSV format adapter for import/export.
//!
//! The header row names the fields. `word` and `definition` columns are
//! required; `pronunciation`, `examples`, `categories` and `notes` are
//! optional and unknown columns are ignored.
//!
//! Lists are flattened into a single cell: examples are joined with `"; "`
//! and categories with `", "`. A value that itself contains the delimiter is
//! split apart again on re-import.
//!
//! Import trims each list item and drops empty ones, while JSON import keeps
//! list items verbatim. A collection imported from JSON with padded or empty
//! items therefore loses that padding and those empty items on a CSV round
//! trip.

use crate::io::formats::Format;
use crate::io::traits::{
    DictionaryMeta, ExportSink, ExportedEntry, ImportRecord, ImportSource, PayloadError,
    RawRecord, Rejection,
};
use crate::{Error, Result};
use serde_json::Value;
use std::io::Write;

/// Columns every import payload must have.
pub const REQUIRED_COLUMNS: [&str; 2] = ["word", "definition"];

/// Columns written by the exporter, in order.
pub const EXPORT_COLUMNS: [&str; 6] = [
    "word",
    "definition",
    "pronunciation",
    "examples",
    "categories",
    "notes",
];

/// Separator between examples in a single cell.
pub const EXAMPLE_SEPARATOR: char = ';';

/// Separator between categories in a single cell.
pub const CATEGORY_SEPARATOR: char = ',';

/// Returns the required columns missing from `headers`.
#[must_use]
pub fn missing_columns(headers: &csv::StringRecord) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect()
}

/// CSV import source.
///
/// Rows shorter than the header simply lack the trailing fields; cells past
/// the header are ignored. Blank lines are skipped.
pub struct CsvImportSource<'a> {
    reader: csv::Reader<&'a [u8]>,
    headers: csv::StringRecord,
    record: csv::StringRecord,
    exhausted: bool,
}

impl<'a> CsvImportSource<'a> {
    /// Reads the header row of `payload`.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] if the header cannot be read or lacks a
    /// required column.
    pub fn new(payload: &'a str) -> std::result::Result<Self, PayloadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(payload.as_bytes());
        let headers = reader
            .headers()
            .map_err(|e| PayloadError::Csv(e.to_string()))?
            .clone();
        if !missing_columns(&headers).is_empty() {
            return Err(PayloadError::MissingColumns);
        }

        Ok(Self {
            reader,
            headers,
            record: csv::StringRecord::new(),
            exhausted: false,
        })
    }

    fn current_record(&self) -> ImportRecord {
        let fields = self
            .headers
            .iter()
            .zip(self.record.iter())
            .map(|(name, cell)| (name.to_string(), Value::from(cell)))
            .collect();
        ImportRecord {
            source: Format::Csv,
            fields,
        }
    }
}

impl ImportSource for CsvImportSource<'_> {
    fn next(&mut self) -> Option<RawRecord> {
        if self.exhausted {
            return None;
        }
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(Ok(self.current_record())),
            Ok(false) => {
                self.exhausted = true;
                None
            },
            Err(e) => {
                // The reader cannot resynchronize after a broken row.
                self.exhausted = true;
                Some(Err(Rejection::Malformed(format!("CSV parsing error: {e}"))))
            },
        }
    }

    fn first_position(&self) -> usize {
        2
    }
}

/// CSV export sink.
///
/// The header row is written by `begin`, so an empty collection still
/// produces a header line. Rows end with `\n`.
pub struct CsvExportSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvExportSink<W> {
    /// Creates a new CSV export sink.
    #[must_use]
    pub fn new(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        Self { writer }
    }
}

impl<W: Write> ExportSink for CsvExportSink<W> {
    fn begin(&mut self, _meta: &DictionaryMeta) -> Result<()> {
        self.writer
            .write_record(EXPORT_COLUMNS)
            .map_err(|e| Error::operation("write_csv_headers", e))
    }

    fn write(&mut self, entry: &ExportedEntry) -> Result<()> {
        let examples = entry.examples.join("; ");
        let categories = entry.categories.join(", ");
        self.writer
            .write_record([
                entry.word.as_str(),
                entry.definition.as_str(),
                entry.pronunciation.as_str(),
                examples.as_str(),
                categories.as_str(),
                entry.notes.as_str(),
            ])
            .map_err(|e| Error::operation("write_csv", e))
    }

    fn finalize(mut self: Box<Self>) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::operation("flush_csv", e))
    }
}
