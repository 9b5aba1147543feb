//! Format adapters for import/export.
//!
//! Each format implements both [`ImportSource`] and [`ExportSink`].

pub mod csv;
pub mod json;

use crate::{Error, Result};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use super::traits::{ExportSink, ImportSource, PayloadError};

/// Supported file formats for import/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// A JSON object with a `words` list.
    Json,
    /// CSV with a header row.
    Csv,
}

impl Format {
    /// Returns all supported formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Json, Self::Csv]
    }

    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Detects format from file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not recognized.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some(ext) => ext.parse().map_err(|_| {
                Error::InvalidInput(format!("Unsupported file extension: .{ext}"))
            }),
            None => Err(Error::InvalidInput(
                "Cannot determine format: file has no extension".to_string(),
            )),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(Error::InvalidInput(format!("Unknown format: {s}"))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Creates an import source over `payload`.
///
/// # Errors
///
/// Returns a [`PayloadError`] if the payload cannot be read at all.
pub fn create_import_source(
    payload: &str,
    format: Format,
) -> std::result::Result<Box<dyn ImportSource + '_>, PayloadError> {
    match format {
        Format::Json => Ok(Box::new(json::JsonImportSource::new(payload)?)),
        Format::Csv => Ok(Box::new(csv::CsvImportSource::new(payload)?)),
    }
}

/// Creates an export sink for the given format and writer.
#[must_use]
pub fn create_export_sink<'w, W: Write + 'w>(writer: W, format: Format) -> Box<dyn ExportSink + 'w> {
    match format {
        Format::Json => Box::new(json::JsonExportSink::new(writer)),
        Format::Csv => Box::new(csv::CsvExportSink::new(writer)),
    }
}
