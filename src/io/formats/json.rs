//! JSON format adapter for import/export.
//!
//! Import reads a document of the shape `{"words": [{...}, ...]}`. Export
//! writes the pretty-printed [`ExportDocument`].

use crate::io::formats::Format;
use crate::io::traits::{
    DictionaryMeta, ExportDocument, ExportSink, ExportedEntry, ImportRecord, ImportSource,
    PayloadError, RawRecord, Rejection,
};
use crate::{Error, Result};
use serde_json::Value;
use std::io::Write;

/// JSON import source.
///
/// The whole payload is parsed up front; the top-level shape is checked once
/// and every element of `words` then becomes one record.
#[derive(Debug)]
pub struct JsonImportSource {
    elements: std::vec::IntoIter<Value>,
    total: usize,
}

impl JsonImportSource {
    /// Parses `payload` and checks its top-level shape.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] if the payload is not JSON, is not an
    /// object, or has no `words` list.
    pub fn new(payload: &str) -> std::result::Result<Self, PayloadError> {
        let document: Value = serde_json::from_str(payload)
            .map_err(|e| PayloadError::InvalidJson(e.to_string()))?;
        let Value::Object(mut document) = document else {
            return Err(PayloadError::NotAnObject);
        };
        let words = document
            .remove("words")
            .ok_or(PayloadError::WordsKeyMissing)?;
        let Value::Array(elements) = words else {
            return Err(PayloadError::WordsNotList);
        };

        Ok(Self {
            total: elements.len(),
            elements: elements.into_iter(),
        })
    }
}

impl ImportSource for JsonImportSource {
    fn next(&mut self) -> Option<RawRecord> {
        let element = self.elements.next()?;
        Some(match element {
            Value::Object(fields) => Ok(ImportRecord {
                source: Format::Json,
                fields: fields.into_iter().collect(),
            }),
            _ => Err(Rejection::NotAnObject),
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.total)
    }
}

/// JSON export sink.
///
/// Buffers entries and writes one pretty-printed document on finalize, since
/// the metadata block precedes the entry list.
pub struct JsonExportSink<W: Write> {
    writer: W,
    meta: Option<DictionaryMeta>,
    words: Vec<ExportedEntry>,
}

impl<W: Write> JsonExportSink<W> {
    /// Creates a new JSON export sink.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            meta: None,
            words: Vec::new(),
        }
    }
}

impl<W: Write> ExportSink for JsonExportSink<W> {
    fn begin(&mut self, meta: &DictionaryMeta) -> Result<()> {
        self.meta = Some(meta.clone());
        Ok(())
    }

    fn write(&mut self, entry: &ExportedEntry) -> Result<()> {
        self.words.push(entry.clone());
        Ok(())
    }

    fn finalize(mut self: Box<Self>) -> Result<()> {
        let dictionary = self
            .meta
            .take()
            .ok_or_else(|| Error::operation("write_json", "export finalized before begin"))?;
        let document = ExportDocument {
            dictionary,
            words: std::mem::take(&mut self.words),
        };

        serde_json::to_writer_pretty(&mut self.writer, &document)
            .map_err(|e| Error::operation("write_json", e))?;
        self.writer
            .flush()
            .map_err(|e| Error::operation("flush_json", e))
    }
}
