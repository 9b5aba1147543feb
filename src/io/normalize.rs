//! Record normalization.
//!
//! Turns one raw [`ImportRecord`] into canonical [`EntryFields`] or the
//! [`Rejection`] explaining why it cannot be imported. Pure; touches no store.

use super::formats::Format;
use super::formats::csv::{CATEGORY_SEPARATOR, EXAMPLE_SEPARATOR};
use super::traits::{ImportRecord, Rejection};
use crate::models::EntryFields;
use serde_json::Value;

/// Normalizes a raw record.
///
/// - `word` and `definition` must be present strings, non-empty after trim
/// - `word` is folded with [`canonical_text`](crate::models::canonical_text); `definition` is only trimmed
/// - `pronunciation` and `notes` are trimmed and default to `""`
/// - `examples` and `categories` come from a delimited cell (CSV) or a list
///   of strings (JSON)
///
/// # Errors
///
/// Returns the first [`Rejection`] that applies, checking presence, then
/// type, then emptiness.
pub fn normalize(record: &ImportRecord) -> Result<EntryFields, Rejection> {
    let (Some(word), Some(definition)) = (record.get("word"), record.get("definition")) else {
        return Err(Rejection::MissingFields);
    };
    let fields = EntryFields::new(
        required_str(word, "word")?,
        required_str(definition, "definition")?,
    );
    if fields.word.is_empty() || fields.definition.is_empty() {
        return Err(Rejection::EmptyFields);
    }

    Ok(EntryFields {
        examples: list_field(record, "examples", EXAMPLE_SEPARATOR),
        categories: list_field(record, "categories", CATEGORY_SEPARATOR),
        ..fields
            .with_pronunciation(optional_str(record, "pronunciation"))
            .with_notes(optional_str(record, "notes"))
    })
}

fn required_str<'v>(value: &'v Value, field: &'static str) -> Result<&'v str, Rejection> {
    value.as_str().ok_or(Rejection::NotAString { field })
}

fn optional_str<'r>(record: &'r ImportRecord, field: &str) -> &'r str {
    record.get(field).and_then(Value::as_str).unwrap_or_default()
}

fn list_field(record: &ImportRecord, field: &str, separator: char) -> Vec<String> {
    match (record.source, record.get(field)) {
        (Format::Csv, Some(Value::String(cell))) => split_cell(cell, separator),
        (Format::Json, Some(Value::Array(items))) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Splits a delimited cell, trimming parts and dropping empty ones.
#[must_use]
pub fn split_cell(cell: &str, separator: char) -> Vec<String> {
    cell.split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
