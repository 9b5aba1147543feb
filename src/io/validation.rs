//! Structural pre-validation of import payloads.
//!
//! A cheap, read-only check of a whole payload before any record is
//! imported. It re-parses the payload on its own and never looks at record
//! contents beyond the presence of the required fields.

use super::formats::Format;
use super::formats::csv::missing_columns;
use serde_json::Value;

/// Number of leading JSON elements whose shape is checked.
pub const JSON_SAMPLE_SIZE: usize = 5;

/// Outcome of validating a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Whether the payload may be imported.
    pub is_valid: bool,
    /// Problems found, in check order.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Builds a report from collected errors. Valid when there are none.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validator for whole import payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatValidator;

impl FormatValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates the structure of `payload`.
    ///
    /// Checks that depend on an earlier one are skipped when it fails. Each
    /// sampled JSON element is checked independently.
    #[must_use]
    pub fn validate(&self, payload: &str, format: Format) -> ValidationReport {
        let errors = match format {
            Format::Json => validate_json(payload),
            Format::Csv => validate_csv(payload),
        };
        tracing::debug!(format = %format, errors = errors.len(), "validated payload");
        ValidationReport::from_errors(errors)
    }
}

fn validate_json(payload: &str) -> Vec<String> {
    let document: Value = match serde_json::from_str(payload) {
        Ok(document) => document,
        Err(e) => return vec![format!("Invalid JSON format: {e}")],
    };
    let Some(document) = document.as_object() else {
        return vec!["JSON payload must be an object".to_string()];
    };
    let Some(words) = document.get("words") else {
        return vec!["JSON must contain a 'words' key".to_string()];
    };
    let Some(words) = words.as_array() else {
        return vec!["'words' must be a list".to_string()];
    };
    if words.is_empty() {
        return vec!["No words found in JSON data".to_string()];
    }

    words
        .iter()
        .take(JSON_SAMPLE_SIZE)
        .enumerate()
        .filter_map(|(i, word)| {
            let position = i + 1;
            match word.as_object() {
                None => Some(format!("Word {position} is not a valid object")),
                Some(fields) if !(fields.contains_key("word") && fields.contains_key("definition")) => {
                    Some(format!("Word {position} missing required fields"))
                },
                Some(_) => None,
            }
        })
        .collect()
}

fn validate_csv(payload: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(payload.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => return vec![format!("CSV parsing error: {e}")],
    };
    if headers.iter().all(str::is_empty) {
        return vec!["CSV file appears to be empty".to_string()];
    }
    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        return vec![format!(
            "CSV must contain 'word' and 'definition' columns (missing: {})",
            missing.join(", ")
        )];
    }

    let mut rows = 0usize;
    for record in reader.records() {
        if let Err(e) = record {
            return vec![format!("CSV parsing error: {e}")];
        }
        rows += 1;
    }
    if rows == 0 {
        return vec!["No data rows found in CSV".to_string()];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn errors(payload: &str, format: Format) -> Vec<String> {
        FormatValidator::new().validate(payload, format).errors
    }

    #[test]
    fn test_valid_json() {
        let report = FormatValidator::new().validate(
            r#"{"words": [{"word": "a", "definition": "b"}]}"#,
            Format::Json,
        );
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test_case("{oops", "Invalid JSON format: " ; "not json")]
    #[test_case("[]", "JSON payload must be an object" ; "array at top level")]
    #[test_case(r#"{"entries": []}"#, "JSON must contain a 'words' key" ; "missing words")]
    #[test_case(r#"{"words": "a,b"}"#, "'words' must be a list" ; "words not a list")]
    #[test_case(r#"{"words": []}"#, "No words found in JSON data" ; "empty words")]
    fn test_json_structural_errors(payload: &str, expected_prefix: &str) {
        let errors = errors(payload, Format::Json);
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].starts_with(expected_prefix), "{errors:?}");
    }

    #[test]
    fn test_json_element_checks_are_independent() {
        let payload = r#"{"words": [
            {"word": "ok", "definition": "fine"},
            "not an object",
            {"word": "no definition"},
            7,
            {"definition": "no word"}
        ]}"#;

        assert_eq!(
            errors(payload, Format::Json),
            vec![
                "Word 2 is not a valid object",
                "Word 3 missing required fields",
                "Word 4 is not a valid object",
                "Word 5 missing required fields",
            ]
        );
    }

    #[test]
    fn test_json_only_first_five_elements_sampled() {
        let payload = r#"{"words": [
            {"word": "1", "definition": "x"},
            {"word": "2", "definition": "x"},
            {"word": "3", "definition": "x"},
            {"word": "4", "definition": "x"},
            {"word": "5", "definition": "x"},
            "sixth is never checked"
        ]}"#;
        assert!(errors(payload, Format::Json).is_empty());
    }

    #[test]
    fn test_valid_csv() {
        assert!(errors("word,definition\nhola,hello\n", Format::Csv).is_empty());
    }

    #[test_case("", "CSV file appears to be empty" ; "empty payload")]
    #[test_case("word,definition\n", "No data rows found in CSV" ; "header only")]
    #[test_case(
        "word,meaning\nhola,hello\n",
        "CSV must contain 'word' and 'definition' columns (missing: definition)" ;
        "missing definition column"
    )]
    #[test_case(
        "term,meaning\n",
        "CSV must contain 'word' and 'definition' columns (missing: word, definition)" ;
        "missing both columns without data rows"
    )]
    fn test_csv_errors(payload: &str, expected: &str) {
        assert_eq!(errors(payload, Format::Csv), vec![expected]);
    }

    #[test]
    fn test_validation_does_not_check_record_contents() {
        let payload = "word,definition\n,\n";
        assert!(errors(payload, Format::Csv).is_empty());
    }
}
