//! Validate, import and export command handlers.

use std::path::{Path, PathBuf};

use wordvault::config::WordvaultConfig;
use wordvault::io::{BatchImporter, BatchOutcome, ExportService, Format, FormatValidator};
use wordvault::{Error, Result};

use super::{open_store, resolve_dictionary, resolve_format};

fn read_payload(file: &Path) -> Result<String> {
    std::fs::read_to_string(file)
        .map_err(|e| Error::operation("read_import_file", format!("{}: {e}", file.display())))
}

/// Renders an error list, noting how many were left out.
fn error_lines(errors: &[String], hidden: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(errors.len() + 2);
    lines.push(format!("Errors ({}):", errors.len() + hidden));
    lines.extend(errors.iter().map(|error| format!("  - {error}")));
    if hidden > 0 {
        lines.push(format!("  ... and {hidden} more"));
    }
    lines
}

fn print_errors(errors: &[String], hidden: usize) {
    println!();
    for line in error_lines(errors, hidden) {
        println!("{line}");
    }
}

/// Executes the validate command.
pub fn cmd_validate(file: PathBuf, format: Option<String>) -> Result<()> {
    let format = resolve_format(format.as_deref(), &file)?;
    let payload = read_payload(&file)?;

    let report = FormatValidator::new().validate(&payload, format);
    if report.is_valid {
        println!("{} is a valid {format} import file", file.display());
        return Ok(());
    }

    print_errors(&report.errors, 0);
    Err(Error::InvalidInput(format!(
        "{} is not a valid {format} import file",
        file.display()
    )))
}

/// Executes the import command.
pub fn cmd_import(
    config: &WordvaultConfig,
    dictionary: &str,
    file: PathBuf,
    format: Option<String>,
) -> Result<()> {
    let format = resolve_format(format.as_deref(), &file)?;
    let payload = read_payload(&file)?;
    let store = open_store(config)?;
    let collection = resolve_dictionary(&store, config, dictionary)?;

    let batch = BatchImporter::new(store.clone(), store);
    match batch.run(&payload, format, &collection) {
        BatchOutcome::ValidationFailed { errors } => {
            print_errors(&errors, 0);
            Err(Error::InvalidInput(format!(
                "{} failed validation; nothing was imported",
                file.display()
            )))
        },
        BatchOutcome::Completed {
            result,
            reconciled_count,
        } => {
            println!("Import completed:");
            println!("  Imported: {}", result.success_count);
            println!("  Errors:   {}", result.error_count);
            match reconciled_count {
                Some(count) => println!("  Words in '{}': {count}", collection.name),
                None => println!("  Word count could not be refreshed"),
            }
            if result.has_errors() {
                print_errors(result.displayed_errors(), result.hidden_error_count());
            }
            Ok(())
        },
    }
}

/// Executes the export command.
pub fn cmd_export(
    config: &WordvaultConfig,
    dictionary: &str,
    format: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let format = match (format.as_deref(), output.as_deref()) {
        (None, None) => Format::Json,
        (format, Some(path)) => resolve_format(format, path)?,
        (Some(format), None) => format.parse()?,
    };
    let store = open_store(config)?;
    let collection = resolve_dictionary(&store, config, dictionary)?;

    let exported = ExportService::new(store).export(&collection, format);
    if exported.is_empty() {
        return Err(Error::operation(
            "export",
            format!("could not export dictionary '{}'", collection.name),
        ));
    }

    match output {
        Some(path) => {
            std::fs::write(&path, &exported).map_err(|e| {
                Error::operation("write_export_file", format!("{}: {e}", path.display()))
            })?;
            println!("Exported '{}' to {}", collection.name, path.display());
        },
        None => print!("{exported}"),
    }
    Ok(())
}
