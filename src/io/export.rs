//! CSV export for a computed quote.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::QuoteError;
use crate::quote::Quote;

/// Column header for quote CSV export.
const HEADER: [&str; 3] = ["section", "item", "value"];

/// Exports a quote to a CSV file at the given path.
///
/// Writes a header row followed by one row per line item, rounded the same
/// way as the text report. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns a `QuoteError` if file creation or writing fails.
pub fn export_csv(quote: &Quote, path: &Path) -> Result<(), QuoteError> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(quote, buf)
}

/// Writes a quote as CSV to any writer.
///
/// # Errors
///
/// Returns a `QuoteError` if writing fails.
pub fn write_csv(quote: &Quote, writer: impl Write) -> Result<(), QuoteError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER)?;
    for (section, item, value) in quote.line_items() {
        let value = value.to_string();
        wtr.write_record([section, item, value.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
