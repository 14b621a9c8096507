//! Ingestion-side checks for the two data source paths.
//!
//! Heavy parsing happens behind the upload and sheet-connect endpoints; this
//! module only validates what must be caught before a request leaves the
//! browser: an empty file, an empty header row, or a locator that is not a
//! usable URL. Normalization of the parsed output into a `DataSource` lives
//! with the model (`common::model::datasource`).

use common::error::{Error, Result};

/// Extracts and validates the header row of a tabular text payload.
///
/// Cells are comma-separated, trimmed, and stripped of surrounding quotes.
/// Fails when the payload is blank or any header cell is empty.
pub fn header_fields(text: &str) -> Result<Vec<String>> {
    if text.trim().is_empty() {
        return Err(Error::Parse("the file is empty".into()));
    }

    let header_line = text
        .split_terminator('\n')
        .next()
        .unwrap_or("")
        .trim_end_matches('\r');

    let mut fields = Vec::new();
    for cell in header_line.split(',') {
        let mut field = cell.trim();
        if field.starts_with('"') && field.ends_with('"') && field.len() >= 2 {
            field = &field[1..field.len() - 1];
        }
        if field.trim().is_empty() {
            return Err(Error::Parse("the header row has an empty cell".into()));
        }
        fields.push(field.trim().to_string());
    }

    if fields.is_empty() {
        return Err(Error::Parse("the header row is empty".into()));
    }
    Ok(fields)
}

/// Checks a spreadsheet locator before the connect request is sent.
pub fn validate_sheet_locator(locator: &str) -> Result<()> {
    let locator = locator.trim();
    if locator.is_empty() {
        return Err(Error::Validation("a spreadsheet link is required".into()));
    }
    let rest = locator
        .strip_prefix("https://")
        .or_else(|| locator.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(Error::Validation(
            "the spreadsheet link must be an http(s) URL".into(),
        )),
    }
}
