// Cell grid shared by all layout parsers.
//
// Every source — sheet tab CSV export or document table extraction — is
// reduced to a 2-D grid of trimmed string cells before parsing. Rows are
// ragged: short rows are common and parsers index through `cell()`.

use anyhow::{Context, Result};

pub type Grid = Vec<Vec<String>>;

/// Cell accessor that treats out-of-range as empty. Returned value is
/// trimmed at decode time, so "" means blank.
pub fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Decode CSV text into a grid.
///
/// Sheet exports have no reliable header row and frequently change column
/// counts mid-file (merged cells), so the reader is headerless and flexible.
pub fn grid_from_csv(text: &str) -> Result<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to decode CSV row")?;
        grid.push(record.iter().map(|c| c.trim().to_string()).collect());
    }

    Ok(grid)
}
