// ============================================================
// Layer 4 — Tabular Source Adapter
// ============================================================
// Reads (title, abstract) rows out of an uploaded table.
//
// Supported formats (chosen by file extension, any case):
//   .csv         → csv crate, first row is the header
//   .xlsx / .xls → calamine, first worksheet, first row is header
//
// Column rules:
//   "Abstract" — required, matched case-sensitively
//   "Title"    — optional, rows get `None` when it is missing
//                or the cell is blank
//
// Every data row becomes exactly one TabularRow, even when the
// abstract cell is empty. Empty abstracts are handled downstream
// (they produce an empty record, not an error).

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::domain::error::NerError;

pub const ABSTRACT_COLUMN: &str = "Abstract";
pub const TITLE_COLUMN:    &str = "Title";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularRow {
    pub title:     Option<String>,
    pub abstract_: String,
}

/// Parse an uploaded table. `extension` may include a leading dot.
pub fn parse_tabular(bytes: &[u8], extension: &str) -> Result<Vec<TabularRow>, NerError> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();

    let (header, rows) = match ext.as_str() {
        "csv"          => read_csv(bytes)?,
        "xlsx" | "xls" => read_workbook(bytes)?,
        _              => return Err(NerError::UnsupportedFormat(extension.to_string())),
    };

    let rows = rows_from_grid(&header, rows)?;
    tracing::info!("Loaded {} rows from .{} table", rows.len(), ext);
    Ok(rows)
}

/// Locate the columns and build one TabularRow per grid row
fn rows_from_grid(header: &[String], grid: Vec<Vec<String>>) -> Result<Vec<TabularRow>, NerError> {
    let abstract_idx = header
        .iter()
        .position(|h| h == ABSTRACT_COLUMN)
        .ok_or_else(|| NerError::MissingColumn(ABSTRACT_COLUMN.to_string()))?;
    let title_idx = header.iter().position(|h| h == TITLE_COLUMN);

    if title_idx.is_none() {
        tracing::debug!("No '{}' column, titles will be empty", TITLE_COLUMN);
    }

    let rows = grid
        .into_iter()
        .map(|cells| {
            let abstract_ = cells.get(abstract_idx).cloned().unwrap_or_default();
            let title = title_idx
                .and_then(|i| cells.get(i))
                .filter(|t| !t.trim().is_empty())
                .cloned();
            TabularRow { title, abstract_ }
        })
        .collect();

    Ok(rows)
}

fn read_csv(bytes: &[u8]) -> Result<(Vec<String>, Vec<Vec<String>>), NerError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| NerError::MalformedTable(format!("cannot read header row: {e}")))?
        .iter()
        .map(|h| h.trim_start_matches('\u{FEFF}').to_string())
        .collect();

    let mut grid = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // +2: 1-based, and the header is line 1
        let record = record
            .map_err(|e| NerError::MalformedTable(format!("row {}: {e}", i + 2)))?;
        grid.push(record.iter().map(str::to_string).collect());
    }

    Ok((header, grid))
}

fn read_workbook(bytes: &[u8]) -> Result<(Vec<String>, Vec<Vec<String>>), NerError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| NerError::UnreadableDocument(format!("not a readable spreadsheet ({e})")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| NerError::UnreadableDocument("workbook has no worksheets".into()))?
        .map_err(|e| NerError::UnreadableDocument(format!("cannot read first worksheet ({e})")))?;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(cell_text).collect(),
        None        => Vec::new(),
    };
    let grid = rows.map(|cells| cells.iter().map(cell_text).collect()).collect();

    Ok((header, grid))
}

/// Display text of a spreadsheet cell; blanks and errors become ""
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        other                        => other.to_string(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_title_and_abstract() {
        let csv = "Title,Abstract,Year\nA,\"Ulva grows in Bali and bali.\",2020\nB,Kelp,2021\n";
        let rows = parse_tabular(csv.as_bytes(), "csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title.as_deref(), Some("A"));
        assert_eq!(rows[0].abstract_, "Ulva grows in Bali and bali.");
        assert_eq!(rows[1].abstract_, "Kelp");
    }

    #[test]
    fn test_missing_abstract_column() {
        let csv = "Title,Summary\nA,Ulva\n";
        let err = parse_tabular(csv.as_bytes(), "csv").unwrap_err();
        assert!(matches!(err, NerError::MissingColumn(ref c) if c == "Abstract"));
    }

    #[test]
    fn test_abstract_column_is_case_sensitive() {
        let csv = "title,abstract\nA,Ulva\n";
        assert!(matches!(
            parse_tabular(csv.as_bytes(), "csv"),
            Err(NerError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_title_column_optional() {
        let csv = "Abstract\nSargassum in Java\n\"\"\n";
        let rows = parse_tabular(csv.as_bytes(), ".CSV").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, None);
        // Empty abstracts are kept, one row per input row
        assert_eq!(rows[1].abstract_, "");
    }

    #[test]
    fn test_blank_title_is_none() {
        let csv = "Title,Abstract\n  ,Ulva\n";
        let rows = parse_tabular(csv.as_bytes(), "csv").unwrap();
        assert_eq!(rows[0].title, None);
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let csv = "Title,Abstract\nOnly a title\n";
        let rows = parse_tabular(csv.as_bytes(), "csv").unwrap();
        assert_eq!(rows[0].abstract_, "");
    }

    #[test]
    fn test_bom_in_header() {
        let csv = "\u{FEFF}Abstract\nUlva\n";
        let rows = parse_tabular(csv.as_bytes(), "csv").unwrap();
        assert_eq!(rows[0].abstract_, "Ulva");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_tabular(b"Abstract\nx\n", "txt").unwrap_err();
        assert!(matches!(err, NerError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_unreadable_workbook() {
        let err = parse_tabular(b"definitely not a zip archive", "xlsx").unwrap_err();
        assert!(matches!(err, NerError::UnreadableDocument(_)));
    }
}
