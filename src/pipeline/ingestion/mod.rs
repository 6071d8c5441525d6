use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::common::error::{PipelineError, Result};
use crate::domain::{CellValue, RawRow};

/// Keywords that mark a row as the true header row. Distributor exports
/// routinely put branding, contact blocks, or blank lines above the header.
pub const HEADER_KEYWORDS: &[&str] = &[
    "part",
    "model",
    "item",
    "description",
    "price",
    "product",
    "#",
];

/// Locates the header row in an unlabeled table and re-parses the source
/// into ordered column-label → cell-value rows.
pub struct TableIngestor;

impl TableIngestor {
    /// Scan rows top-to-bottom and return the index of the first row whose
    /// concatenated lower-cased text contains any header keyword. Falls back
    /// to index 0 when nothing matches; the fallback is policy, not failure.
    pub fn locate_header(rows: &[Vec<CellValue>]) -> usize {
        for (idx, row) in rows.iter().enumerate() {
            let joined = row
                .iter()
                .map(|c| c.render().to_lowercase())
                .collect::<Vec<_>>()
                .join(" ");
            if HEADER_KEYWORDS.iter().any(|kw| joined.contains(kw)) {
                return idx;
            }
        }
        0
    }

    /// Read a tabular source, dispatching on extension: delimited text for
    /// `.csv`/`.txt`/`.tsv`, workbook for `.xlsx`/`.xls`. Anything that
    /// cannot be parsed as tabular data at all is `SourceUnreadable`.
    pub fn read_path(path: &Path) -> Result<Vec<RawRow>> {
        Ok(Self::assemble(Self::read_grid(path)?))
    }

    /// Diagnostic: the header index the scan would pick for a source, plus
    /// the labels that row carries.
    pub fn preview_header(path: &Path) -> Result<(usize, Vec<String>)> {
        let grid = Self::read_grid(path)?;
        let header_idx = Self::locate_header(&grid);
        let labels = grid
            .get(header_idx)
            .map(|row| row.iter().map(|c| c.render()).collect())
            .unwrap_or_default();
        Ok((header_idx, labels))
    }

    fn read_grid(path: &Path) -> Result<Vec<Vec<CellValue>>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "xlsx" | "xls" => Self::read_workbook(path),
            _ => {
                let file = File::open(path).map_err(|e| {
                    PipelineError::unreadable(path.display().to_string(), e)
                })?;
                Self::read_delimited(file, &path.display().to_string(), ext == "tsv")
            }
        }
    }

    /// Read delimited text from any reader. Exposed separately so tests can
    /// feed in-memory data without touching the filesystem.
    pub fn read_csv(reader: impl Read, origin: &str) -> Result<Vec<RawRow>> {
        let grid = Self::read_delimited(reader, origin, false)?;
        Ok(Self::assemble(grid))
    }

    fn read_delimited(reader: impl Read, origin: &str, tab: bool) -> Result<Vec<Vec<CellValue>>> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(if tab { b'\t' } else { b',' })
            .from_reader(reader);

        let mut grid = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| PipelineError::unreadable(origin, e))?;
            let row: Vec<CellValue> = record.iter().map(Self::parse_text_cell).collect();
            grid.push(row);
        }
        Ok(grid)
    }

    fn read_workbook(path: &Path) -> Result<Vec<Vec<CellValue>>> {
        let origin = path.display().to_string();
        let mut workbook =
            open_workbook_auto(path).map_err(|e| PipelineError::unreadable(&origin, e))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| PipelineError::unreadable(&origin, "workbook has no worksheets"))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| PipelineError::unreadable(&origin, e))?;

        let mut grid = Vec::new();
        for data_row in range.rows() {
            let row: Vec<CellValue> = data_row.iter().map(Self::convert_workbook_cell).collect();
            grid.push(row);
        }
        Ok(grid)
    }

    /// A delimited-text cell is numeric only when the whole trimmed cell
    /// parses as a finite number; "$1,075.52" stays text for the extractors.
    fn parse_text_cell(raw: &str) -> CellValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    fn convert_workbook_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(trimmed.to_string())
                }
            }
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::Error(_) => CellValue::Empty,
            other => {
                let rendered = other.to_string();
                if rendered.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(rendered.trim().to_string())
                }
            }
        }
    }

    /// Take the raw grid, locate the header, and build rows from everything
    /// below it. Fully-empty rows are dropped; short rows keep their
    /// positional labels and long rows get blank labels for the overflow.
    fn assemble(grid: Vec<Vec<CellValue>>) -> Vec<RawRow> {
        if grid.is_empty() {
            return Vec::new();
        }

        let header_idx = Self::locate_header(&grid);
        debug!(header_idx, "located header row");

        let labels: Vec<String> = grid[header_idx].iter().map(|c| c.render()).collect();

        let mut rows = Vec::new();
        for data_row in grid.into_iter().skip(header_idx + 1) {
            let cells: Vec<(String, CellValue)> = data_row
                .into_iter()
                .enumerate()
                .map(|(i, value)| {
                    let label = labels.get(i).cloned().unwrap_or_default();
                    (label, value)
                })
                .collect();

            let row = RawRow::new(cells);
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        info!(row_count = rows.len(), "ingested tabular source");
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_locate_header_skips_leading_noise() {
        let grid = vec![
            vec![CellValue::Empty, CellValue::Empty],
            vec![text("Acme Distributing LLC"), CellValue::Empty],
            vec![text("Part Number"), text("Description"), text("Price")],
            vec![text("ZR34K5"), text("Scroll Compressor"), CellValue::Number(450.0)],
        ];
        assert_eq!(TableIngestor::locate_header(&grid), 2);
    }

    #[test]
    fn test_locate_header_falls_back_to_first_row() {
        let grid = vec![
            vec![text("alpha"), text("beta")],
            vec![text("gamma"), text("delta")],
        ];
        assert_eq!(TableIngestor::locate_header(&grid), 0);
    }

    #[test]
    fn test_read_csv_builds_labeled_rows() {
        let data = "\n\
            Acme Distributing,,\n\
            Part Number,Description,Price\n\
            ZR34K5,Scroll Compressor,450.00\n\
            ,,\n\
            HC41TE113,Condenser Fan Motor,189.99\n";

        let rows = TableIngestor::read_csv(data.as_bytes(), "inline").unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.cells()[0].0, "Part Number");
        assert_eq!(first.cells()[0].1, text("ZR34K5"));
        assert_eq!(first.cells()[2].1, CellValue::Number(450.0));
    }

    #[test]
    fn test_read_csv_keeps_currency_strings_as_text() {
        let data = "Part,Price\nZR34K5,\"$1,075.52\"\n";
        let rows = TableIngestor::read_csv(data.as_bytes(), "inline").unwrap();
        assert_eq!(rows[0].cells()[1].1, text("$1,075.52"));
    }

    #[test]
    fn test_read_csv_treats_nan_text_as_missing() {
        // "nan" parses as an f64 NaN; it must not become a numeric cell
        let data = "Part,Price\nnan,25.00\n";
        let rows = TableIngestor::read_csv(data.as_bytes(), "inline").unwrap();
        assert!(rows[0].cells()[0].1.is_missing());
    }

    #[test]
    fn test_unreadable_source_is_fatal() {
        let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
        temp.write_all(&[0xff, 0xfe, 0x00, 0x01, 0xff]).unwrap();

        let result = TableIngestor::read_path(temp.path());
        assert!(matches!(
            result,
            Err(PipelineError::SourceUnreadable { .. })
        ));
    }
}
