use serde::{Deserialize, Serialize};

use crate::common::constants::DESCRIPTION_MAX_CHARS;

/// A single cell from a source table. Pricebooks mix typed spreadsheet
/// numbers with free-text cells, so both are kept distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Whether this cell carries no usable value. Spreadsheet exports
    /// frequently render missing cells as the literal string "nan".
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => {
                let t = s.trim();
                t.is_empty() || t.eq_ignore_ascii_case("nan")
            }
            CellValue::Number(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell for display and audit output. Whole numbers drop
    /// their trailing ".0" so part numbers stored as numbers read cleanly.
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Empty => String::new(),
        }
    }
}

/// One source row as an ordered mapping from column label to cell value.
/// Order is preserved from the source: extraction tie-breaks are defined
/// as "first occurrence in row order wins".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[(String, CellValue)] {
        &self.cells
    }

    /// A row is blank when no cell carries a usable value.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_missing())
    }

    /// Render the row as "label: value" pairs for categorization, prompt
    /// building, and the audit echo retained on the canonical record.
    pub fn rendered_text(&self) -> String {
        let mut parts = Vec::new();
        for (label, value) in &self.cells {
            if value.is_missing() {
                continue;
            }
            let label = label.trim();
            if label.is_empty() {
                parts.push(value.render());
            } else {
                parts.push(format!("{}: {}", label, value.render()));
            }
        }
        parts.join(" | ")
    }
}

/// Whether a lookup-capable strategy found external data for a record.
/// The pure strategy never attempts a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrichmentStatus {
    NotAttempted,
    Found,
    NotFound,
}

/// The canonical part record extracted from one pricebook row.
/// Immutable after enrichment; every downstream artifact is a projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartRecord {
    pub manufacturer: String,
    pub model_number: String,
    pub part_number: String,
    /// Non-negative; 0.0 is the explicit "unknown price" sentinel.
    pub cost: f64,
    pub folder_1: String,
    pub folder_2: String,
    pub folder_3: String,
    pub standard_name: String,
    pub description: String,
    pub labor_hours: f64,
    /// Heuristic trust measure in [0, 100] used to gate auto-acceptance.
    pub confidence_score: u8,
    pub enrichment_status: EnrichmentStatus,
    /// The source row's rendered text, retained for audit and review.
    pub raw_input: String,
}

impl PartRecord {
    /// Zero-confidence give-up record produced when an external strategy
    /// cannot yield anything usable for a row.
    pub fn stub(raw_input: String) -> Self {
        Self {
            manufacturer: String::new(),
            model_number: String::new(),
            part_number: String::new(),
            cost: 0.0,
            folder_1: String::new(),
            folder_2: String::new(),
            folder_3: String::new(),
            standard_name: String::new(),
            description: String::new(),
            labor_hours: 0.0,
            confidence_score: 0,
            enrichment_status: EnrichmentStatus::NotFound,
            raw_input,
        }
    }
}

/// Clip free text to the canonical description length, on a char boundary.
pub fn clip_description(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= DESCRIPTION_MAX_CHARS {
        return trimmed.to_string();
    }
    trimmed.chars().take(DESCRIPTION_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cells() {
        assert!(CellValue::Empty.is_missing());
        assert!(CellValue::Text("  ".to_string()).is_missing());
        assert!(CellValue::Text("nan".to_string()).is_missing());
        assert!(CellValue::Text("NaN".to_string()).is_missing());
        assert!(!CellValue::Text("ZR34K5".to_string()).is_missing());
        assert!(!CellValue::Number(0.0).is_missing());
    }

    #[test]
    fn test_render_whole_numbers_without_decimal() {
        assert_eq!(CellValue::Number(1075.0).render(), "1075");
        assert_eq!(CellValue::Number(1075.52).render(), "1075.52");
        assert_eq!(CellValue::Text("  ZR34K5 ".to_string()).render(), "ZR34K5");
    }

    #[test]
    fn test_rendered_text_skips_missing_and_blank_labels() {
        let row = RawRow::new(vec![
            ("Part Number".to_string(), CellValue::Text("ZR34K5".to_string())),
            ("".to_string(), CellValue::Text("Scroll Compressor".to_string())),
            ("Notes".to_string(), CellValue::Empty),
            ("Price".to_string(), CellValue::Number(450.0)),
        ]);
        assert_eq!(
            row.rendered_text(),
            "Part Number: ZR34K5 | Scroll Compressor | Price: 450"
        );
    }

    #[test]
    fn test_blank_row_detection() {
        let blank = RawRow::new(vec![
            ("A".to_string(), CellValue::Empty),
            ("B".to_string(), CellValue::Text("nan".to_string())),
        ]);
        assert!(blank.is_blank());

        let not_blank = RawRow::new(vec![("A".to_string(), CellValue::Number(1.0))]);
        assert!(!not_blank.is_blank());
    }

    #[test]
    fn test_clip_description() {
        let short = "Scroll compressor, 3 ton";
        assert_eq!(clip_description(short), short);

        let long = "x".repeat(500);
        assert_eq!(clip_description(&long).chars().count(), 180);
    }
}
