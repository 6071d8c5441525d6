use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{clip_description, RawRow};

/// Column labels that mark a cell as carrying the part/model number.
pub const PART_LABEL_KEYS: &[&str] = &["model", "part", "item", "#"];

/// Column labels that mark a cell as carrying descriptive text.
pub const DESCRIPTION_LABEL_KEYS: &[&str] = &["desc"];

// Fallback shape for a part number: 4-20 uppercase letters/digits/hyphens.
static PART_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9-]{4,20}$").expect("valid part number pattern"));

// Fallback shape for a textual price token: optional dollar sign, digits
// with optional thousands separators, up to two decimal places.
static PRICE_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?\d+(?:,\d{3})*(?:\.\d{1,2})?$").expect("valid price pattern"));

/// Best-effort extraction of a part number and price from one free-form row.
pub struct FieldExtractor;

impl FieldExtractor {
    /// Extract the best-guess part/model number.
    ///
    /// Priority: the first non-missing cell under a label containing
    /// "model", "part", "item", or "#" wins. Only when no labeled column
    /// yields a value does the shape-based fallback scan all text cells.
    /// Within each method, first occurrence in row order wins.
    pub fn part_number(row: &RawRow) -> String {
        for (label, value) in row.cells() {
            let label_lower = label.to_lowercase();
            if PART_LABEL_KEYS.iter().any(|k| label_lower.contains(k)) && !value.is_missing() {
                return value.render();
            }
        }

        for (_, value) in row.cells() {
            if let Some(text) = value.as_text() {
                let candidate = text.trim();
                if PART_NUMBER_PATTERN.is_match(candidate) {
                    return candidate.to_string();
                }
            }
        }

        String::new()
    }

    /// Extract the best-guess price.
    ///
    /// The first numeric cell greater than 0 wins outright. Only when no
    /// such cell exists are text cells scanned in row order for a
    /// price-shaped token ("$1,075.52" and the like); the first token
    /// parses with its dollar sign and thousands separators stripped.
    /// Returns 0.0 as the explicit unknown-price sentinel.
    pub fn price(row: &RawRow) -> f64 {
        for (_, value) in row.cells() {
            if let Some(n) = value.as_number() {
                if n > 0.0 {
                    return n;
                }
            }
        }

        for (_, value) in row.cells() {
            if let Some(text) = value.as_text() {
                if let Some(parsed) = Self::parse_price_text(text) {
                    return parsed;
                }
            }
        }

        0.0
    }

    /// Descriptive text for the record: the first cell under a
    /// description-like label, falling back to the whole rendered row.
    pub fn description(row: &RawRow) -> String {
        for (label, value) in row.cells() {
            let label_lower = label.to_lowercase();
            if DESCRIPTION_LABEL_KEYS.iter().any(|k| label_lower.contains(k))
                && !value.is_missing()
            {
                return clip_description(&value.render());
            }
        }
        clip_description(&row.rendered_text())
    }

    fn parse_price_text(text: &str) -> Option<f64> {
        for token in text.split_whitespace() {
            if PRICE_TOKEN_PATTERN.is_match(token) {
                let cleaned = token.trim_start_matches('$').replace(',', "");
                return cleaned.parse::<f64>().ok();
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CellValue;

    fn row(cells: Vec<(&str, CellValue)>) -> RawRow {
        RawRow::new(
            cells
                .into_iter()
                .map(|(l, v)| (l.to_string(), v))
                .collect(),
        )
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_part_number_prefers_labeled_column() {
        let r = row(vec![
            ("Description", text("COPELAND SCROLL")),
            ("Model #", text("ZR34K5-PFV")),
            ("Price", CellValue::Number(450.0)),
        ]);
        assert_eq!(FieldExtractor::part_number(&r), "ZR34K5-PFV");
    }

    #[test]
    fn test_part_number_label_match_skips_nan_cells() {
        let r = row(vec![
            ("Part Number", text("nan")),
            ("Item Code", text("HC41TE113")),
        ]);
        assert_eq!(FieldExtractor::part_number(&r), "HC41TE113");
    }

    #[test]
    fn test_part_number_pattern_fallback() {
        let r = row(vec![
            ("Column A", text("Copeland scroll compressor")),
            ("Column B", text("ZR34K5")),
        ]);
        assert_eq!(FieldExtractor::part_number(&r), "ZR34K5");
    }

    #[test]
    fn test_part_number_empty_when_nothing_matches() {
        let r = row(vec![("Column A", text("three ton unit"))]);
        assert_eq!(FieldExtractor::part_number(&r), "");
    }

    #[test]
    fn test_price_numeric_cell_wins_outright() {
        // A textual price earlier in the row must not shadow a numeric cell
        let r = row(vec![
            ("List", text("$999.99")),
            ("Cost", CellValue::Number(450.25)),
        ]);
        assert_eq!(FieldExtractor::price(&r), 450.25);
    }

    #[test]
    fn test_price_textual_fallback_strips_separators() {
        let r = row(vec![
            ("Part", text("ZR34K5")),
            ("Price", text("$1,075.52")),
        ]);
        assert_eq!(FieldExtractor::price(&r), 1075.52);
    }

    #[test]
    fn test_price_ignores_part_number_digits() {
        let r = row(vec![("Part", text("ZR34K5"))]);
        assert_eq!(FieldExtractor::price(&r), 0.0);
    }

    #[test]
    fn test_price_token_inside_free_text() {
        let r = row(vec![("Notes", text("list $450.00 ea"))]);
        assert_eq!(FieldExtractor::price(&r), 450.0);
    }

    #[test]
    fn test_price_zero_sentinel_when_absent() {
        let r = row(vec![("Description", text("contact branch for pricing"))]);
        assert_eq!(FieldExtractor::price(&r), 0.0);
    }

    #[test]
    fn test_description_prefers_labeled_column() {
        let r = row(vec![
            ("Part", text("ZR34K5")),
            ("Description", text("Copeland scroll compressor, 3 ton")),
        ]);
        assert_eq!(
            FieldExtractor::description(&r),
            "Copeland scroll compressor, 3 ton"
        );
    }

    #[test]
    fn test_description_falls_back_to_rendered_row() {
        let r = row(vec![("Part", text("ZR34K5"))]);
        assert_eq!(FieldExtractor::description(&r), "Part: ZR34K5");
    }
}
