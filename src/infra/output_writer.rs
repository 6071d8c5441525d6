use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::common::error::Result;
use crate::pipeline::processing::enrich::EnrichedPart;
use crate::pipeline::processing::format::OutputRow;

/// One line of the human-review spreadsheet: the fields a reviewer needs
/// plus the score and reason that routed the record here.
#[derive(Debug, Serialize)]
struct ReviewRow<'a> {
    #[serde(rename = "Confidence")]
    confidence: u8,
    #[serde(rename = "Reason")]
    reason: String,
    #[serde(rename = "Item Name")]
    item_name: &'a str,
    #[serde(rename = "Part Number")]
    part_number: &'a str,
    #[serde(rename = "Cost")]
    cost: f64,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Original Row")]
    raw_input: &'a str,
}

/// Writes the batch artifacts under one output directory: accepted rows as
/// a delimited file, rejected records as a review file, and optionally a
/// full-fidelity NDJSON dump of every enriched record.
pub struct OutputWriter {
    out_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(out_dir: impl AsRef<Path>) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&out_dir)?;
        Ok(Self { out_dir })
    }

    pub fn write_accepted(&self, rows: &[OutputRow]) -> Result<PathBuf> {
        let path = self.out_dir.join("accepted_parts.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            match row {
                OutputRow::Bundle(r) => writer.serialize(r)?,
                OutputRow::SinglePart(r) => writer.serialize(r)?,
                OutputRow::SupplierLoader(r) => writer.serialize(r)?,
            }
        }
        writer.flush()?;
        info!(count = rows.len(), path = %path.display(), "wrote accepted rows");
        Ok(path)
    }

    pub fn write_review(&self, parts: &[EnrichedPart]) -> Result<PathBuf> {
        let path = self.out_dir.join("needs_review.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        for part in parts {
            let reason = part
                .enrichment
                .degrade
                .map(|r| format!("{:?}", r))
                .unwrap_or_else(|| "below threshold".to_string());
            writer.serialize(ReviewRow {
                confidence: part.record.confidence_score,
                reason,
                item_name: &part.record.standard_name,
                part_number: &part.record.part_number,
                cost: part.record.cost,
                description: &part.record.description,
                raw_input: &part.record.raw_input,
            })?;
        }
        writer.flush()?;
        info!(count = parts.len(), path = %path.display(), "wrote review rows");
        Ok(path)
    }

    /// Full-fidelity dump of enriched records, scores and degrade
    /// reasons included.
    pub fn write_dump(&self, parts: &[EnrichedPart]) -> Result<PathBuf> {
        let path = self.out_dir.join("all_records.ndjson");
        let file: File = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);
        for part in parts {
            let line = serde_json::to_string(part)?;
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        info!(count = parts.len(), path = %path.display(), "wrote full dump");
        Ok(path)
    }
}
