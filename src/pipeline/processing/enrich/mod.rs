use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{PartRecord, RawRow};
use crate::pipeline::processing::categorize::Categorizer;
use crate::pipeline::processing::extract::FieldExtractor;
use crate::pipeline::processing::format::TemplateKind;
use crate::pipeline::processing::labor::LaborEstimator;

pub mod ai_assisted;
pub mod oem_lookup;
pub mod pacer;
pub mod rule_based;

pub use ai_assisted::AiAssistedEnricher;
pub use oem_lookup::{OemLookupConfig, OemLookupEnricher};
pub use rule_based::RuleBasedEnricher;

/// The three interchangeable enrichment strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum StrategyKind {
    RuleBased,
    AiAssisted,
    OemLookup,
}

/// OEM brands the lookup strategy can be keyed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum OemBrand {
    Carrier,
    Trane,
    Lennox,
    Goodman,
    Rheem,
    York,
}

impl OemBrand {
    pub fn as_str(&self) -> &'static str {
        match self {
            OemBrand::Carrier => "Carrier",
            OemBrand::Trane => "Trane",
            OemBrand::Lennox => "Lennox",
            OemBrand::Goodman => "Goodman",
            OemBrand::Rheem => "Rheem",
            OemBrand::York => "York",
        }
    }
}

/// Distributor domains the lookup strategy may scope queries to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum DistributorDomain {
    RepairClinic,
    SupplyHouse,
    Ferguson,
    Grainger,
}

impl DistributorDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributorDomain::RepairClinic => "repairclinic.com",
            DistributorDomain::SupplyHouse => "supplyhouse.com",
            DistributorDomain::Ferguson => "ferguson.com",
            DistributorDomain::Grainger => "grainger.com",
        }
    }
}

/// Run-level configuration handed to every enrichment call.
#[derive(Debug, Clone)]
pub struct EnrichmentContext {
    pub template: TemplateKind,
    pub supplier_name: String,
    /// Brand the OEM lookup strategy keys its queries to.
    pub brand: Option<OemBrand>,
    /// Distributor domain the OEM lookup strategy scopes its queries to.
    pub distributor: Option<DistributorDomain>,
}

/// Why an enrichment produced a degraded record instead of a full one.
/// Degradation is data, not an error: the batch always completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegradeReason {
    /// Part number and/or price could not be extracted from the row.
    MissingFields,
    /// The external call failed outright (transport or service error).
    LookupFailed,
    /// The external call exceeded its single bounded timeout.
    LookupTimedOut,
    /// The external service answered, but the response could not be parsed.
    UnparseableResponse,
}

/// A canonical record plus metadata about how enrichment went.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedPart {
    pub record: PartRecord,
    pub enrichment: EnrichmentMetadata,
}

impl EnrichedPart {
    pub fn confidence(&self) -> u8 {
        self.record.confidence_score
    }
}

/// Metadata about the enrichment process for one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentMetadata {
    /// The enrichment strategy used.
    pub strategy: String,
    /// Present when the record is degraded; tests assert on this.
    pub degrade: Option<DegradeReason>,
    /// Softer notes that did not degrade the record.
    pub warnings: Vec<String>,
    /// When this enrichment was performed.
    pub enriched_at: DateTime<Utc>,
}

impl EnrichmentMetadata {
    pub fn new(strategy: &str, degrade: Option<DegradeReason>, warnings: Vec<String>) -> Self {
        Self {
            strategy: strategy.to_string(),
            degrade,
            warnings,
            enriched_at: Utc::now(),
        }
    }
}

/// Common contract for the three enrichment strategies.
///
/// `enrich` is infallible by design: external-call trouble degrades the
/// record's confidence and is reported through `EnrichmentMetadata`, never
/// raised past this boundary, so a batch always yields one record per row.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, row: &RawRow, ctx: &EnrichmentContext) -> EnrichedPart;

    /// Strategy name used in logs and metadata.
    fn name(&self) -> &'static str;

    /// The review-gate threshold observed for this strategy; configuration,
    /// not a hidden constant — callers may override it.
    fn default_threshold(&self) -> u8;
}

/// Locally-extractable fields shared by the rule-based and OEM strategies.
pub(crate) struct BaseFields {
    pub part_number: String,
    pub cost: f64,
    pub category_name: String,
    pub folder_1: String,
    pub folder_2: String,
    pub standard_name: String,
    pub description: String,
    pub labor_hours: f64,
    pub raw_input: String,
}

pub(crate) fn extract_base(
    row: &RawRow,
    categorizer: &Categorizer,
    labor: &LaborEstimator,
) -> BaseFields {
    let raw_input = row.rendered_text();
    let part_number = FieldExtractor::part_number(row);
    let cost = FieldExtractor::price(row);
    let description = FieldExtractor::description(row);

    // Categorize over the row text plus extracted fields
    let category = categorizer.categorize(&format!("{} {}", raw_input, part_number));

    let standard_name = if part_number.is_empty() {
        category.display.to_string()
    } else {
        format!("{} {}", category.display, part_number)
    };

    BaseFields {
        part_number,
        cost,
        category_name: category.name.to_string(),
        folder_1: categorizer.taxonomy().root_folder.to_string(),
        folder_2: category.folder.to_string(),
        standard_name,
        description,
        labor_hours: labor.estimate(category.name),
        raw_input,
    }
}
