//! Core pipeline for normalizing distributor pricebooks into canonical
//! part records and rendering them into field-service price book templates.

pub mod app;
pub mod common;
pub mod config;
pub mod domain;
pub mod infra;
pub mod observability;
pub mod pipeline;

// Re-export commonly used types
pub use domain::{CellValue, PartRecord, RawRow};
pub use pipeline::ingestion::TableIngestor;
pub use pipeline::orchestrator::{BatchOutcome, BatchReport, Orchestrator};
pub use pipeline::processing::{
    EnrichedPart, Enricher, EnrichmentContext, OutputRow, PricingConfig, ReviewGate, StrategyKind,
    Taxonomy, TemplateFormatter, TemplateKind,
};
