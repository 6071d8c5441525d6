pub mod categorize;
pub mod enrich;
pub mod extract;
pub mod format;
pub mod labor;
pub mod review_gate;

pub use categorize::{Categorizer, Taxonomy};
pub use enrich::{EnrichedPart, Enricher, EnrichmentContext, StrategyKind};
pub use extract::FieldExtractor;
pub use format::{OutputRow, PricingConfig, TemplateFormatter, TemplateKind};
pub use labor::LaborEstimator;
pub use review_gate::ReviewGate;
