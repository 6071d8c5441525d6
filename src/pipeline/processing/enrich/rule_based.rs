use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::common::constants::{
    RULE_BASED_THRESHOLD, RULE_CONFIDENCE_FULL, RULE_CONFIDENCE_PARTIAL,
};
use crate::domain::{EnrichmentStatus, PartRecord, RawRow};
use crate::pipeline::processing::categorize::{Categorizer, Taxonomy};
use crate::pipeline::processing::labor::LaborEstimator;

use super::{
    extract_base, DegradeReason, EnrichedPart, Enricher, EnrichmentContext, EnrichmentMetadata,
};

/// Pure rule-based strategy: extraction, categorization, and labor lookup
/// only. No external calls, fully deterministic for a given row.
pub struct RuleBasedEnricher {
    categorizer: Categorizer,
    labor: LaborEstimator,
}

impl RuleBasedEnricher {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            categorizer: Categorizer::new(taxonomy.clone()),
            labor: LaborEstimator::new(taxonomy),
        }
    }
}

#[async_trait]
impl Enricher for RuleBasedEnricher {
    async fn enrich(&self, row: &RawRow, _ctx: &EnrichmentContext) -> EnrichedPart {
        let base = extract_base(row, &self.categorizer, &self.labor);
        debug!(
            part_number = %base.part_number,
            category = %base.category_name,
            "rule-based extraction"
        );

        let has_part_number = !base.part_number.is_empty();
        let has_cost = base.cost > 0.0;

        // Full confidence only when both extractions succeeded
        let confidence = if has_part_number && has_cost {
            RULE_CONFIDENCE_FULL
        } else {
            RULE_CONFIDENCE_PARTIAL
        };

        let mut warnings = Vec::new();
        if !has_part_number {
            warnings.push("no part number extracted".to_string());
        }
        if !has_cost {
            warnings.push("no price extracted, cost defaults to 0".to_string());
        }

        let record = PartRecord {
            manufacturer: "Unknown".to_string(),
            model_number: base.part_number.clone(),
            part_number: base.part_number,
            cost: base.cost,
            folder_1: base.folder_1,
            folder_2: base.folder_2,
            folder_3: String::new(),
            standard_name: base.standard_name,
            description: base.description,
            labor_hours: base.labor_hours,
            confidence_score: confidence,
            enrichment_status: EnrichmentStatus::NotAttempted,
            raw_input: base.raw_input,
        };

        let degrade = (!(has_part_number && has_cost)).then_some(DegradeReason::MissingFields);

        EnrichedPart {
            record,
            enrichment: EnrichmentMetadata::new(self.name(), degrade, warnings),
        }
    }

    fn name(&self) -> &'static str {
        "rule_based"
    }

    fn default_threshold(&self) -> u8 {
        RULE_BASED_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CellValue;
    use crate::pipeline::processing::format::TemplateKind;

    fn enricher() -> RuleBasedEnricher {
        RuleBasedEnricher::new(Arc::new(Taxonomy::default_hvac()))
    }

    fn ctx() -> EnrichmentContext {
        EnrichmentContext {
            template: TemplateKind::Bundle,
            supplier_name: "Acme Supply".to_string(),
            brand: None,
            distributor: None,
        }
    }

    fn full_row() -> RawRow {
        RawRow::new(vec![
            ("Part Number".to_string(), CellValue::Text("ZR34K5".to_string())),
            (
                "Description".to_string(),
                CellValue::Text("Copeland scroll compressor".to_string()),
            ),
            ("Price".to_string(), CellValue::Number(450.0)),
        ])
    }

    #[tokio::test]
    async fn test_confidence_is_85_with_model_and_cost() {
        let enriched = enricher().enrich(&full_row(), &ctx()).await;
        assert_eq!(enriched.record.confidence_score, 85);
        assert_eq!(enriched.record.manufacturer, "Unknown");
        assert_eq!(enriched.record.enrichment_status, EnrichmentStatus::NotAttempted);
        assert!(enriched.enrichment.degrade.is_none());
    }

    #[tokio::test]
    async fn test_confidence_is_70_without_price() {
        let row = RawRow::new(vec![
            ("Part Number".to_string(), CellValue::Text("ZR34K5".to_string())),
            (
                "Description".to_string(),
                CellValue::Text("scroll compressor".to_string()),
            ),
        ]);
        let enriched = enricher().enrich(&row, &ctx()).await;
        assert_eq!(enriched.record.confidence_score, 70);
        assert_eq!(enriched.record.cost, 0.0);
        assert_eq!(enriched.enrichment.degrade, Some(DegradeReason::MissingFields));
    }

    #[tokio::test]
    async fn test_confidence_is_70_without_part_number() {
        let row = RawRow::new(vec![
            (
                "Description".to_string(),
                CellValue::Text("three ton unit".to_string()),
            ),
            ("Price".to_string(), CellValue::Number(120.0)),
        ]);
        let enriched = enricher().enrich(&row, &ctx()).await;
        assert_eq!(enriched.record.confidence_score, 70);
        assert_eq!(enriched.record.part_number, "");
    }

    #[tokio::test]
    async fn test_enrichment_is_deterministic() {
        let e = enricher();
        let first = e.enrich(&full_row(), &ctx()).await;
        let second = e.enrich(&full_row(), &ctx()).await;
        assert_eq!(first.record.confidence_score, second.record.confidence_score);
        assert_eq!(first.record.standard_name, second.record.standard_name);
        assert_eq!(first.record.labor_hours, second.record.labor_hours);
    }
}
