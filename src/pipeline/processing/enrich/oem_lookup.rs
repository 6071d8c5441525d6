use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::app::ports::WebLookupPort;
use crate::common::constants::{
    OEM_BONUS_DESCRIPTION, OEM_BONUS_PART_NUMBER, OEM_BONUS_PRICE, OEM_CONFIDENCE_BASE,
    OEM_LOOKUP_THRESHOLD,
};
use crate::config::LookupSettings;
use crate::domain::{clip_description, EnrichmentStatus, PartRecord, RawRow};
use crate::pipeline::processing::categorize::{Categorizer, Taxonomy};
use crate::pipeline::processing::labor::LaborEstimator;

use super::pacer::LookupPacer;
use super::{
    extract_base, DegradeReason, EnrichedPart, Enricher, EnrichmentContext, EnrichmentMetadata,
};

/// Pacing and timeout configuration for the OEM lookup strategy.
#[derive(Debug, Clone)]
pub struct OemLookupConfig {
    pub delay: Duration,
    pub timeout: Duration,
}

impl From<&LookupSettings> for OemLookupConfig {
    fn from(settings: &LookupSettings) -> Self {
        Self {
            delay: settings.delay(),
            timeout: settings.timeout(),
        }
    }
}

/// Lookup-assisted strategy: extracts part number and price locally, then
/// issues one paced, bounded web lookup keyed by part number plus the
/// configured brand and distributor domain. Confidence is the sum of four
/// independent signals, capped at 100.
pub struct OemLookupEnricher {
    categorizer: Categorizer,
    labor: LaborEstimator,
    web: Arc<dyn WebLookupPort>,
    pacer: LookupPacer,
    timeout: Duration,
}

impl OemLookupEnricher {
    pub fn new(taxonomy: Arc<Taxonomy>, web: Arc<dyn WebLookupPort>, config: OemLookupConfig) -> Self {
        Self {
            categorizer: Categorizer::new(taxonomy.clone()),
            labor: LaborEstimator::new(taxonomy),
            web,
            pacer: LookupPacer::new(config.delay),
            timeout: config.timeout,
        }
    }

    fn build_query(part_number: &str, ctx: &EnrichmentContext) -> String {
        let mut terms = Vec::new();
        if let Some(brand) = ctx.brand {
            terms.push(brand.as_str().to_string());
        }
        terms.push(part_number.to_string());
        if let Some(domain) = ctx.distributor {
            terms.push(format!("site:{}", domain.as_str()));
        }
        terms.join(" ")
    }
}

#[async_trait]
impl Enricher for OemLookupEnricher {
    async fn enrich(&self, row: &RawRow, ctx: &EnrichmentContext) -> EnrichedPart {
        let base = extract_base(row, &self.categorizer, &self.labor);
        debug!(
            part_number = %base.part_number,
            category = %base.category_name,
            "local extraction before lookup"
        );

        let has_part_number = !base.part_number.is_empty();
        let has_cost = base.cost > 0.0;

        let mut warnings = Vec::new();
        let mut degrade = None;
        let mut status = EnrichmentStatus::NotFound;
        let mut description = base.description.clone();
        let mut found_description = false;

        if has_part_number {
            let query = Self::build_query(&base.part_number, ctx);
            debug!(%query, "issuing OEM lookup");

            // One paced, bounded call; no retry on failure
            self.pacer.pace().await;
            match tokio::time::timeout(self.timeout, self.web.lookup(&query)).await {
                Err(_) => {
                    warn!(part_number = %base.part_number, "OEM lookup timed out");
                    degrade = Some(DegradeReason::LookupTimedOut);
                    warnings.push("OEM lookup timed out".to_string());
                }
                Ok(Err(e)) => {
                    warn!(part_number = %base.part_number, error = %e, "OEM lookup failed");
                    degrade = Some(DegradeReason::LookupFailed);
                    warnings.push(format!("OEM lookup failed: {}", e));
                }
                Ok(Ok(snippet)) => {
                    let snippet = snippet.trim();
                    if snippet.is_empty() {
                        warnings.push("OEM lookup returned no description".to_string());
                    } else {
                        description = clip_description(snippet);
                        status = EnrichmentStatus::Found;
                        found_description = true;
                    }
                }
            }
        } else {
            degrade = Some(DegradeReason::MissingFields);
            warnings.push("no part number extracted, lookup skipped".to_string());
        }

        if degrade.is_none() && !has_cost {
            degrade = Some(DegradeReason::MissingFields);
            warnings.push("no price extracted, cost defaults to 0".to_string());
        }

        // Four independent signals, capped at 100
        let mut confidence = OEM_CONFIDENCE_BASE as u16;
        if has_part_number {
            confidence += OEM_BONUS_PART_NUMBER as u16;
        }
        if has_cost {
            confidence += OEM_BONUS_PRICE as u16;
        }
        if found_description {
            confidence += OEM_BONUS_DESCRIPTION as u16;
        }
        let confidence = confidence.min(100) as u8;

        let manufacturer = ctx
            .brand
            .map(|b| b.as_str().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let record = PartRecord {
            manufacturer,
            model_number: base.part_number.clone(),
            part_number: base.part_number,
            cost: base.cost,
            folder_1: base.folder_1,
            folder_2: base.folder_2,
            folder_3: String::new(),
            standard_name: base.standard_name,
            description,
            labor_hours: base.labor_hours,
            confidence_score: confidence,
            enrichment_status: status,
            raw_input: base.raw_input,
        };

        EnrichedPart {
            record,
            enrichment: EnrichmentMetadata::new(self.name(), degrade, warnings),
        }
    }

    fn name(&self) -> &'static str {
        "oem_lookup"
    }

    fn default_threshold(&self) -> u8 {
        OEM_LOOKUP_THRESHOLD
    }
}
