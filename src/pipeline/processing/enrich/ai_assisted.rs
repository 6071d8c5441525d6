use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::app::ports::CompletionPort;
use crate::common::constants::AI_ASSISTED_THRESHOLD;
use crate::domain::{clip_description, EnrichmentStatus, PartRecord, RawRow};
use crate::pipeline::processing::categorize::{Categorizer, Taxonomy};
use crate::pipeline::processing::labor::LaborEstimator;

use super::{DegradeReason, EnrichedPart, Enricher, EnrichmentContext, EnrichmentMetadata};

/// Worked examples included with every extraction prompt so the completion
/// service answers in the expected JSON shape.
const FEW_SHOT_EXAMPLES: &str = r#"Row: Part Number: ZR34K5-PFV | Description: COPELAND SCROLL COMPRESSOR 3 TON | Price: 612.00
JSON: {"manufacturer": "Copeland", "model_number": "ZR34K5-PFV", "part_number": "ZR34K5-PFV", "cost": 612.00, "category": "compressor", "description": "Copeland scroll compressor, 3 ton", "confidence_score": 92}

Row: HC41TE113 | COND FAN MTR 1/4HP 208/230V | $189.99
JSON: {"manufacturer": "Carrier", "model_number": "HC41TE113", "part_number": "HC41TE113", "cost": 189.99, "category": "condenser fan motor", "description": "Condenser fan motor, 1/4 HP, 208/230V", "confidence_score": 88}"#;

/// The structured response expected back from the completion service.
/// `confidence_score` is required: a response without it is malformed.
#[derive(Debug, Deserialize)]
struct CompletionDraft {
    #[serde(default)]
    manufacturer: Option<String>,
    #[serde(default)]
    model_number: Option<String>,
    #[serde(default)]
    part_number: Option<String>,
    #[serde(default)]
    cost: Option<f64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    confidence_score: i64,
}

/// AI-assisted strategy: delegates extraction of every field to an external
/// reasoning call over the row's rendered text. Any malformed or failed
/// response yields a zero-confidence stub rather than failing the batch.
pub struct AiAssistedEnricher {
    categorizer: Categorizer,
    labor: LaborEstimator,
    completion: Arc<dyn CompletionPort>,
    timeout: Duration,
}

impl AiAssistedEnricher {
    pub fn new(
        taxonomy: Arc<Taxonomy>,
        completion: Arc<dyn CompletionPort>,
        timeout: Duration,
    ) -> Self {
        Self {
            categorizer: Categorizer::new(taxonomy.clone()),
            labor: LaborEstimator::new(taxonomy),
            completion,
            timeout,
        }
    }

    fn build_prompt(row_text: &str) -> String {
        format!(
            "Extract a structured HVAC part record from the pricebook row below.\n\
             Answer with a single JSON object shaped exactly like the examples.\n\n\
             {}\n\n\
             Row: {}\n\
             JSON:",
            FEW_SHOT_EXAMPLES, row_text
        )
    }

    /// Pull the first JSON object out of the completion text. Completions
    /// routinely arrive wrapped in prose or code fences.
    fn parse_completion(completion: &str) -> Option<CompletionDraft> {
        let start = completion.find('{')?;
        let end = completion.rfind('}')?;
        if end <= start {
            return None;
        }
        serde_json::from_str(&completion[start..=end]).ok()
    }

    fn stub(&self, raw_input: String, reason: DegradeReason, warning: String) -> EnrichedPart {
        EnrichedPart {
            record: PartRecord::stub(raw_input),
            enrichment: EnrichmentMetadata::new(self.name(), Some(reason), vec![warning]),
        }
    }
}

#[async_trait]
impl Enricher for AiAssistedEnricher {
    async fn enrich(&self, row: &RawRow, _ctx: &EnrichmentContext) -> EnrichedPart {
        let raw_input = row.rendered_text();
        let prompt = Self::build_prompt(&raw_input);

        // One bounded call; no retry on failure
        let completion = match tokio::time::timeout(self.timeout, self.completion.complete(&prompt))
            .await
        {
            Err(_) => {
                warn!("completion call timed out");
                return self.stub(
                    raw_input,
                    DegradeReason::LookupTimedOut,
                    "completion call timed out".to_string(),
                );
            }
            Ok(Err(e)) => {
                warn!(error = %e, "completion call failed");
                return self.stub(
                    raw_input,
                    DegradeReason::LookupFailed,
                    format!("completion call failed: {}", e),
                );
            }
            Ok(Ok(text)) => text,
        };

        let Some(draft) = Self::parse_completion(&completion) else {
            warn!("completion response could not be parsed");
            return self.stub(
                raw_input,
                DegradeReason::UnparseableResponse,
                "completion response could not be parsed".to_string(),
            );
        };
        debug!("parsed completion draft");

        let mut warnings = Vec::new();

        let cost = match draft.cost {
            Some(c) if c >= 0.0 => c,
            Some(_) => {
                warnings.push("negative cost in completion, defaulting to 0".to_string());
                0.0
            }
            None => 0.0,
        };

        // Re-resolve the model's category text through the taxonomy so
        // folders and labor stay canonical even when it free-texts one
        let category_text = draft
            .category
            .clone()
            .or_else(|| draft.description.clone())
            .unwrap_or_else(|| raw_input.clone());
        let category = self.categorizer.categorize(&category_text);

        let manufacturer = draft
            .manufacturer
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        let part_number = draft.part_number.unwrap_or_default().trim().to_string();
        let model_number = draft
            .model_number
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| part_number.clone());

        let standard_name = if model_number.is_empty() {
            category.display.to_string()
        } else {
            format!("{} {}", category.display, model_number)
        };

        let description = draft
            .description
            .map(|d| clip_description(&d))
            .unwrap_or_default();

        let record = PartRecord {
            manufacturer,
            model_number,
            part_number,
            cost,
            folder_1: self.categorizer.taxonomy().root_folder.to_string(),
            folder_2: category.folder.to_string(),
            folder_3: String::new(),
            standard_name,
            description,
            labor_hours: self.labor.estimate(category.name),
            confidence_score: draft.confidence_score.clamp(0, 100) as u8,
            enrichment_status: EnrichmentStatus::Found,
            raw_input,
        };

        EnrichedPart {
            record,
            enrichment: EnrichmentMetadata::new(self.name(), None, warnings),
        }
    }

    fn name(&self) -> &'static str {
        "ai_assisted"
    }

    fn default_threshold(&self) -> u8 {
        AI_ASSISTED_THRESHOLD
    }
}
