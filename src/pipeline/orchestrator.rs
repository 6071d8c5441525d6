use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::RawRow;
use crate::pipeline::processing::enrich::{EnrichedPart, Enricher, EnrichmentContext};
use crate::pipeline::processing::format::{OutputRow, PricingConfig, TemplateFormatter};
use crate::pipeline::processing::review_gate::ReviewGate;

/// Run-level summary of one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub strategy: String,
    pub threshold: u8,
    pub total_rows: usize,
    pub accepted: usize,
    pub needs_review: usize,
    pub degraded: usize,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Everything one batch run produces.
#[derive(Debug)]
pub struct BatchOutcome {
    pub accepted: Vec<EnrichedPart>,
    pub needs_review: Vec<EnrichedPart>,
    pub output_rows: Vec<OutputRow>,
    pub report: BatchReport,
}

/// Drives one batch through the pipeline: rows are enriched one at a time
/// in source order, partitioned by the review gate, and accepted records
/// are projected into the selected output template.
pub struct Orchestrator {
    enricher: Arc<dyn Enricher>,
    gate: ReviewGate,
    pricing: PricingConfig,
}

impl Orchestrator {
    /// `threshold` overrides the strategy's observed default when given.
    pub fn new(enricher: Arc<dyn Enricher>, threshold: Option<u8>, pricing: PricingConfig) -> Self {
        let gate = ReviewGate::new(threshold.unwrap_or(enricher.default_threshold()));
        Self {
            enricher,
            gate,
            pricing,
        }
    }

    /// Process a batch. Cancellation is checked between rows: a row either
    /// completes fully or is not started, never partially applied.
    pub async fn run(
        &self,
        rows: Vec<RawRow>,
        ctx: &EnrichmentContext,
        cancel: &AtomicBool,
    ) -> BatchOutcome {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total_rows = rows.len();
        info!(
            %run_id,
            strategy = self.enricher.name(),
            total_rows,
            "starting batch run"
        );

        let mut enriched = Vec::with_capacity(total_rows);
        let mut cancelled = false;

        for (idx, row) in rows.into_iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                warn!(%run_id, completed = idx, "batch cancelled between rows");
                cancelled = true;
                break;
            }
            let part = self.enricher.enrich(&row, ctx).await;
            enriched.push(part);
        }

        let degraded = enriched
            .iter()
            .filter(|p| p.enrichment.degrade.is_some())
            .count();

        let (accepted, needs_review) = self.gate.partition(enriched);

        let output_rows: Vec<OutputRow> = accepted
            .iter()
            .map(|p| TemplateFormatter::format(&p.record, ctx.template, &self.pricing))
            .collect();

        let report = BatchReport {
            run_id,
            strategy: self.enricher.name().to_string(),
            threshold: self.gate.threshold(),
            total_rows,
            accepted: accepted.len(),
            needs_review: needs_review.len(),
            degraded,
            cancelled,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            %run_id,
            accepted = report.accepted,
            needs_review = report.needs_review,
            degraded = report.degraded,
            cancelled = report.cancelled,
            "batch run finished"
        );

        BatchOutcome {
            accepted,
            needs_review,
            output_rows,
            report,
        }
    }
}
