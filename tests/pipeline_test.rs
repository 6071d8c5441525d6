use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::{tempdir, NamedTempFile};

use pricebook_normalizer::app::ports::{CompletionPort, WebLookupPort};
use pricebook_normalizer::common::error::PipelineError;
use pricebook_normalizer::config::LookupSettings;
use pricebook_normalizer::infra::OutputWriter;
use pricebook_normalizer::pipeline::processing::enrich::{
    AiAssistedEnricher, DistributorDomain, OemBrand, OemLookupConfig, OemLookupEnricher,
    RuleBasedEnricher,
};
use pricebook_normalizer::{
    EnrichmentContext, Orchestrator, PricingConfig, TableIngestor, Taxonomy, TemplateKind,
};

/// A pricebook the way distributors actually send them: branding and
/// contact noise above the real header, blank separator rows, mixed
/// numeric and currency-text prices.
const MESSY_PRICEBOOK: &str = "\
Acme Distributing LLC,,\n\
\"123 Supply Rd, Dayton OH\",,\n\
Part Number,Description,Price\n\
ZR34K5-PFV,COPELAND SCROLL COMPRESSOR 3 TON,612.00\n\
,,\n\
HC41TE113,COND FAN MTR 1/4HP,\"$189.99\"\n\
TSTAT100,,\n";

fn write_fixture(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn ctx(template: TemplateKind) -> EnrichmentContext {
    EnrichmentContext {
        template,
        supplier_name: "Acme Supply".to_string(),
        brand: Some(OemBrand::Carrier),
        distributor: Some(DistributorDomain::RepairClinic),
    }
}

struct AlwaysFailingCompletion;

#[async_trait]
impl CompletionPort for AlwaysFailingCompletion {
    async fn complete(&self, _prompt: &str) -> std::result::Result<String, String> {
        Err("service unavailable".to_string())
    }
}

struct StaticWebLookup;

#[async_trait]
impl WebLookupPort for StaticWebLookup {
    async fn lookup(&self, query: &str) -> std::result::Result<String, String> {
        Ok(format!("OEM data for {}", query))
    }
}

struct FailingWebLookup;

#[async_trait]
impl WebLookupPort for FailingWebLookup {
    async fn lookup(&self, _query: &str) -> std::result::Result<String, String> {
        Err("connection reset".to_string())
    }
}

#[test]
fn test_header_is_located_below_noise_rows() -> Result<()> {
    let fixture = write_fixture(MESSY_PRICEBOOK);
    let (idx, labels) = TableIngestor::preview_header(fixture.path())?;

    assert_eq!(idx, 2);
    assert_eq!(labels, vec!["Part Number", "Description", "Price"]);
    Ok(())
}

#[tokio::test]
async fn test_rule_based_batch_end_to_end() -> Result<()> {
    let fixture = write_fixture(MESSY_PRICEBOOK);
    let rows = TableIngestor::read_path(fixture.path())?;
    // Blank separator row is dropped; three data rows survive
    assert_eq!(rows.len(), 3);

    let enricher = Arc::new(RuleBasedEnricher::new(Arc::new(Taxonomy::default_hvac())));
    let orchestrator = Orchestrator::new(enricher, None, PricingConfig::default());
    let outcome = orchestrator
        .run(rows, &ctx(TemplateKind::Bundle), &AtomicBool::new(false))
        .await;

    // One record per ingested row, no exceptions
    assert_eq!(
        outcome.accepted.len() + outcome.needs_review.len(),
        outcome.report.total_rows
    );
    assert_eq!(outcome.report.total_rows, 3);

    // Fully extracted rows score 85; the row with no price scores 70,
    // which still clears the rule-based default threshold
    let all: Vec<_> = outcome.accepted.iter().collect();
    assert_eq!(all[0].record.confidence_score, 85);
    assert_eq!(all[0].record.cost, 612.0);
    // Currency text parses through the string fallback
    assert_eq!(all[1].record.cost, 189.99);
    assert_eq!(all[2].record.confidence_score, 70);
    Ok(())
}

#[tokio::test]
async fn test_failing_completion_service_never_aborts_the_batch() -> Result<()> {
    let fixture = write_fixture(MESSY_PRICEBOOK);
    let rows = TableIngestor::read_path(fixture.path())?;
    let row_count = rows.len();

    let enricher = Arc::new(AiAssistedEnricher::new(
        Arc::new(Taxonomy::default_hvac()),
        Arc::new(AlwaysFailingCompletion),
        Duration::from_secs(5),
    ));
    let orchestrator = Orchestrator::new(enricher, None, PricingConfig::default());
    let outcome = orchestrator
        .run(rows, &ctx(TemplateKind::SinglePart), &AtomicBool::new(false))
        .await;

    // The batch completes with one zero-confidence record per row,
    // all routed to review
    assert_eq!(outcome.report.total_rows, row_count);
    assert_eq!(outcome.accepted.len(), 0);
    assert_eq!(outcome.needs_review.len(), row_count);
    assert!(outcome
        .needs_review
        .iter()
        .all(|p| p.record.confidence_score == 0));
    assert_eq!(outcome.report.degraded, row_count);
    Ok(())
}

#[tokio::test]
async fn test_oem_lookup_failure_scores_below_success() -> Result<()> {
    let fixture = write_fixture(MESSY_PRICEBOOK);
    let taxonomy = Arc::new(Taxonomy::default_hvac());
    let config = OemLookupConfig::from(&LookupSettings {
        delay_ms: 0,
        timeout_seconds: 5,
    });

    let run = |web: Arc<dyn WebLookupPort>| {
        let rows = TableIngestor::read_path(fixture.path()).unwrap();
        let enricher = Arc::new(OemLookupEnricher::new(taxonomy.clone(), web, config.clone()));
        let orchestrator = Orchestrator::new(enricher, None, PricingConfig::default());
        async move {
            orchestrator
                .run(rows, &ctx(TemplateKind::SupplierLoader), &AtomicBool::new(false))
                .await
        }
    };

    let success = run(Arc::new(StaticWebLookup)).await;
    let failure = run(Arc::new(FailingWebLookup)).await;

    // Both batches complete with a record per row
    assert_eq!(success.report.total_rows, failure.report.total_rows);

    let success_first = &success.accepted[0];
    let failure_first = failure
        .accepted
        .iter()
        .chain(failure.needs_review.iter())
        .next()
        .unwrap();
    assert!(failure_first.record.confidence_score < success_first.record.confidence_score);
    Ok(())
}

#[tokio::test]
async fn test_artifacts_written_for_accepted_and_review() -> Result<()> {
    let fixture = write_fixture(MESSY_PRICEBOOK);
    let rows = TableIngestor::read_path(fixture.path())?;

    let enricher = Arc::new(RuleBasedEnricher::new(Arc::new(Taxonomy::default_hvac())));
    // Force the partially extracted row into review
    let orchestrator = Orchestrator::new(enricher, Some(85), PricingConfig {
        supplier_name: "Acme Supply".to_string(),
        ..Default::default()
    });
    let outcome = orchestrator
        .run(rows, &ctx(TemplateKind::SupplierLoader), &AtomicBool::new(false))
        .await;

    let dir = tempdir()?;
    let writer = OutputWriter::new(dir.path())?;
    let accepted_path = writer.write_accepted(&outcome.output_rows)?;
    let review_path = writer.write_review(&outcome.needs_review)?;

    let accepted = std::fs::read_to_string(accepted_path)?;
    assert!(accepted.contains("ZR34K5-PFV"));
    assert!(accepted.contains("Acme Supply"));

    let review = std::fs::read_to_string(review_path)?;
    assert!(review.contains("TSTAT100"));
    assert!(review.contains("MissingFields"));
    Ok(())
}

#[test]
fn test_unreadable_source_surfaces_fatal_error() {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(&[0xff, 0xfe, 0x00, 0x01, 0xff]).unwrap();

    let result = TableIngestor::read_path(file.path());
    assert!(matches!(
        result,
        Err(PipelineError::SourceUnreadable { .. })
    ));
}
