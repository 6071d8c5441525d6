use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use pricebook_normalizer::common::constants::{DEFAULT_LABOR_COST, DEFAULT_LABOR_RATE};
use pricebook_normalizer::config::Settings;
use pricebook_normalizer::infra::{HttpCompletionClient, HttpWebLookupClient, OutputWriter};
use pricebook_normalizer::observability::logging::init_logging;
use pricebook_normalizer::pipeline::processing::enrich::{
    AiAssistedEnricher, DistributorDomain, OemBrand, OemLookupConfig, OemLookupEnricher,
    RuleBasedEnricher,
};
use pricebook_normalizer::{
    Enricher, EnrichmentContext, Orchestrator, PricingConfig, StrategyKind, TableIngestor,
    Taxonomy, TemplateKind,
};

#[derive(Parser)]
#[command(name = "pricebook-normalizer")]
#[command(about = "Normalizes distributor pricebooks into field-service price book imports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pricebook through the full pipeline
    Process {
        /// Input pricebook (CSV, TSV, or Excel)
        #[arg(long)]
        input: PathBuf,
        /// Enrichment strategy
        #[arg(long, value_enum, default_value_t = StrategyKind::RuleBased)]
        strategy: StrategyKind,
        /// Output template
        #[arg(long, value_enum, default_value_t = TemplateKind::Bundle)]
        template: TemplateKind,
        /// Supplier name stamped on output rows
        #[arg(long)]
        supplier: String,
        /// Hourly labor rate used for bundle sell pricing
        #[arg(long, default_value_t = DEFAULT_LABOR_RATE)]
        labor_rate: f64,
        /// Hourly labor cost used for the bundle labor line
        #[arg(long, default_value_t = DEFAULT_LABOR_COST)]
        labor_cost: f64,
        /// Review gate threshold override (0-100)
        #[arg(long)]
        threshold: Option<u8>,
        /// OEM brand for the oem-lookup strategy
        #[arg(long, value_enum)]
        brand: Option<OemBrand>,
        /// Distributor domain for the oem-lookup strategy
        #[arg(long, value_enum)]
        distributor: Option<DistributorDomain>,
        /// Directory for output artifacts
        #[arg(long, default_value = "output")]
        out_dir: PathBuf,
        /// Also write a full-fidelity NDJSON dump of every record
        #[arg(long)]
        dump: bool,
    },
    /// Show which row would be used as the header for a source file
    DetectHeader {
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    init_logging();

    match cli.command {
        Commands::Process {
            input,
            strategy,
            template,
            supplier,
            labor_rate,
            labor_cost,
            threshold,
            brand,
            distributor,
            out_dir,
            dump,
        } => {
            let settings = Settings::load()?;
            let taxonomy = Arc::new(Taxonomy::default_hvac());

            let enricher: Arc<dyn Enricher> = match strategy {
                StrategyKind::RuleBased => Arc::new(RuleBasedEnricher::new(taxonomy)),
                StrategyKind::AiAssisted => {
                    let completion =
                        Arc::new(HttpCompletionClient::from_env(settings.lookup.timeout())?);
                    Arc::new(AiAssistedEnricher::new(
                        taxonomy,
                        completion,
                        settings.lookup.timeout(),
                    ))
                }
                StrategyKind::OemLookup => {
                    let web = Arc::new(HttpWebLookupClient::new(settings.lookup.timeout()));
                    Arc::new(OemLookupEnricher::new(
                        taxonomy,
                        web,
                        OemLookupConfig::from(&settings.lookup),
                    ))
                }
            };

            info!(input = %input.display(), "reading pricebook");
            let rows = TableIngestor::read_path(&input)?;

            let ctx = EnrichmentContext {
                template,
                supplier_name: supplier.clone(),
                brand,
                distributor,
            };
            let pricing = PricingConfig {
                supplier_name: supplier,
                labor_rate,
                labor_cost,
                ..Default::default()
            };

            // Cancellation checkpoint is one row: ctrl-c stops the batch
            // between rows and keeps the completed prefix
            let cancel = Arc::new(AtomicBool::new(false));
            let cancel_flag = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel_flag.store(true, Ordering::SeqCst);
                }
            });

            let orchestrator = Orchestrator::new(enricher, threshold, pricing);
            let outcome = orchestrator.run(rows, &ctx, &cancel).await;

            let writer = OutputWriter::new(&out_dir)?;
            writer.write_accepted(&outcome.output_rows)?;
            writer.write_review(&outcome.needs_review)?;
            if dump {
                let mut all = outcome.accepted.clone();
                all.extend(outcome.needs_review.iter().cloned());
                writer.write_dump(&all)?;
            }

            let report = &outcome.report;
            println!(
                "✅ Batch {} complete: {} rows, {} accepted, {} for review ({} degraded){}",
                report.run_id,
                report.total_rows,
                report.accepted,
                report.needs_review,
                report.degraded,
                if report.cancelled { " [cancelled]" } else { "" }
            );
            println!("Artifacts written to {}", out_dir.display());
        }
        Commands::DetectHeader { input } => {
            let (idx, labels) = TableIngestor::preview_header(&input)?;
            println!("Header row index: {}", idx);
            println!("Labels: {}", labels.join(", "));
        }
    }

    Ok(())
}
