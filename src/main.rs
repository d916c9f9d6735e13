use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info, warn};

use reco_exporter::config::Config;
use reco_exporter::export::write_jsonl;
use reco_exporter::logging;
use reco_exporter::pipeline::{EventValueScorer, PipelineOrchestrator, RunSummary};
use reco_exporter::store::JsonFileStore;

#[derive(Parser)]
#[command(name = "reco_exporter")]
#[command(about = "Training data exporter for the product recommendation engine")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the interaction dataset (behavioral + purchase + review)
    Interactions {
        /// Cap on behavioral events drained from the event store
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Export the catalog item dataset
    Items {
        /// Cap on catalog rows read from the catalog store
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Export both datasets sequentially
    Run,
}

fn print_summary(summary: &RunSummary, output_file: &str) {
    println!("\n📊 Interaction export {}:", summary.run_id);
    for source in &summary.sources {
        println!(
            "   {}: fetched {}, emitted {}, skipped {}, unscored {}",
            source.source, source.fetched, source.emitted, source.skipped, source.unscored
        );
        if let Some(reason) = &source.failed {
            println!("   ⚠️  {} failed: {}", source.source, reason);
        }
    }
    println!("   Total emitted: {}", summary.total_emitted);
    println!("   Total skipped: {}", summary.total_skipped);
    println!("   Output file: {output_file}");
}

async fn export_interactions(
    orchestrator: &PipelineOrchestrator,
    output_dir: &str,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let export = orchestrator.normalize_interactions(limit).await;
    if export.events.is_empty() {
        warn!("No interaction data to export");
        println!("⚠️  No interaction data to export");
        return Ok(());
    }

    let output_file = write_jsonl(&export.events, "interactions", output_dir)?;
    info!("💾 Saved interactions to {output_file}");
    print_summary(&export.summary, &output_file);
    Ok(())
}

async fn export_items(
    orchestrator: &PipelineOrchestrator,
    output_dir: &str,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    match orchestrator.export_catalog(limit).await {
        Ok(export) => {
            let output_file = write_jsonl(&export.records, "items", output_dir)?;
            info!("💾 Saved catalog rows to {output_file}");
            println!("\n📊 Catalog export:");
            println!("   Products read: {}", export.total_products);
            println!("   Rows written: {}", export.records.len());
            println!("   Output file: {output_file}");
        }
        Err(e) => {
            error!("Catalog export failed: {e}");
            println!("❌ Catalog export failed: {e}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    logging::init_logging();
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load()?;

    let store = Arc::new(JsonFileStore::new(config.sources.data_dir.clone()));
    let orchestrator = PipelineOrchestrator::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store,
    )
    .with_scorer(EventValueScorer::new(
        config.payment.cash_id.clone(),
        config.payment.epayment_ids.clone(),
    ))
    .with_batch_size(config.export.batch_size);

    let output_dir = config.export.output_dir.as_str();

    match cli.command {
        Commands::Interactions { limit } => {
            println!("🔄 Exporting interaction dataset...");
            export_interactions(&orchestrator, output_dir, limit).await?;
        }
        Commands::Items { limit } => {
            println!("🔄 Exporting catalog dataset...");
            export_items(&orchestrator, output_dir, limit).await?;
        }
        Commands::Run => {
            println!("🚀 Exporting both datasets...");
            export_interactions(&orchestrator, output_dir, None).await?;
            export_items(&orchestrator, output_dir, None).await?;
        }
    }
    Ok(())
}
