//! forge-intake - campaign intake CLI
//!
//! Runs a scripted intake session against the configured backend:
//! collects the URLs and text snippets given on the command line,
//! validates them, dispatches analysis, and reports per-source results.
//! Useful for exercising the backend intelligence endpoints without a
//! browser.

use anyhow::Result;
use clap::Parser;
use forge_common::config::IntakeConfig;
use forge_common::events::EventBus;
use forge_intake::analyzers::HttpAnalyzer;
use forge_intake::models::{AnalysisStatus, ValidationStatus};
use forge_intake::{AnalysisDispatcher, WorkflowController};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "forge-intake", version, about = "CampaignForge intake session runner")]
struct Cli {
    /// Sales page URLs to submit for analysis
    urls: Vec<String>,

    /// Text snippets to submit as product details
    #[arg(long = "text")]
    texts: Vec<String>,

    /// Backend API base URL (overrides env and config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Campaign to attach the sources to (random when omitted)
    #[arg(long)]
    campaign_id: Option<Uuid>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = IntakeConfig::resolve(cli.base_url.as_deref());

    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.urls.is_empty() && cli.texts.is_empty() {
        anyhow::bail!("Nothing to analyze: pass at least one URL or --text snippet");
    }

    let campaign_id = cli.campaign_id.unwrap_or_else(Uuid::new_v4);
    info!("Starting intake session");
    info!("Backend: {}", config.api_base_url);
    info!("Campaign: {}", campaign_id);

    let event_bus = EventBus::new(100);
    let controller = WorkflowController::new(campaign_id, event_bus.clone(), config.debounce);

    for url in &cli.urls {
        let id = controller.add_input("salespage_url").await?;
        controller.update_input(id, url).await?;
    }
    for text in &cli.texts {
        let id = controller.add_input("product_description").await?;
        controller.update_input(id, text).await?;
    }

    // Let the debounced validation settle before reading the aggregate
    tokio::time::sleep(config.debounce + Duration::from_millis(100)).await;

    let aggregate = controller.aggregate().await;
    if aggregate.has_invalid_inputs {
        for input in controller.inputs().await {
            if input.validation == ValidationStatus::Invalid {
                eprintln!(
                    "invalid  {} : {}",
                    input.value,
                    input.error.as_deref().unwrap_or_default()
                );
            }
        }
        anyhow::bail!("Fix the invalid sources above and retry");
    }
    if !aggregate.has_valid_inputs {
        anyhow::bail!("No valid sources to analyze");
    }

    let analyzer = HttpAnalyzer::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Analyzer setup failed: {}", e))?;
    let dispatcher =
        AnalysisDispatcher::new(controller.clone(), Arc::new(analyzer), config.analysis_timeout);

    let dispatched = dispatcher.analyze_all().await;
    info!(dispatched, "Analysis finished");

    let mut failures = 0;
    for input in controller.inputs().await {
        match input.analysis {
            AnalysisStatus::Completed => {
                let result = input.analysis_result.unwrap_or(forge_intake::AnalysisResult {
                    confidence: 0.0,
                    insight_count: 0,
                });
                println!(
                    "ok       {} : {} insights, {:.0}% confidence",
                    input.value,
                    result.insight_count,
                    result.confidence * 100.0
                );
            }
            AnalysisStatus::Error => {
                failures += 1;
                println!(
                    "failed   {} : {}",
                    input.value,
                    input.error.as_deref().unwrap_or("Analysis failed")
                );
            }
            _ => {}
        }
    }

    if failures > 0 {
        anyhow::bail!("{} source(s) failed analysis", failures);
    }
    Ok(())
}
