// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Kalastaja - Brand Impersonation Scanner
 * CLI entry point: crawls seeds and lookalike domains, scores pages for
 * phishing risk, persists findings with resumable state
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, Level};

use kalastaja_scanner::alerting::{AlertSink, WebhookAlerter};
use kalastaja_scanner::checkpoint::CheckpointManager;
use kalastaja_scanner::config::ScannerConfig;
use kalastaja_scanner::discovery::VariantDiscovery;
use kalastaja_scanner::engine::ScanEngine;
use kalastaja_scanner::enrich::LookupApiEnricher;
use kalastaja_scanner::feeds::ThreatFeedClient;
use kalastaja_scanner::fetcher::{DisabledScreenshot, HttpFetcher};
use kalastaja_scanner::safebrowsing::SafeBrowsingClient;
use kalastaja_scanner::scan_task::Collaborators;
use kalastaja_scanner::scorer::LexicalScorer;
use kalastaja_scanner::social::RecentSearchClient;
use kalastaja_scanner::storage::FileExporter;

const CONFIG_PATH: &str = "config.yaml";

/// Kalastaja - Brand Impersonation Scanner
#[derive(Parser)]
#[command(name = "kalastaja")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version)]
#[command(about = "Crawls lookalike domains and scores pages for brand-impersonation risk", long_about = None)]
struct Cli {
    /// Clear saved scan state before starting
    #[arg(long)]
    reset: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("kalastaja-worker")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    info!("Kalastaja scanner v{} - Starting", env!("CARGO_PKG_VERSION"));

    // Anything that fails from here until the engine starts is a startup
    // error and sets the exit code; per-task failures later never do.
    let config = Arc::new(ScannerConfig::load(CONFIG_PATH)?);

    if cli.reset {
        CheckpointManager::new(&config.checkpoint_path).clear()?;
        info!("Scan state cleared (--reset), starting fresh run");
    }

    let alerts: Option<Arc<dyn AlertSink>> = match &config.alert_webhook_url {
        Some(url) => Some(Arc::new(WebhookAlerter::new(url.clone())?)),
        None => None,
    };

    let collab = Collaborators {
        fetcher: Arc::new(HttpFetcher::new(config.fetch_timeout_secs)?),
        screenshots: Arc::new(DisabledScreenshot),
        enricher: Arc::new(LookupApiEnricher::new(config.whois_api_key.clone())?),
        scorer: Arc::new(LexicalScorer::new(config.similarity_threshold)),
        alerts,
    };

    let mut engine = ScanEngine::new(
        Arc::clone(&config),
        collab,
        Arc::new(VariantDiscovery),
        Arc::new(FileExporter::new(&config.export_dir)),
    );

    if let Some(feed_url) = &config.feed_url {
        engine = engine.with_feed(ThreatFeedClient::new(feed_url.clone())?);
    }
    if let Some(token) = &config.social_bearer_token {
        engine = engine.with_social(Arc::new(RecentSearchClient::new(token.clone())?));
    }
    if let Some(key) = &config.safe_browsing_api_key {
        engine = engine.with_safe_browsing(SafeBrowsingClient::new(key.clone())?);
    }

    let summary = engine.run().await?;

    info!(
        "Done: {} pages scanned, {} findings ({} exported files)",
        summary.scanned,
        summary.findings.len() + summary.social_findings.len(),
        summary.exported.len()
    );

    Ok(())
}
