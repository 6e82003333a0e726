// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Engine
 * Batch orchestration: seeding, bounded worker pool, checkpointing, export
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::checkpoint::{CheckpointManager, CheckpointState};
use crate::config::ScannerConfig;
use crate::discovery::DomainDiscovery;
use crate::feeds::ThreatFeedClient;
use crate::frontier::Frontier;
use crate::safebrowsing::SafeBrowsingClient;
use crate::scan_task::{scan_url, Collaborators};
use crate::social::{scan_social, SocialSearch};
use crate::storage::FindingsExporter;
use crate::types::{ScanRecord, SocialFinding};
use crate::typosquat::is_typosquat;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// What a completed run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub findings: Vec<ScanRecord>,
    pub social_findings: Vec<SocialFinding>,
    pub scanned: usize,
    pub exported: Vec<PathBuf>,
}

/// Drives the whole pipeline: restore or seed the frontier, run batch
/// rounds over a bounded worker pool with a hard barrier between rounds,
/// checkpoint after every round, then sweep, verify and export.
pub struct ScanEngine {
    config: Arc<ScannerConfig>,
    frontier: Arc<Frontier>,
    checkpoints: CheckpointManager,
    collab: Arc<Collaborators>,
    discovery: Arc<dyn DomainDiscovery>,
    exporter: Arc<dyn FindingsExporter>,
    feed: Option<ThreatFeedClient>,
    social: Option<Arc<dyn SocialSearch>>,
    safe_browsing: Option<SafeBrowsingClient>,
}

impl ScanEngine {
    pub fn new(
        config: Arc<ScannerConfig>,
        collab: Collaborators,
        discovery: Arc<dyn DomainDiscovery>,
        exporter: Arc<dyn FindingsExporter>,
    ) -> Self {
        let checkpoints = CheckpointManager::new(&config.checkpoint_path);
        Self {
            config,
            frontier: Arc::new(Frontier::new()),
            checkpoints,
            collab: Arc::new(collab),
            discovery,
            exporter,
            feed: None,
            social: None,
            safe_browsing: None,
        }
    }

    pub fn with_feed(mut self, feed: ThreatFeedClient) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn with_social(mut self, social: Arc<dyn SocialSearch>) -> Self {
        self.social = Some(social);
        self
    }

    pub fn with_safe_browsing(mut self, client: SafeBrowsingClient) -> Self {
        self.safe_browsing = Some(client);
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let state = self.checkpoints.load(&self.config.seeds);
        let mut findings = state.findings;
        self.frontier.restore(state.queue, state.scanned);

        self.seed_frontier().await;

        // Batch rounds: drain up to max_workers, run them concurrently,
        // wait for the whole round, checkpoint. Round N+1 never starts
        // before round N has fully drained.
        loop {
            let batch = self.frontier.dequeue_batch(self.config.max_workers);
            if batch.is_empty() {
                break;
            }
            info!("Dispatching batch of {} URLs", batch.len());

            let mut tasks = JoinSet::new();
            for url in batch {
                tasks.spawn(scan_url(
                    url,
                    Arc::clone(&self.config),
                    Arc::clone(&self.frontier),
                    Arc::clone(&self.collab),
                ));
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((Some(record), _queued)) => findings.push(record),
                    Ok((None, _queued)) => {}
                    Err(e) => error!("Scan task aborted: {e}"),
                }
            }

            self.write_checkpoint(&findings);
        }

        let social_findings = self.social_sweep().await;
        self.verify_high_risk(&findings).await;

        let mut exported = Vec::new();
        match self.exporter.persist(&findings).await {
            Ok(paths) => exported.extend(paths),
            Err(e) => error!("Failed to export findings: {e:#}"),
        }
        if !social_findings.is_empty() {
            match self.exporter.persist_social(&social_findings).await {
                Ok(paths) => exported.extend(paths),
                Err(e) => error!("Failed to export social findings: {e:#}"),
            }
        }

        self.write_checkpoint(&findings);

        let (_, scanned) = self.frontier.snapshot();
        info!(
            "Run complete: {} scanned, {} findings, {} social findings",
            scanned.len(),
            findings.len(),
            social_findings.len()
        );

        Ok(RunSummary {
            findings,
            social_findings,
            scanned: scanned.len(),
            exported,
        })
    }

    /// Fill the frontier for this run: configured seeds when nothing was
    /// resumed, then discovery candidates and optionally the threat feed.
    /// `enqueue` drops anything already scanned.
    async fn seed_frontier(&self) {
        if self.frontier.is_empty() {
            info!("Queue is empty after loading state, seeding with configured seeds");
            for seed in &self.config.seeds {
                self.frontier.enqueue(seed.clone());
            }
        }

        let candidates = self
            .discovery
            .discover(&self.config.official_domains, &self.config.suspicious_tlds)
            .await;
        for domain in candidates {
            if is_typosquat(
                &domain,
                &self.config.official_domains,
                self.config.typosquat_threshold,
            ) {
                info!("Suspicious typosquat domain from discovery: {domain}");
            }
            self.frontier.enqueue(format!("http://{domain}"));
        }

        if let Some(feed) = &self.feed {
            match feed.fetch_known_phishing_urls().await {
                Ok(urls) => {
                    info!("Fetched {} URLs from threat feed", urls.len());
                    for url in urls {
                        self.frontier.enqueue(url);
                    }
                }
                Err(e) => warn!("Threat feed unavailable: {e}"),
            }
        }

        info!("Frontier seeded, {} URLs pending", self.frontier.pending());
    }

    fn write_checkpoint(&self, findings: &[ScanRecord]) {
        let (queue, scanned) = self.frontier.snapshot();
        let state = CheckpointState {
            findings: findings.to_vec(),
            scanned,
            queue,
        };
        match self.checkpoints.save(&state) {
            Ok(()) => info!(
                "Saved state: {} scanned, {} in queue",
                state.scanned.len(),
                state.queue.len()
            ),
            // Run continues in memory; resume will redo work lost here.
            Err(e) => error!("Failed to save checkpoint: {e:#}"),
        }
    }

    async fn social_sweep(&self) -> Vec<SocialFinding> {
        let Some(search) = &self.social else {
            return Vec::new();
        };
        if self.config.social_keywords.is_empty() {
            return Vec::new();
        }

        scan_social(
            search.as_ref(),
            self.collab.scorer.as_ref(),
            &self.config.social_keywords,
            &self.config.brand_templates,
            self.collab.alerts.as_deref(),
        )
        .await
    }

    /// Cross-check high-risk findings against the threat-match service and
    /// alert on confirmations. Best-effort; lookup failures are logged.
    async fn verify_high_risk(&self, findings: &[ScanRecord]) {
        let Some(client) = &self.safe_browsing else {
            return;
        };

        for record in findings {
            if record.risk <= self.config.alert_risk_threshold {
                continue;
            }
            match client.check_url(&record.url).await {
                Ok(threats) if !threats.is_empty() => {
                    let message = format!(
                        "Threat-match confirmed {} ({})",
                        record.url,
                        threats.join(", ")
                    );
                    warn!("{message}");
                    if let Some(sink) = &self.collab.alerts {
                        sink.alert(&message).await;
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("Threat-match lookup failed for {}: {e}", record.url),
            }
        }
    }
}
