// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Task
 * Per-URL pipeline: fetch, enrich, score, record, expand links
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::alerting::AlertSink;
use crate::config::ScannerConfig;
use crate::enrich::DomainEnricher;
use crate::fetcher::{extract_links, extract_title, host_of, PageFetcher, ScreenshotCapture};
use crate::frontier::Frontier;
use crate::scorer::SimilarityScorer;
use crate::typosquat::is_typosquat;
use crate::types::ScanRecord;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Weight of the similarity signal in the risk score.
/// TODO: fold WHOIS age and TLS issuer signals into the remaining weight.
const RISK_SIMILARITY_WEIGHT: f64 = 0.6;

/// Scoring looks at a bounded prefix of title + body so a multi-megabyte
/// page cannot stall a worker.
const SCORE_PREFIX_CHARS: usize = 4000;

/// The external collaborators a scan task consumes, shared across workers.
pub struct Collaborators {
    pub fetcher: Arc<dyn PageFetcher>,
    pub screenshots: Arc<dyn ScreenshotCapture>,
    pub enricher: Arc<dyn DomainEnricher>,
    pub scorer: Arc<dyn SimilarityScorer>,
    pub alerts: Option<Arc<dyn AlertSink>>,
}

/// Whether a discovered link is worth crawling: TLD on the denylist, a brand
/// keyword in the domain, or a typosquat of an official domain. Links to the
/// official domains themselves are never suspicious.
pub fn is_suspicious_link(link: &str, config: &ScannerConfig) -> bool {
    let domain = host_of(link);
    if domain.is_empty() {
        return false;
    }
    if config.official_domains.iter().any(|d| d == &domain) {
        return false;
    }

    let tld = format!(".{}", domain.rsplit('.').next().unwrap_or_default());
    if config.suspicious_tlds.contains(&tld) {
        return true;
    }
    if config
        .brand_keywords
        .iter()
        .any(|keyword| domain.contains(keyword.as_str()))
    {
        return true;
    }

    is_typosquat(&domain, &config.official_domains, config.typosquat_threshold)
}

/// Scan a single URL end to end. Returns the record (when the page was
/// fetched and scored) and the suspicious links that were queued. Every
/// failure is contained here: a fetch error drops the task, enrichment and
/// screenshot errors degrade to placeholders, and nothing propagates to the
/// pool.
pub async fn scan_url(
    url: String,
    config: Arc<ScannerConfig>,
    frontier: Arc<Frontier>,
    collab: Arc<Collaborators>,
) -> (Option<ScanRecord>, Vec<String>) {
    info!("Processing: {url}");

    // The single linearization point: whoever wins this insert owns the only
    // fetch of the URL this run. Losing means another worker got here first
    // or a previous session already scanned it.
    if !frontier.mark_scanned(&url) {
        debug!("Already scanned: {url}");
        return (None, Vec::new());
    }

    let page = match collab.fetcher.fetch(&url).await {
        Ok(page) => page,
        Err(e) => {
            warn!("Fetch failed for {url}: {e}");
            return (None, Vec::new());
        }
    };
    debug!("Fetched {url}: HTTP {} ({} bytes)", page.status, page.text.len());

    let title = extract_title(&page.text);

    let snippet: String = title
        .chars()
        .chain(" ".chars())
        .chain(page.text.chars())
        .take(SCORE_PREFIX_CHARS)
        .collect();
    let similarity = collab.scorer.score(&snippet, &config.brand_templates).await;

    let domain = host_of(&url);
    let whois = match collab.enricher.whois(&domain).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!("WHOIS enrichment failed for {domain}: {e}");
            format!("error: {e}")
        }
    };
    let tls = match collab.enricher.tls(&domain).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!("TLS enrichment failed for {domain}: {e}");
            format!("error: {e}")
        }
    };
    let screenshot = match collab.screenshots.capture(&url).await {
        Ok(path) => path,
        Err(e) => {
            warn!("Screenshot failed for {url}: {e}");
            String::new()
        }
    };

    let risk = similarity * RISK_SIMILARITY_WEIGHT;

    let record = ScanRecord {
        url: url.clone(),
        domain,
        title,
        similarity,
        whois,
        tls,
        screenshot,
        risk,
        timestamp: Utc::now(),
    };

    if risk > config.alert_risk_threshold {
        let message = format!("High risk detected: {url} (score {risk:.2})");
        warn!("{message}");
        if let Some(sink) = &collab.alerts {
            sink.alert(&message).await;
        }
    }

    let links = extract_links(&page.text, &url);
    debug!("Discovered {} links from {url}", links.len());

    let mut queued = Vec::new();
    for link in links {
        if is_suspicious_link(&link, &config) && frontier.enqueue(link.clone()) {
            info!("Queueing suspicious link: {link}");
            queued.push(link);
        }
    }

    (Some(record), queued)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScannerConfig {
        ScannerConfig {
            official_domains: vec!["brandplaceholder.com".to_string()],
            suspicious_tlds: vec![".zip".to_string(), ".top".to_string()],
            brand_keywords: vec!["brandplaceholder".to_string()],
            typosquat_threshold: 60.0,
            ..Default::default()
        }
    }

    #[test]
    fn denylisted_tld_is_suspicious() {
        assert!(is_suspicious_link("http://prize-draw.zip/claim", &config()));
        assert!(!is_suspicious_link("http://prize-draw.net/claim", &config()));
    }

    #[test]
    fn brand_keyword_in_domain_is_suspicious() {
        assert!(is_suspicious_link(
            "http://login.brandplaceholder.net/session",
            &config()
        ));
    }

    #[test]
    fn typosquat_domain_is_suspicious_without_tld_match() {
        assert!(is_suspicious_link("http://brandplaceh0lder.com/", &config()));
    }

    #[test]
    fn official_domain_is_never_suspicious() {
        assert!(!is_suspicious_link(
            "http://brandplaceholder.com/promo",
            &config()
        ));
    }
}
