// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Threat Feed Client
 * Pulls known phishing URLs from a CSV feed as extra crawl seeds
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{ScannerError, ScannerResult};
use crate::retry::{retry_with_backoff, RetryConfig};
use reqwest::Client;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;

const FEED_TIMEOUT: Duration = Duration::from_secs(10);
const FEED_USER_AGENT: &str = "Mozilla/5.0 (compatible; BrandMonitorBot/1.0)";

/// Client for PhishTank-style CSV feeds. The feed row format is a header
/// line containing a `url` column; everything else is ignored.
pub struct ThreatFeedClient {
    client: Client,
    url: String,
    retry: RetryConfig,
}

impl ThreatFeedClient {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(FEED_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build feed client: {e}"))?;

        Ok(Self {
            client,
            url,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_body(&self) -> ScannerResult<String> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, FEED_USER_AGENT)
            .send()
            .await
            .map_err(|e| ScannerError::Transport {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.as_u16() == 429 || status.as_u16() == 503 {
            return Err(ScannerError::RateLimited { retry_after: None });
        }
        if !status.is_success() {
            return Err(ScannerError::Transport {
                url: self.url.clone(),
                message: format!("feed returned HTTP {status}"),
            });
        }

        response.text().await.map_err(|e| ScannerError::Transport {
            url: self.url.clone(),
            message: e.to_string(),
        })
    }

    /// Fetch and parse the feed with a bounded retry budget. Returns unique
    /// URLs in feed order.
    pub async fn fetch_known_phishing_urls(&self) -> ScannerResult<Vec<String>> {
        let body =
            retry_with_backoff(&self.retry, "threat-feed fetch", || self.fetch_body()).await?;

        let mut reader = csv::Reader::from_reader(body.as_bytes());
        let url_column = reader
            .headers()
            .map_err(|e| ScannerError::Parse {
                context: self.url.clone(),
                message: format!("feed header unreadable: {e}"),
            })?
            .iter()
            .position(|name| name.eq_ignore_ascii_case("url"))
            .ok_or_else(|| ScannerError::Parse {
                context: self.url.clone(),
                message: "feed has no url column".to_string(),
            })?;

        let mut seen = BTreeSet::new();
        let mut urls = Vec::new();
        for row in reader.records() {
            let Ok(row) = row else {
                continue;
            };
            if let Some(url) = row.get(url_column) {
                if !url.is_empty() && seen.insert(url.to_string()) {
                    urls.push(url.to_string());
                }
            }
        }

        debug!("Threat feed yielded {} URLs", urls.len());
        Ok(urls)
    }
}
