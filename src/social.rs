// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Social Search Sweep
 * Scores recent social posts for brand-impersonation language
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::alerting::AlertSink;
use crate::errors::{ScannerError, ScannerResult};
use crate::retry::{retry_with_backoff, RetryConfig};
use crate::scorer::SimilarityScorer;
use crate::types::SocialFinding;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info, warn};

/// Posts scoring above this against the brand templates become findings.
const SOCIAL_ALERT_THRESHOLD: f64 = 0.75;
const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
const SEARCH_LIMIT: u32 = 20;

#[derive(Debug, Clone)]
pub struct SocialPost {
    pub text: String,
}

/// Recent-post search over a social platform. Rate limiting is handled by
/// the implementation with a bounded retry budget; a keyword that stays
/// rate-limited is skipped, never waited on indefinitely.
#[async_trait]
pub trait SocialSearch: Send + Sync {
    async fn search_recent(&self, keyword: &str, limit: u32) -> ScannerResult<Vec<SocialPost>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    text: String,
}

/// Bearer-token client for a v2-style recent-search endpoint.
pub struct RecentSearchClient {
    client: Client,
    bearer_token: String,
    base_url: String,
    retry: RetryConfig,
}

impl RecentSearchClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.twitter.com";

    pub fn new(bearer_token: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build social search client: {e}"))?;

        Ok(Self {
            client,
            bearer_token,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            retry: RetryConfig::default(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn search_once(&self, keyword: &str, limit: u32) -> ScannerResult<Vec<SocialPost>> {
        let endpoint = format!("{}/2/tweets/search/recent", self.base_url);
        let limit = limit.to_string();

        let response = self
            .client
            .get(&endpoint)
            .bearer_auth(&self.bearer_token)
            .query(&[("query", keyword), ("max_results", limit.as_str())])
            .send()
            .await
            .map_err(|e| ScannerError::Transport {
                url: endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("x-rate-limit-reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<i64>().ok())
                .map(|reset| {
                    let now = Utc::now().timestamp();
                    Duration::from_secs(reset.saturating_sub(now).max(0) as u64)
                });
            return Err(ScannerError::RateLimited { retry_after });
        }
        if !status.is_success() {
            return Err(ScannerError::Transport {
                url: endpoint,
                message: format!("search returned HTTP {status}"),
            });
        }

        let body: SearchResponse =
            response.json().await.map_err(|e| ScannerError::Parse {
                context: endpoint,
                message: e.to_string(),
            })?;

        Ok(body
            .data
            .into_iter()
            .map(|item| SocialPost { text: item.text })
            .collect())
    }
}

#[async_trait]
impl SocialSearch for RecentSearchClient {
    async fn search_recent(&self, keyword: &str, limit: u32) -> ScannerResult<Vec<SocialPost>> {
        retry_with_backoff(&self.retry, "social search", || {
            self.search_once(keyword, limit)
        })
        .await
    }
}

/// Sweep the configured keywords and score each returned post against the
/// brand templates. Search failures skip the keyword; nothing here can fail
/// the run.
pub async fn scan_social(
    search: &dyn SocialSearch,
    scorer: &dyn SimilarityScorer,
    keywords: &[String],
    templates: &[String],
    alerts: Option<&dyn AlertSink>,
) -> Vec<SocialFinding> {
    let mut findings = Vec::new();

    for keyword in keywords {
        let posts = match search.search_recent(keyword, SEARCH_LIMIT).await {
            Ok(posts) => posts,
            Err(e) => {
                error!("Social search for '{keyword}' skipped: {e}");
                continue;
            }
        };
        info!("Social search returned {} posts for '{keyword}'", posts.len());

        for post in posts {
            let score = scorer.score(&post.text, templates).await;
            if score > SOCIAL_ALERT_THRESHOLD {
                let preview: String = post.text.chars().take(200).collect();
                warn!("Potential scam post found: {preview}... (score {score:.2})");
                if let Some(sink) = alerts {
                    sink.alert(&format!(
                        "Potential scam post found: {preview}... (score {score:.2})"
                    ))
                    .await;
                }
                findings.push(SocialFinding {
                    keyword: keyword.clone(),
                    text: post.text,
                    score,
                    timestamp: Utc::now(),
                });
            }
        }
    }

    findings
}
