// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Safe Browsing Verification
 * Cross-checks high-risk findings against a threat-match API
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{ScannerError, ScannerResult};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ThreatMatchResponse {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    threat_type: String,
}

/// Client for a Safe Browsing v4-style `threatMatches:find` endpoint.
pub struct SafeBrowsingClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SafeBrowsingClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://safebrowsing.googleapis.com";

    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(CHECK_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build safe browsing client: {e}"))?;

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Threat types the service reports for `url`; empty when it is clean.
    pub async fn check_url(&self, url: &str) -> ScannerResult<Vec<String>> {
        let endpoint = format!(
            "{}/v4/threatMatches:find?key={}",
            self.base_url, self.api_key
        );

        let payload = serde_json::json!({
            "client": { "clientId": "kalastaja", "clientVersion": env!("CARGO_PKG_VERSION") },
            "threatInfo": {
                "threatTypes": ["MALWARE", "SOCIAL_ENGINEERING"],
                "platformTypes": ["ANY_PLATFORM"],
                "threatEntryTypes": ["URL"],
                "threatEntries": [{ "url": url }]
            }
        });

        let response = self
            .client
            .post(&endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ScannerError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ScannerError::Transport {
                url: url.to_string(),
                message: format!("threat-match API returned HTTP {}", response.status()),
            });
        }

        let body: ThreatMatchResponse =
            response.json().await.map_err(|e| ScannerError::Parse {
                context: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(body
            .matches
            .into_iter()
            .map(|m| m.threat_type)
            .collect())
    }
}
