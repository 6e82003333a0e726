// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Alert Delivery
 * Best-effort webhook fan-out for high-risk findings
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const ALERT_TIMEOUT: Duration = Duration::from_secs(10);

/// One-shot delivery of an alert message. Implementations are stateless and
/// infallible from the caller's point of view: failed deliveries are logged
/// and dropped, never retried, never propagated.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn alert(&self, message: &str);
}

/// Posts `{"text": message}` to a configured incoming-webhook URL.
pub struct WebhookAlerter {
    client: Client,
    url: String,
}

impl WebhookAlerter {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(ALERT_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build alert client: {e}"))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl AlertSink for WebhookAlerter {
    async fn alert(&self, message: &str) {
        let payload = serde_json::json!({ "text": message });

        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Alert delivered");
            }
            Ok(response) => {
                warn!("Failed to send alert: HTTP {}", response.status());
            }
            Err(e) => {
                warn!("Failed to send alert: {e}");
            }
        }
    }
}
