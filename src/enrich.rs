// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Domain Enrichment
 * WHOIS and TLS certificate context via the lookup API
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{ScannerError, ScannerResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const DEFAULT_WHOIS_API_BASE: &str = "https://www.whoisxmlapi.com/whoisserver/WhoisService";
const DEFAULT_TLS_API_BASE: &str = "https://ssl-certificates.whoisxmlapi.com/api/v1";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Registration and certificate context for a domain. Failures are expected
/// in bulk operation; callers degrade them to placeholder summaries and
/// never let them block scoring.
#[async_trait]
pub trait DomainEnricher: Send + Sync {
    async fn whois(&self, domain: &str) -> ScannerResult<String>;
    async fn tls(&self, domain: &str) -> ScannerResult<String>;
}

/// Enricher backed by the WhoisXML lookup APIs. Without an API key every
/// lookup fails fast, which the pipeline records as a placeholder.
pub struct LookupApiEnricher {
    client: Client,
    api_key: Option<String>,
    whois_base: String,
    tls_base: String,
}

impl LookupApiEnricher {
    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build lookup client: {e}"))?;

        Ok(Self {
            client,
            api_key,
            whois_base: DEFAULT_WHOIS_API_BASE.to_string(),
            tls_base: DEFAULT_TLS_API_BASE.to_string(),
        })
    }

    /// Point both lookups at a different endpoint, for tests and on-prem
    /// API mirrors.
    pub fn with_base_urls(mut self, whois_base: &str, tls_base: &str) -> Self {
        self.whois_base = whois_base.to_string();
        self.tls_base = tls_base.to_string();
        self
    }

    fn key(&self, domain: &str) -> ScannerResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ScannerError::Enrichment {
                domain: domain.to_string(),
                message: "WHOIS API key not set".to_string(),
            })
    }

    async fn lookup(&self, base: &str, domain: &str) -> ScannerResult<serde_json::Value> {
        let key = self.key(domain)?;

        let response = self
            .client
            .get(base)
            .query(&[
                ("apiKey", key),
                ("domainName", domain),
                ("outputFormat", "JSON"),
            ])
            .send()
            .await
            .map_err(|e| ScannerError::Enrichment {
                domain: domain.to_string(),
                message: format!("lookup API unreachable: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(ScannerError::Enrichment {
                domain: domain.to_string(),
                message: format!("lookup API returned HTTP {}", response.status()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ScannerError::Enrichment {
                domain: domain.to_string(),
                message: format!("malformed lookup response: {e}"),
            })
    }
}

#[async_trait]
impl DomainEnricher for LookupApiEnricher {
    async fn whois(&self, domain: &str) -> ScannerResult<String> {
        let body = self.lookup(&self.whois_base, domain).await?;

        let record = &body["WhoisRecord"];
        let registrar = record["registrarName"].as_str().unwrap_or("unknown");
        let created = record["createdDate"].as_str().unwrap_or("unknown");
        let expires = record["expiresDate"].as_str().unwrap_or("unknown");

        Ok(format!(
            "registrar: {registrar}, created: {created}, expires: {expires}"
        ))
    }

    async fn tls(&self, domain: &str) -> ScannerResult<String> {
        let body = self.lookup(&self.tls_base, domain).await?;

        let cert = &body["certificates"][0];
        let issuer = cert["issuer"]["commonName"].as_str().unwrap_or("unknown");
        let subject = cert["subject"]["commonName"].as_str().unwrap_or("unknown");
        let valid_to = cert["validTo"].as_str().unwrap_or("unknown");

        Ok(format!(
            "subject: {subject}, issuer: {issuer}, valid_to: {valid_to}"
        ))
    }
}
