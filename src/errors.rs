// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scanner Error Types
 * Failure taxonomy for the crawl pipeline
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::time::Duration;
use thiserror::Error;

/// Main scanner error type. Every variant except `Configuration` is caught
/// at a task or call boundary and downgraded to a logged event; only
/// configuration failures terminate the run.
#[derive(Error, Debug)]
pub enum ScannerError {
    /// Fetch timeout or network failure. The task is dropped and the URL
    /// stays in the scanned set for the rest of the session.
    #[error("transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    /// Malformed or unexpected content. Degraded, never fatal.
    #[error("parse failure for {context}: {message}")]
    Parse { context: String, message: String },

    /// WHOIS/TLS lookup failure. Recorded as a placeholder in the record.
    #[error("enrichment failed for {domain}: {message}")]
    Enrichment { domain: String, message: String },

    /// Checkpoint or export write failure. The run continues in memory.
    #[error("persistence failure at {path}: {message}")]
    Persistence { path: String, message: String },

    /// Alert webhook returned non-success or was unreachable.
    #[error("alert delivery failed: {0}")]
    AlertDelivery(String),

    /// Upstream asked us to slow down (HTTP 429/503).
    #[error("rate limited by upstream")]
    RateLimited { retry_after: Option<Duration> },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ScannerError {
    /// Whether a bounded retry loop may attempt the operation again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScannerError::Transport { .. } | ScannerError::RateLimited { .. }
        )
    }

    /// Server-provided delay, when the failure carried one.
    pub fn retry_delay(&self) -> Option<Duration> {
        match self {
            ScannerError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

pub type ScannerResult<T> = Result<T, ScannerError>;
