// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One persisted result of scanning a URL. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub url: String,
    pub domain: String,
    pub title: String,
    /// Similarity of the page text to the brand templates, in [0, 1].
    pub similarity: f64,
    /// WHOIS summary, or an `error: ...` placeholder when enrichment failed.
    pub whois: String,
    /// TLS certificate summary, or an `error: ...` placeholder.
    pub tls: String,
    /// Path of the captured screenshot; empty when capture is disabled.
    pub screenshot: String,
    pub risk: f64,
    pub timestamp: DateTime<Utc>,
}

/// Successful fetch of a page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub text: String,
    pub final_url: String,
    pub headers: HashMap<String, String>,
}

/// A brand-impersonation hit found in social posts rather than on a page.
/// Exported alongside scan findings but not part of the resumable scan state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialFinding {
    pub keyword: String,
    pub text: String,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}
