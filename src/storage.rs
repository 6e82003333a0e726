// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Findings Export
 * Writes scan findings to timestamped CSV and JSON files
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::types::{ScanRecord, SocialFinding};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

/// Persists accumulated findings at the end of a run, returning the written
/// locations.
#[async_trait]
pub trait FindingsExporter: Send + Sync {
    async fn persist(&self, findings: &[ScanRecord]) -> Result<Vec<PathBuf>>;

    async fn persist_social(&self, findings: &[SocialFinding]) -> Result<Vec<PathBuf>>;
}

/// File exporter writing `findings_<ts>.csv` and `findings_<ts>.json` into
/// the configured directory.
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn stamp() -> String {
        Utc::now().format("%Y%m%dT%H%M%SZ").to_string()
    }

    fn write_csv(&self, path: &Path, findings: &[ScanRecord]) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        writer.write_record([
            "url",
            "domain",
            "title",
            "similarity",
            "whois",
            "tls",
            "screenshot",
            "risk",
            "timestamp",
        ])?;

        for record in findings {
            let similarity = record.similarity.to_string();
            let risk = record.risk.to_string();
            let timestamp = record.timestamp.to_rfc3339();
            writer.write_record([
                record.url.as_str(),
                record.domain.as_str(),
                record.title.as_str(),
                similarity.as_str(),
                record.whois.as_str(),
                record.tls.as_str(),
                record.screenshot.as_str(),
                risk.as_str(),
                timestamp.as_str(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl FindingsExporter for FileExporter {
    async fn persist(&self, findings: &[ScanRecord]) -> Result<Vec<PathBuf>> {
        if findings.is_empty() {
            info!("No findings to export");
            return Ok(Vec::new());
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let stamp = Self::stamp();
        let csv_path = self.dir.join(format!("findings_{stamp}.csv"));
        let json_path = self.dir.join(format!("findings_{stamp}.json"));

        self.write_csv(&csv_path, findings)?;

        let json = serde_json::to_string_pretty(findings)
            .context("Failed to serialize findings")?;
        std::fs::write(&json_path, json)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;

        info!(
            "Exported {} findings to {} and {}",
            findings.len(),
            csv_path.display(),
            json_path.display()
        );

        Ok(vec![csv_path, json_path])
    }

    async fn persist_social(&self, findings: &[SocialFinding]) -> Result<Vec<PathBuf>> {
        if findings.is_empty() {
            return Ok(Vec::new());
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self
            .dir
            .join(format!("social_findings_{}.json", Self::stamp()));
        let json = serde_json::to_string_pretty(findings)
            .context("Failed to serialize social findings")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Exported {} social findings to {}", findings.len(), path.display());
        Ok(vec![path])
    }
}
