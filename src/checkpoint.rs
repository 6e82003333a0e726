// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Checkpoint Manager
 * Durable snapshot/restore of crawl state for resumable runs
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::types::ScanRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Snapshot of one run, exactly as serialized to disk. Only states taken
/// after a fully completed batch are ever written, so a loaded snapshot is
/// always internally consistent. URLs that were in flight when the process
/// died are absent from `scanned` and get re-scanned on resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointState {
    pub findings: Vec<ScanRecord>,
    pub scanned: Vec<String>,
    pub queue: Vec<String>,
}

pub struct CheckpointManager {
    path: PathBuf,
}

impl CheckpointManager {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Write the full state, replacing any previous checkpoint. The JSON
    /// goes to a sibling temp file first and is renamed into place, so a
    /// crash mid-write cannot leave a corrupt checkpoint behind.
    pub fn save(&self, state: &CheckpointState) -> Result<()> {
        let json =
            serde_json::to_string(state).context("Failed to serialize checkpoint state")?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }

    /// Load the previous run's state. A missing or unreadable checkpoint
    /// degrades to an empty state whose queue holds the configured seeds.
    pub fn load(&self, seeds: &[String]) -> CheckpointState {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Self::fresh(seeds),
        };

        match serde_json::from_str::<CheckpointState>(&raw) {
            Ok(state) => {
                info!(
                    "Resuming from saved state: {} scanned, {} in queue, {} findings",
                    state.scanned.len(),
                    state.queue.len(),
                    state.findings.len()
                );
                state
            }
            Err(e) => {
                warn!(
                    "Failed to parse {}: {}. Starting fresh.",
                    self.path.display(),
                    e
                );
                Self::fresh(seeds)
            }
        }
    }

    /// Delete the checkpoint to force a fresh run.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared scan state: {} deleted", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No scan state file to clear");
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", self.path.display())),
        }
    }

    fn fresh(seeds: &[String]) -> CheckpointState {
        CheckpointState {
            findings: Vec::new(),
            scanned: Vec::new(),
            queue: seeds.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;

    fn record(url: &str) -> ScanRecord {
        ScanRecord {
            url: url.to_string(),
            domain: "site.example".to_string(),
            title: "Title".to_string(),
            similarity: 0.4,
            whois: "registrar: demo".to_string(),
            tls: "issuer: demo".to_string(),
            screenshot: String::new(),
            risk: 0.24,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path().join("scan_state.json"));

        let state = CheckpointState {
            findings: vec![record("http://a.example"), record("http://b.example")],
            scanned: vec!["http://a.example".to_string(), "http://b.example".to_string()],
            queue: vec!["http://c.example".to_string()],
        };
        manager.save(&state).unwrap();

        let loaded = manager.load(&[]);
        assert_eq!(loaded.findings, state.findings);
        assert_eq!(
            loaded.scanned.iter().collect::<HashSet<_>>(),
            state.scanned.iter().collect::<HashSet<_>>()
        );
        assert_eq!(loaded.queue, state.queue);
    }

    #[test]
    fn missing_file_yields_seeded_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path().join("absent.json"));

        let seeds = vec!["http://seed.example".to_string()];
        let state = manager.load(&seeds);
        assert!(state.findings.is_empty());
        assert!(state.scanned.is_empty());
        assert_eq!(state.queue, seeds);
    }

    #[test]
    fn corrupt_file_yields_seeded_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan_state.json");
        fs::write(&path, "{not valid json").unwrap();

        let manager = CheckpointManager::new(&path);
        let state = manager.load(&["http://seed.example".to_string()]);
        assert_eq!(state.queue, vec!["http://seed.example".to_string()]);
    }

    #[test]
    fn save_fully_overwrites_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path().join("scan_state.json"));

        let big = CheckpointState {
            findings: vec![record("http://a.example")],
            scanned: vec!["http://a.example".to_string()],
            queue: vec!["http://b.example".to_string(), "http://c.example".to_string()],
        };
        manager.save(&big).unwrap();

        let small = CheckpointState::default();
        manager.save(&small).unwrap();

        let loaded = manager.load(&[]);
        assert!(loaded.findings.is_empty());
        assert!(loaded.scanned.is_empty());
        assert!(loaded.queue.is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan_state.json");
        let manager = CheckpointManager::new(&path);

        manager.save(&CheckpointState::default()).unwrap();
        manager.clear().unwrap();
        assert!(!path.exists());
        manager.clear().unwrap();
    }
}
