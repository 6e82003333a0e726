// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use validator::Validate;

/// Immutable run configuration. Built once at startup, validated, and handed
/// to the engine and every worker as a shared value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ScannerConfig {
    /// Phrases the brand uses in real communications; page text is scored
    /// against these.
    pub brand_templates: Vec<String>,

    /// Starting URLs for a fresh run.
    pub seeds: Vec<String>,

    /// Domains the brand actually owns. Never flagged; typosquat candidates
    /// are measured against these.
    pub official_domains: Vec<String>,

    /// TLD denylist, entries with a leading dot (".zip", ".top").
    pub suspicious_tlds: Vec<String>,

    /// Keywords whose presence in a discovered domain marks the link
    /// suspicious even without a TLD or typosquat match.
    pub brand_keywords: Vec<String>,

    #[validate(range(min = 1, max = 256))]
    pub max_workers: usize,

    #[validate(range(min = 1, max = 300))]
    pub fetch_timeout_secs: u64,

    /// Similarity below this scores 0.0.
    #[validate(range(min = 0.0, max = 1.0))]
    pub similarity_threshold: f64,

    /// Edit-distance ratio (0-100) above which a domain counts as a
    /// typosquat of an official domain.
    #[validate(range(min = 0.0, max = 100.0))]
    pub typosquat_threshold: f64,

    /// Risk above this fires one alert per record.
    #[validate(range(min = 0.0, max = 1.0))]
    pub alert_risk_threshold: f64,

    pub checkpoint_path: PathBuf,

    /// Directory findings exports are written into.
    pub export_dir: PathBuf,

    pub alert_webhook_url: Option<String>,

    pub whois_api_key: Option<String>,

    /// Optional CSV feed of known phishing URLs, used as extra seeds.
    pub feed_url: Option<String>,

    pub social_keywords: Vec<String>,

    pub social_bearer_token: Option<String>,

    pub safe_browsing_api_key: Option<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            brand_templates: Vec::new(),
            seeds: Vec::new(),
            official_domains: Vec::new(),
            suspicious_tlds: Vec::new(),
            brand_keywords: Vec::new(),
            max_workers: 5,
            fetch_timeout_secs: 10,
            similarity_threshold: 0.65,
            typosquat_threshold: 85.0,
            alert_risk_threshold: 0.7,
            checkpoint_path: PathBuf::from("scan_state.json"),
            export_dir: PathBuf::from("."),
            alert_webhook_url: None,
            whois_api_key: None,
            feed_url: None,
            social_keywords: Vec::new(),
            social_bearer_token: None,
            safe_browsing_api_key: None,
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a YAML file. A missing file degrades to the
    /// built-in defaults; an unparseable or invalid file is a startup
    /// failure.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Self = serde_yaml::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            info!("Loaded configuration from {}", path.display());
            config
        } else {
            warn!(
                "{} not found, starting with built-in defaults",
                path.display()
            );
            Self::default()
        };

        config.apply_env_overrides();
        config
            .validate()
            .context("Invalid scanner configuration")?;

        Ok(config)
    }

    /// Secrets come from the environment when present, so config files can
    /// be committed without them.
    fn apply_env_overrides(&mut self) {
        for (var, slot) in [
            ("WHOIS_API_KEY", &mut self.whois_api_key),
            ("SOCIAL_BEARER_TOKEN", &mut self.social_bearer_token),
            ("SAFE_BROWSING_API_KEY", &mut self.safe_browsing_api_key),
            ("ALERT_WEBHOOK_URL", &mut self.alert_webhook_url),
        ] {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *slot = Some(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ScannerConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_workers() {
        let config = ScannerConfig {
            max_workers: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_partial_yaml() {
        let raw = r#"
seeds:
  - "http://good.example"
official_domains:
  - "good.example"
max_workers: 3
"#;
        let config: ScannerConfig = serde_yaml::from_str(raw).unwrap();
        assert_eq!(config.seeds, vec!["http://good.example".to_string()]);
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.fetch_timeout_secs, 10);
    }
}
