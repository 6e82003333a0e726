// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Suspicious Domain Discovery
 * Generates lookalike candidates for the configured official domains
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use async_trait::async_trait;
use std::collections::BTreeSet;

/// Supplies candidate malicious domains to seed the crawl with.
#[async_trait]
pub trait DomainDiscovery: Send + Sync {
    async fn discover(
        &self,
        official_domains: &[String],
        suspicious_tlds: &[String],
    ) -> Vec<String>;
}

/// Permutation-based discovery: noisy prefixes and suffixes, homoglyph
/// substitutions, character elisions and transpositions, plus the official
/// root label combined with every suspicious TLD. Pure generation; whether
/// a candidate resolves or is registered is the scan's job to find out.
pub struct VariantDiscovery;

fn variants(domain: &str) -> BTreeSet<String> {
    let root = domain.split('.').next().unwrap_or(domain);
    let mut out = BTreeSet::new();

    for prefix in ["www.", "secure.", "login.", "accounts."] {
        out.insert(format!("{prefix}{domain}"));
    }
    for suffix in ["-secure", "-login", "secure-", "auth"] {
        out.insert(format!("{root}{suffix}.com"));
    }

    // homoglyph substitutions
    out.insert(domain.replace('o', "0"));
    out.insert(domain.replace('l', "1"));

    // missing letter / swapped adjacent characters
    let chars: Vec<char> = root.chars().collect();
    if chars.len() > 2 {
        if let Some((_, rest)) = domain.split_once('.') {
            let headless: String = chars[1..].iter().collect();
            let tailless: String = chars[..chars.len() - 1].iter().collect();
            out.insert(format!("{headless}.{rest}"));
            out.insert(format!("{tailless}.{rest}"));

            let mut swapped = chars.clone();
            swapped.swap(0, 1);
            let swapped: String = swapped.into_iter().collect();
            out.insert(format!("{swapped}.{rest}"));
        }
    }

    out.insert(domain.to_string());
    out.retain(|candidate| !candidate.is_empty());
    out
}

#[async_trait]
impl DomainDiscovery for VariantDiscovery {
    async fn discover(
        &self,
        official_domains: &[String],
        suspicious_tlds: &[String],
    ) -> Vec<String> {
        let mut candidates = BTreeSet::new();

        for domain in official_domains {
            candidates.extend(variants(domain));

            let root = domain.split('.').next().unwrap_or(domain);
            for tld in suspicious_tlds {
                let tld = tld.trim_start_matches('.');
                candidates.insert(format!("{root}.{tld}"));
            }
        }

        candidates
            .into_iter()
            .filter(|candidate| {
                let bare = candidate.strip_prefix("www.").unwrap_or(candidate);
                !official_domains.iter().any(|official| official == bare)
            })
            .collect()
    }
}
