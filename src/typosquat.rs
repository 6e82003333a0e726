// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use strsim::normalized_levenshtein;

/// Edit-distance similarity of two domain strings on a 0-100 scale.
pub fn edit_ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

/// True when `domain` is likely a typosquat of any official domain, i.e.
/// its edit ratio against one of them exceeds `threshold`. Official domains
/// themselves never count.
pub fn is_typosquat(domain: &str, official_domains: &[String], threshold: f64) -> bool {
    official_domains.iter().any(|official| {
        official != domain && edit_ratio(domain, official) > threshold
    })
}
