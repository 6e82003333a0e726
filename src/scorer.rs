// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Similarity Scorer
 * Scores page text against brand phrase templates
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use async_trait::async_trait;
use std::collections::HashSet;

/// Scores a text against the configured brand templates. Returns a value in
/// [0, 1]; anything below the similarity threshold collapses to 0.0 so the
/// risk weighting never sees sub-threshold noise.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    async fn score(&self, text: &str, templates: &[String]) -> f64;
}

/// Token-overlap scorer. For each template, the fraction of its tokens
/// present in the text; the best template wins. A heavier embedding model
/// can sit behind the same trait without touching the pipeline.
pub struct LexicalScorer {
    threshold: f64,
}

impl LexicalScorer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() > 1)
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl SimilarityScorer for LexicalScorer {
    async fn score(&self, text: &str, templates: &[String]) -> f64 {
        if templates.is_empty() {
            return 0.0;
        }

        let text_tokens = tokenize(text);
        let best = templates
            .iter()
            .map(|template| {
                let template_tokens = tokenize(template);
                if template_tokens.is_empty() {
                    return 0.0;
                }
                let hits = template_tokens
                    .iter()
                    .filter(|token| text_tokens.contains(*token))
                    .count();
                hits as f64 / template_tokens.len() as f64
            })
            .fold(0.0, f64::max);

        if best >= self.threshold {
            best
        } else {
            0.0
        }
    }
}
