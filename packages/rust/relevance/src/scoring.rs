//! Relevance scoring of candidate URLs against an article.

use std::sync::LazyLock;

use interlink_shared::{ArticleContent, ScoreWeights, ScoredCandidate};
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::keywords::extract_keywords;
use crate::similarity::{keyword_overlap, path_segments, slug_similarity, url_structure_similarity};

static PAGE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(html|htm|php|asp|aspx)$").expect("valid regex"));

/// Final non-empty path segment of `url`; empty for malformed URLs or bare hosts.
pub fn extract_slug(url: &str) -> String {
    path_segments(url)
        .and_then(|mut segs| segs.pop())
        .unwrap_or_default()
}

/// Readable title from a slug: separators become spaces and a trailing
/// page extension is dropped.
pub fn slug_to_title(slug: &str) -> String {
    let spaced = slug.replace(['-', '_'], " ");
    PAGE_EXTENSION.replace(&spaced, "").trim().to_string()
}

/// Ranks candidates by weighted slug, keyword and URL-structure similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceScorer {
    weights: ScoreWeights,
}

impl RelevanceScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Score every candidate and return them sorted by descending score.
    ///
    /// Nothing is dropped; equal scores keep their input order.
    #[instrument(skip_all, fields(article = %article.url, candidates = candidates.len()))]
    pub fn score(&self, article: &ArticleContent, candidates: &[String]) -> Vec<ScoredCandidate> {
        let article_slug = extract_slug(&article.url);
        let article_keywords = extract_keywords(&article.text);
        debug!(slug = %article_slug, keywords = ?article_keywords, "article features");

        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|url| {
                let slug = extract_slug(url);
                let title = slug_to_title(&slug);

                let slug_score = slug_similarity(&article_slug, &slug);
                let keyword_score = keyword_overlap(&article_keywords, &extract_keywords(&title));
                let structure_score = url_structure_similarity(&article.url, url);

                let score = self.weights.slug * slug_score
                    + self.weights.keywords * keyword_score
                    + self.weights.structure * structure_score;

                debug!(%url, slug_score, keyword_score, structure_score, score, "scored");

                ScoredCandidate {
                    url: url.clone(),
                    title,
                    score,
                }
            })
            .collect();

        // stable: ties keep discovery order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        info!(
            scored = scored.len(),
            best = scored.first().map(|c| c.score).unwrap_or(0.0),
            "candidates ranked"
        );

        scored
    }
}
