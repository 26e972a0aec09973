//! Core domain types passed between pipeline stages.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ArticleContent
// ---------------------------------------------------------------------------

/// The cleaned body of the source article, produced once by the content
/// fetcher and consumed by both the scorer (`text`) and the injector
/// (`html_body`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleContent {
    /// Serialized markup of the content region after non-content removal.
    pub html_body: String,
    /// Document title, falling back to the first H1. May be empty.
    pub title: String,
    /// Flattened text of the cleaned region.
    pub text: String,
    /// Whitespace-separated word count of `text`.
    pub word_count: usize,
    /// The article's own URL.
    pub url: String,
}

// ---------------------------------------------------------------------------
// ScoredCandidate
// ---------------------------------------------------------------------------

/// A candidate page with its relevance score against the article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Absolute URL from the index.
    pub url: String,
    /// Readable title derived from the URL slug.
    pub title: String,
    /// Weighted relevance, in `[0, 1]`.
    pub score: f64,
}
