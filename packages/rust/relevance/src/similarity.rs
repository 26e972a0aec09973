//! Similarity measures. All return a value in `[0, 1]` and never fail.

use std::collections::HashSet;
use std::hash::Hash;

use url::Url;

/// `|a ∩ b| / |a ∪ b|`, or 0 when both sets are empty.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn slug_tokens(slug: &str) -> HashSet<String> {
    slug.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Jaccard similarity of two slugs tokenized on whitespace, `-` and `_`.
pub fn slug_similarity(a: &str, b: &str) -> f64 {
    jaccard(&slug_tokens(a), &slug_tokens(b))
}

/// Jaccard similarity of two keyword lists, ignoring rank.
pub fn keyword_overlap(a: &[String], b: &[String]) -> f64 {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    jaccard(&a, &b)
}

/// Non-empty path segments of `url`, or `None` if it does not parse.
pub(crate) fn path_segments(url: &str) -> Option<Vec<String>> {
    let parsed = Url::parse(url).ok()?;
    Some(
        parsed
            .path_segments()
            .map(|segs| segs.filter(|s| !s.is_empty()).map(String::from).collect())
            .unwrap_or_default(),
    )
}

/// Fraction of matching leading directory segments.
///
/// Only the first `n - 1` positions are compared, where `n` is the shorter
/// path length; the final segment (the slug) is excluded. Returns 0 when
/// `n <= 1` or either URL is malformed.
pub fn url_structure_similarity(a: &str, b: &str) -> f64 {
    let (Some(a), Some(b)) = (path_segments(a), path_segments(b)) else {
        return 0.0;
    };
    let n = a.len().min(b.len());
    if n <= 1 {
        return 0.0;
    }
    let matches = a[..n - 1]
        .iter()
        .zip(&b[..n - 1])
        .filter(|(x, y)| x == y)
        .count();
    matches as f64 / (n - 1) as f64
}
