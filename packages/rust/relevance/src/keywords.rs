//! Keyword extraction.

use std::collections::HashMap;

/// Maximum number of keywords returned.
pub const MAX_KEYWORDS: usize = 20;

/// Tokens of this many characters or fewer are never keywords.
const MIN_LEN_EXCLUSIVE: usize = 3;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from",
    "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does", "did",
    "will", "would", "should", "could", "may", "might", "must", "can", "this", "that", "these",
    "those", "what", "which", "who", "when", "where", "why", "how",
];

/// The most frequent non-stop-word tokens of `text`, most frequent first.
///
/// Text is lower-cased and every character other than a letter, digit or
/// whitespace acts as a separator. Equal frequencies keep first-occurrence
/// order. Returns at most [`MAX_KEYWORDS`] distinct tokens.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    // token -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, token) in folded
        .split_whitespace()
        .filter(|t| t.chars().count() > MIN_LEN_EXCLUSIVE && !STOP_WORDS.contains(t))
        .enumerate()
    {
        counts.entry(token).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(token, (count, first))| (token, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(token, ..)| token.to_string())
        .collect()
}
