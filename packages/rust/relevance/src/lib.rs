//! Topical relevance between an article and candidate pages.
//!
//! - [`keywords`]: frequency-ranked salient tokens of a text
//! - [`similarity`]: set-overlap and URL-structure measures
//! - [`scoring`]: the weighted combination that ranks candidates

pub mod keywords;
pub mod scoring;
pub mod similarity;

pub use keywords::extract_keywords;
pub use scoring::{RelevanceScorer, extract_slug, slug_to_title};
pub use similarity::{jaccard, keyword_overlap, slug_similarity, url_structure_similarity};
