//! Shared types, error model, configuration, and HTTP transport for interlink.
//!
//! This crate is the foundation depended on by all other interlink crates.
//! It provides:
//! - [`InterlinkError`] — the unified error type
//! - Domain types ([`ArticleContent`], [`ScoredCandidate`])
//! - Configuration ([`AppConfig`], runtime limits derived from it, config loading)
//! - The [`Transport`] seam and its `reqwest` implementation, [`HttpTransport`]

pub mod config;
pub mod error;
pub mod transport;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ContentConfig, DefaultsConfig, ExtractRules, IndexConfig, ResolveLimits,
    ScoreWeights, ScoringConfig, TransportOptions, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{InterlinkError, Result};
pub use transport::{HttpTransport, Transport};
pub use types::{ArticleContent, ScoredCandidate};
