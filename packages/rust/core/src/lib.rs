//! Core pipeline orchestration for interlink.
//!
//! This crate ties together sitemap resolution, article extraction,
//! relevance scoring and link injection into end-to-end workflows
//! ([`run_pipeline`], [`rank`]).

pub mod pipeline;

pub use pipeline::{
    PipelineConfig, PipelineResult, ProgressReporter, Ranking, SilentProgress, rank, run_pipeline,
};
