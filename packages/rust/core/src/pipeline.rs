//! End-to-end pipeline: sitemap → candidates, article → content, score, inject.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, instrument};
use url::Url;

use interlink_crawler::ContentFetcher;
use interlink_discovery::IndexResolver;
use interlink_inject::LinkInjector;
use interlink_relevance::RelevanceScorer;
use interlink_shared::{
    AppConfig, ArticleContent, ExtractRules, InterlinkError, ResolveLimits, Result, ScoreWeights,
    ScoredCandidate, Transport,
};

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Sitemap or sitemap index to draw candidates from.
    pub index_url: String,
    /// Article that receives the links.
    pub article_url: String,
    /// Maximum number of links to insert.
    pub num_links: usize,
    /// Fixed seed for template selection; `None` draws from entropy.
    pub seed: Option<u64>,
    pub limits: ResolveLimits,
    pub rules: ExtractRules,
    pub weights: ScoreWeights,
}

impl PipelineConfig {
    /// Settings from `config`, with `num_links` from its defaults.
    pub fn new(
        index_url: impl Into<String>,
        article_url: impl Into<String>,
        config: &AppConfig,
    ) -> Self {
        Self {
            index_url: index_url.into(),
            article_url: article_url.into(),
            num_links: config.defaults.num_links,
            seed: None,
            limits: ResolveLimits::from(config),
            rules: ExtractRules::from(config),
            weights: ScoreWeights::from(config),
        }
    }

    /// Both URLs must be absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        let urls = [
            ("sitemap URL", &self.index_url),
            ("article URL", &self.article_url),
        ];
        for (label, value) in urls {
            let parsed = Url::parse(value).map_err(|e| {
                InterlinkError::validation(format!("invalid {label} '{value}': {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(InterlinkError::validation(format!(
                    "{label} must use http or https, got '{}'",
                    parsed.scheme()
                )));
            }
        }
        self.weights.validate()
    }
}

/// Candidates ranked against the article, before injection.
#[derive(Debug, Clone)]
pub struct Ranking {
    pub article: ArticleContent,
    /// Every candidate, descending by score.
    pub ranked: Vec<ScoredCandidate>,
    pub elapsed: Duration,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Article body markup with links inserted.
    pub html: String,
    pub links_injected: usize,
    pub candidates_analyzed: usize,
    pub word_count: usize,
    /// Candidates that were offered to the injector, best first.
    pub selected: Vec<ScoredCandidate>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once the sitemap has been resolved.
    fn candidates_found(&self, count: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &PipelineResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn candidates_found(&self, _count: usize) {}
    fn done(&self, _result: &PipelineResult) {}
}

/// Resolve the sitemap, fetch the article and rank every candidate.
///
/// Stages run strictly in sequence. Any error aborts the run.
#[instrument(skip_all, fields(index_url = %config.index_url, article_url = %config.article_url))]
pub async fn rank<T: Transport>(
    transport: &T,
    config: &PipelineConfig,
    progress: &dyn ProgressReporter,
) -> Result<Ranking> {
    let start = Instant::now();
    config.validate()?;

    progress.phase("Fetching sitemap");
    let resolver = IndexResolver::new(transport, config.limits.clone());
    let candidates = resolver
        .resolve(&config.index_url, &config.article_url)
        .await?;
    progress.candidates_found(candidates.len());

    progress.phase("Fetching article");
    let fetcher = ContentFetcher::new(transport, &config.rules)?;
    let article = fetcher.fetch_content(&config.article_url).await?;

    progress.phase("Scoring candidates");
    let ranked = RelevanceScorer::new(config.weights).score(&article, &candidates);

    Ok(Ranking {
        article,
        ranked,
        elapsed: start.elapsed(),
    })
}

/// Run the full pipeline.
///
/// 1. Resolve the sitemap into candidate URLs
/// 2. Fetch and clean the article
/// 3. Score and rank candidates
/// 4. Insert links to the top `num_links` candidates
#[instrument(skip_all, fields(index_url = %config.index_url, article_url = %config.article_url))]
pub async fn run_pipeline<T: Transport>(
    transport: &T,
    config: &PipelineConfig,
    progress: &dyn ProgressReporter,
) -> Result<PipelineResult> {
    let start = Instant::now();
    info!(num_links = config.num_links, "starting link pipeline");

    let Ranking {
        article, ranked, ..
    } = rank(transport, config, progress).await?;
    let candidates_analyzed = ranked.len();

    let mut selected = ranked;
    selected.truncate(config.num_links);

    progress.phase("Injecting links");
    let injected = LinkInjector::from_seed(config.seed).inject(
        &article.html_body,
        &selected,
        config.num_links,
    )?;

    let result = PipelineResult {
        html: injected.html,
        links_injected: injected.inserted,
        candidates_analyzed,
        word_count: article.word_count,
        selected,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        links_injected = result.links_injected,
        candidates_analyzed = result.candidates_analyzed,
        word_count = result.word_count,
        elapsed_ms = result.elapsed.as_millis(),
        "link pipeline complete"
    );

    Ok(result)
}
