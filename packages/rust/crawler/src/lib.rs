//! Article fetching and content extraction.
//!
//! [`ContentFetcher`] downloads an article page and reduces it to the region
//! that holds the actual writing: site chrome, navigation, comment threads,
//! advertising and scripts are removed before anything downstream looks at it.

mod extract;

use interlink_shared::{ArticleContent, ExtractRules, InterlinkError, Result, Transport};
use tracing::{info, instrument};

pub use extract::{ContentExtractor, Extracted};

/// Fetches an article and extracts its cleaned content region.
pub struct ContentFetcher<'t, T: Transport> {
    transport: &'t T,
    extractor: ContentExtractor,
}

impl<'t, T: Transport> ContentFetcher<'t, T> {
    /// Fails with [`InterlinkError::Config`] if a configured selector is invalid.
    pub fn new(transport: &'t T, rules: &ExtractRules) -> Result<Self> {
        Ok(Self {
            transport,
            extractor: ContentExtractor::new(rules)?,
        })
    }

    /// Fetch `url` and extract its article content.
    ///
    /// Any failure is reported as [`InterlinkError::Article`] naming the URL,
    /// with the underlying fetch error as its source.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch_content(&self, url: &str) -> Result<ArticleContent> {
        let html = self
            .transport
            .fetch_text(url)
            .await
            .map_err(|e| InterlinkError::article(url, e))?;

        let extracted = self.extractor.extract(&html);

        info!(
            title = %extracted.title,
            words = extracted.word_count,
            "article extracted"
        );

        Ok(ArticleContent {
            html_body: extracted.html_body,
            title: extracted.title,
            text: extracted.text,
            word_count: extracted.word_count,
            url: url.to_string(),
        })
    }
}
