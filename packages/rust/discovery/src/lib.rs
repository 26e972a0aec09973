//! Sitemap index resolution.
//!
//! Before pages can be ranked, interlink needs the set of candidate URLs a
//! site publishes. Sites usually expose them through a sitemap, which may
//! itself be an index of further sitemaps. [`IndexResolver`] walks that tree,
//! bounded in both depth and breadth, and flattens it into a deduplicated
//! list of content URLs.
//!
//! Failure policy: the top-level index must be fetchable, parseable, and must
//! yield at least one URL, otherwise resolution fails. Any failure in a nested
//! index is logged and that branch contributes nothing.

mod parser;

use std::collections::HashSet;

use interlink_shared::{InterlinkError, ResolveLimits, Result, Transport};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub use parser::SitemapDocument;

// ---------------------------------------------------------------------------
// Walk state
// ---------------------------------------------------------------------------

/// Mutable state for one top-level resolution. Never shared across calls.
struct Walk<'e> {
    exclude_url: &'e str,
    /// Index URLs already fetched (or attempted).
    visited: HashSet<String>,
    /// Nested indexes still to visit; popped from the back (depth-first).
    pending: Vec<String>,
    /// Candidate URLs in discovery order.
    found: Vec<String>,
    seen: HashSet<String>,
}

impl<'e> Walk<'e> {
    fn new(exclude_url: &'e str) -> Self {
        Self {
            exclude_url,
            visited: HashSet::new(),
            pending: Vec::new(),
            found: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push_candidate(&mut self, url: String) {
        if self.seen.insert(url.clone()) {
            self.found.push(url);
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Recursively resolves a sitemap (or sitemap index) into candidate URLs.
pub struct IndexResolver<'t, T: Transport> {
    transport: &'t T,
    limits: ResolveLimits,
}

impl<'t, T: Transport> IndexResolver<'t, T> {
    pub fn new(transport: &'t T, limits: ResolveLimits) -> Self {
        Self { transport, limits }
    }

    /// Resolve the index tree rooted at `index_url`.
    ///
    /// `exclude_url` (the article itself, with or without a trailing slash)
    /// never appears in the output. Fails with
    /// [`InterlinkError::Fetch`]/[`InterlinkError::Parse`] if the root index
    /// cannot be read, and with [`InterlinkError::EmptyIndex`] if the whole
    /// tree yields no candidates.
    #[instrument(skip_all, fields(index_url = %index_url))]
    pub async fn resolve(&self, index_url: &str, exclude_url: &str) -> Result<Vec<String>> {
        let mut walk = Walk::new(exclude_url);

        self.visit(index_url, &mut walk).await?;

        while let Some(next) = walk.pending.pop() {
            self.resolve_branch(&next, &mut walk).await;
        }

        if walk.found.is_empty() {
            return Err(InterlinkError::EmptyIndex {
                url: index_url.to_string(),
            });
        }

        info!(
            candidates = walk.found.len(),
            indexes_fetched = walk.visited.len(),
            "index resolved"
        );

        Ok(walk.found)
    }

    /// Visit a nested index. Failures are logged and contribute nothing.
    async fn resolve_branch(&self, index_url: &str, walk: &mut Walk<'_>) {
        let before = walk.found.len();
        match self.visit(index_url, walk).await {
            Ok(()) => debug!(
                %index_url,
                added = walk.found.len() - before,
                "sub-index resolved"
            ),
            Err(e) => warn!(%index_url, error = %e, "skipping sub-index"),
        }
    }

    /// Fetch and parse one index, queueing its nested indexes and recording
    /// its content URLs.
    async fn visit(&self, index_url: &str, walk: &mut Walk<'_>) -> Result<()> {
        if walk.visited.contains(index_url) {
            debug!(%index_url, "already visited, skipping");
            return Ok(());
        }
        if walk.visited.len() >= self.limits.max_visited {
            debug!(%index_url, max = self.limits.max_visited, "visit budget exhausted");
            return Ok(());
        }
        walk.visited.insert(index_url.to_string());

        let body = self.transport.fetch_text(index_url).await?;
        let doc = parser::parse_sitemap(&body)?;
        let base = Url::parse(index_url).ok();

        if !doc.nested.is_empty() {
            let followed: Vec<String> = doc
                .nested
                .iter()
                .filter(|u| !self.is_skipped_index(u))
                .take(self.limits.max_fan_out)
                .map(|u| absolutize(base.as_ref(), u))
                .collect();

            debug!(
                %index_url,
                listed = doc.nested.len(),
                followed = followed.len(),
                "sitemap index detected"
            );

            // Reverse so the first listed index is popped first.
            walk.pending.extend(followed.into_iter().rev());
        }

        for entry in &doc.entries {
            let url = absolutize(base.as_ref(), entry);
            if url.is_empty()
                || is_excluded(&url, walk.exclude_url)
                || self.is_index_file(&url)
            {
                continue;
            }
            walk.push_candidate(url);
        }

        Ok(())
    }

    /// Nested indexes for taxonomy/author/media listings are not worth following.
    fn is_skipped_index(&self, url: &str) -> bool {
        self.limits.skip_markers.iter().any(|m| url.contains(m.as_str()))
    }

    fn is_index_file(&self, url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        self.limits
            .index_extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// True if `url` is the excluded URL or differs from it only by a trailing slash.
fn is_excluded(url: &str, exclude_url: &str) -> bool {
    url == exclude_url
        || url.strip_suffix('/') == Some(exclude_url)
        || exclude_url.strip_suffix('/') == Some(url)
}

/// Resolve a relative `<loc>` against the index URL; absolute values pass through untouched.
fn absolutize(base: Option<&Url>, loc: &str) -> String {
    match Url::parse(loc) {
        Ok(_) => loc.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .and_then(|b| b.join(loc).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| loc.to_string()),
        Err(_) => loc.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use interlink_shared::{HttpTransport, TransportOptions};
    use proptest::prelude::*;

    /// In-memory transport that records every URL it serves.
    #[derive(Default)]
    struct StaticTransport {
        pages: HashMap<String, String>,
        fetched: Mutex<Vec<String>>,
    }

    impl StaticTransport {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    impl Transport for StaticTransport {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            self.fetched.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| InterlinkError::status(url, 404))
        }
    }

    fn urlset(urls: &[&str]) -> String {
        let body: String = urls
            .iter()
            .map(|u| format!("<url><loc>{u}</loc></url>"))
            .collect();
        format!(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{body}</urlset>"#)
    }

    fn sitemap_index(urls: &[&str]) -> String {
        let body: String = urls
            .iter()
            .map(|u| format!("<sitemap><loc>{u}</loc></sitemap>"))
            .collect();
        format!(
            r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{body}</sitemapindex>"#
        )
    }

    fn fixture(name: &str, base: &str) -> String {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/sitemaps")
            .join(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
            .replace("{base}", base)
    }

    fn resolver(transport: &StaticTransport) -> IndexResolver<'_, StaticTransport> {
        IndexResolver::new(transport, ResolveLimits::default())
    }

    #[test]
    fn exclusion_covers_trailing_slash_variants() {
        assert!(is_excluded("https://x.test/post", "https://x.test/post"));
        assert!(is_excluded("https://x.test/post/", "https://x.test/post"));
        assert!(is_excluded("https://x.test/post", "https://x.test/post/"));
        assert!(!is_excluded("https://x.test/post-2", "https://x.test/post"));
    }

    #[test]
    fn absolutize_relative_locs() {
        let base = Url::parse("https://x.test/sitemaps/index.xml").unwrap();
        assert_eq!(absolutize(Some(&base), "/blog/a"), "https://x.test/blog/a");
        assert_eq!(absolutize(Some(&base), "https://y.test/b"), "https://y.test/b");
        assert_eq!(absolutize(None, "/blog/a"), "/blog/a");
    }

    #[tokio::test]
    async fn excluded_only_entry_is_empty_index() {
        let transport = StaticTransport::default().with(
            "https://x.test/sitemap.xml",
            &urlset(&["https://x.test/post"]),
        );
        let err = resolver(&transport)
            .resolve("https://x.test/sitemap.xml", "https://x.test/post")
            .await
            .unwrap_err();
        assert!(matches!(err, InterlinkError::EmptyIndex { .. }));
    }

    #[tokio::test]
    async fn index_of_indexes_flattens_leaf() {
        let transport = StaticTransport::default()
            .with(
                "https://x.test/sitemap.xml",
                &sitemap_index(&["https://x.test/post-sitemap.xml"]),
            )
            .with(
                "https://x.test/post-sitemap.xml",
                &urlset(&["https://x.test/a", "https://x.test/b"]),
            );
        let urls = resolver(&transport)
            .resolve("https://x.test/sitemap.xml", "https://x.test/c")
            .await
            .unwrap();
        assert_eq!(urls, vec!["https://x.test/a", "https://x.test/b"]);
    }

    #[tokio::test]
    async fn root_failures_are_fatal() {
        let transport = StaticTransport::default()
            .with("https://x.test/broken.xml", "<urlset><url></urlset>");

        let err = resolver(&transport)
            .resolve("https://x.test/missing.xml", "https://x.test/c")
            .await
            .unwrap_err();
        assert!(matches!(err, InterlinkError::Fetch { status: Some(404), .. }));

        let err = resolver(&transport)
            .resolve("https://x.test/broken.xml", "https://x.test/c")
            .await
            .unwrap_err();
        assert!(matches!(err, InterlinkError::Parse { .. }));
    }

    #[tokio::test]
    async fn branch_failures_are_swallowed() {
        let transport = StaticTransport::default()
            .with(
                "https://x.test/sitemap.xml",
                &sitemap_index(&[
                    "https://x.test/gone-sitemap.xml",
                    "https://x.test/broken-sitemap.xml",
                    "https://x.test/post-sitemap.xml",
                ]),
            )
            .with("https://x.test/broken-sitemap.xml", "<urlset><url>")
            .with("https://x.test/post-sitemap.xml", &urlset(&["https://x.test/a"]));

        let urls = resolver(&transport)
            .resolve("https://x.test/sitemap.xml", "https://x.test/c")
            .await
            .unwrap();
        assert_eq!(urls, vec!["https://x.test/a"]);
        assert_eq!(transport.fetched().len(), 4);
    }

    #[tokio::test]
    async fn all_branches_failing_is_empty_index() {
        let transport = StaticTransport::default().with(
            "https://x.test/sitemap.xml",
            &sitemap_index(&["https://x.test/gone-sitemap.xml"]),
        );
        let err = resolver(&transport)
            .resolve("https://x.test/sitemap.xml", "https://x.test/c")
            .await
            .unwrap_err();
        assert!(matches!(err, InterlinkError::EmptyIndex { .. }));
    }

    #[tokio::test]
    async fn fan_out_is_capped() {
        let children: Vec<String> = (0..15)
            .map(|i| format!("https://x.test/posts-{i}.xml"))
            .collect();
        let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();

        let mut transport = StaticTransport::default()
            .with("https://x.test/sitemap.xml", &sitemap_index(&child_refs));
        for (i, child) in children.iter().enumerate() {
            let page = format!("https://x.test/page-{i}");
            transport = transport.with(child, &urlset(&[page.as_str()]));
        }

        let urls = resolver(&transport)
            .resolve("https://x.test/sitemap.xml", "https://x.test/c")
            .await
            .unwrap();
        assert_eq!(urls.len(), 10);
        assert_eq!(urls[0], "https://x.test/page-0");
        assert_eq!(urls[9], "https://x.test/page-9");
        assert_eq!(transport.fetched().len(), 11);
    }

    #[tokio::test]
    async fn mixed_document_uses_both_shapes() {
        let mixed = r#"<root>
            <sitemap><loc>https://x.test/more.xml</loc></sitemap>
            <url><loc>https://x.test/direct</loc></url>
        </root>"#;
        let transport = StaticTransport::default()
            .with("https://x.test/sitemap.xml", mixed)
            .with("https://x.test/more.xml", &urlset(&["https://x.test/nested"]));

        let urls = resolver(&transport)
            .resolve("https://x.test/sitemap.xml", "https://x.test/c")
            .await
            .unwrap();
        assert_eq!(urls, vec!["https://x.test/direct", "https://x.test/nested"]);
    }

    #[tokio::test]
    async fn resolve_fixture_tree_with_mock_server() {
        let server = wiremock::MockServer::start().await;
        let base = server.uri();

        for name in ["sitemap-index.xml", "post-sitemap.xml", "page-sitemap.xml"] {
            wiremock::Mock::given(wiremock::matchers::method("GET"))
                .and(wiremock::matchers::path(format!("/{name}")))
                .respond_with(
                    wiremock::ResponseTemplate::new(200).set_body_string(fixture(name, &base)),
                )
                .expect(1)
                .mount(&server)
                .await;
        }

        // Taxonomy sitemaps must never be requested.
        wiremock::Mock::given(wiremock::matchers::path("/category-sitemap.xml"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(fixture(
                "category-sitemap.xml",
                &base,
            )))
            .expect(0)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&TransportOptions::default()).unwrap();
        let resolver = IndexResolver::new(&transport, ResolveLimits::default());
        let urls = resolver
            .resolve(
                &format!("{base}/sitemap-index.xml"),
                &format!("{base}/blog/intro-to-sitemaps"),
            )
            .await
            .unwrap();

        assert_eq!(
            urls,
            vec![
                format!("{base}/blog/rust-error-handling"),
                format!("{base}/blog/async-rust-patterns"),
                format!("{base}/blog/rust-web-scraping-guide"),
                format!("{base}/about"),
            ]
        );
    }

    #[tokio::test]
    async fn http_error_on_root_propagates() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::path("/sitemap.xml"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&TransportOptions::default()).unwrap();
        let err = IndexResolver::new(&transport, ResolveLimits::default())
            .resolve(&format!("{}/sitemap.xml", server.uri()), "https://x.test/c")
            .await
            .unwrap_err();
        assert!(matches!(err, InterlinkError::Fetch { status: Some(503), .. }));
    }

    proptest! {
        #[test]
        fn cyclic_graphs_stay_within_visit_budget(
            edges in prop::collection::vec(prop::collection::vec(0usize..40, 0..12), 1..40),
        ) {
            let n = edges.len();
            let mut transport = StaticTransport::default();
            for (i, targets) in edges.iter().enumerate() {
                let nested: Vec<String> = targets
                    .iter()
                    .map(|t| format!("https://x.test/idx-{}.xml", t % n))
                    .collect();
                let nested_refs: Vec<&str> = nested.iter().map(String::as_str).collect();
                let body = format!(
                    "<root>{}<url><loc>https://x.test/page-{i}</loc></url></root>",
                    sitemap_index(&nested_refs)
                );
                transport = transport.with(&format!("https://x.test/idx-{i}.xml"), &body);
            }

            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let urls = rt
                .block_on(resolver(&transport).resolve("https://x.test/idx-0.xml", "https://x.test/page-0"))
                .unwrap_or_default();

            let fetched = transport.fetched();
            let unique: HashSet<&String> = fetched.iter().collect();
            prop_assert!(fetched.len() <= 20);
            prop_assert_eq!(unique.len(), fetched.len());
            prop_assert!(!urls.contains(&"https://x.test/page-0".to_string()));
            let unique_urls: HashSet<&String> = urls.iter().collect();
            prop_assert_eq!(unique_urls.len(), urls.len());
        }
    }
}
