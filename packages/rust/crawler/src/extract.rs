//! Article region selection and non-content stripping.
//!
//! The region is located by trying the configured structural hints in order
//! (falling back to `<body>`), then re-parsed as a detached fragment so that
//! stripping never touches the source document.

use ego_tree::NodeId;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use interlink_shared::{ExtractRules, InterlinkError, Result};

/// Cleaned article region.
#[derive(Debug, Clone)]
pub struct Extracted {
    pub html_body: String,
    pub title: String,
    pub text: String,
    pub word_count: usize,
}

/// Compiled [`ExtractRules`].
#[derive(Debug)]
pub struct ContentExtractor {
    region: Vec<Selector>,
    strip: Vec<Selector>,
}

impl ContentExtractor {
    /// Compile the region and strip selectors. Invalid selectors are a config error.
    pub fn new(rules: &ExtractRules) -> Result<Self> {
        Ok(Self {
            region: compile(&rules.region_selectors)?,
            strip: compile(&rules.strip_selectors)?,
        })
    }

    pub fn extract(&self, html: &str) -> Extracted {
        let doc = Html::parse_document(html);
        let title = document_title(&doc);

        let region_html = self
            .region
            .iter()
            .zip(0..)
            .find_map(|(sel, i)| doc.select(sel).next().map(|el| (el, i)))
            .map(|(el, i)| {
                debug!(hint = i, "content region matched");
                el.inner_html()
            })
            .or_else(|| {
                debug!("no content region matched, using <body>");
                first_match(&doc, "body").map(|el| el.inner_html())
            })
            .unwrap_or_default();

        let mut region = Html::parse_fragment(&region_html);
        let removed = self.strip_non_content(&mut region);

        let root = region.root_element();
        let html_body = root.inner_html();
        let text: String = root.text().collect();
        let word_count = text.split_whitespace().count();

        debug!(removed, word_count, "region cleaned");

        Extracted {
            html_body,
            title,
            text,
            word_count,
        }
    }

    /// Detach every strip-listed or ad-looking element. Returns how many were removed.
    fn strip_non_content(&self, region: &mut Html) -> usize {
        let mut doomed: Vec<NodeId> = Vec::new();
        let root = region.root_element();

        for sel in &self.strip {
            doomed.extend(root.select(sel).map(|el| el.id()));
        }
        doomed.extend(
            root.descendants()
                .filter_map(ElementRef::wrap)
                .filter(|el| looks_like_ad(el.value()))
                .map(|el| el.id()),
        );

        let mut removed = 0;
        for id in doomed {
            if let Some(mut node) = region.tree.get_mut(id) {
                if node.parent().is_some() {
                    node.detach();
                    removed += 1;
                }
            }
        }
        removed
    }
}

fn compile(selectors: &[String]) -> Result<Vec<Selector>> {
    selectors
        .iter()
        .map(|s| {
            Selector::parse(s)
                .map_err(|e| InterlinkError::config(format!("invalid selector '{s}': {e}")))
        })
        .collect()
}

fn first_match<'a>(doc: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel).next()
}

fn collapsed_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `<title>` text, falling back to the first `<h1>`.
fn document_title(doc: &Html) -> String {
    ["title", "h1"]
        .into_iter()
        .filter_map(|tag| first_match(doc, tag).map(collapsed_text))
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

/// Class or id tokens that mark advertising containers.
fn looks_like_ad(el: &Element) -> bool {
    el.classes().chain(el.id()).any(|token| {
        let t = token.to_ascii_lowercase();
        t == "ad"
            || t == "ads"
            || t.starts_with("ad-")
            || t.starts_with("ads-")
            || t.ends_with("-ad")
            || t.contains("-ad-")
            || t.starts_with("advert")
            || t.contains("sponsor")
    })
}
