//! Link injection into article markup.
//!
//! [`LinkInjector`] spreads links to the top-ranked candidates evenly through
//! an article's paragraphs. Each link becomes a new `<p>` placed directly
//! after an existing paragraph; nothing already in the article is removed or
//! reordered. Template choice is drawn from the injector's RNG, so a seeded
//! RNG gives reproducible output.

mod placement;
mod templates;

use std::collections::HashMap;
use std::sync::LazyLock;

use ego_tree::{NodeId, NodeRef, Tree};
use interlink_shared::{InterlinkError, Result, ScoredCandidate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scraper::{Html, Node, Selector};
use tracing::{debug, info, instrument};

pub use placement::calculate_insertion_points;
pub use templates::{MAX_ANCHOR_CHARS, TRANSITIONS, Transition, format_anchor_text};

static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid selector"));
static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));

/// Result of one injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injected {
    /// Serialized body markup.
    pub html: String,
    /// Number of link paragraphs added.
    pub inserted: usize,
}

pub struct LinkInjector<R: Rng> {
    rng: R,
}

impl LinkInjector<StdRng> {
    /// Seeded injector when `seed` is given, entropy-seeded otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> LinkInjector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Insert up to `num_links` link paragraphs, pairing the `i`-th insertion
    /// point with the `i`-th candidate.
    ///
    /// Fails with [`InterlinkError::NoParagraphs`] when the markup has no
    /// `<p>` elements, whatever the candidates.
    #[instrument(skip_all, fields(candidates = candidates.len(), num_links = num_links))]
    pub fn inject(
        &mut self,
        html: &str,
        candidates: &[ScoredCandidate],
        num_links: usize,
    ) -> Result<Injected> {
        let mut doc = Html::parse_document(html);

        let paragraphs: Vec<NodeId> = {
            let body = doc.select(&BODY).next().unwrap_or_else(|| doc.root_element());
            body.select(&PARAGRAPH).map(|p| p.id()).collect()
        };
        if paragraphs.is_empty() {
            return Err(InterlinkError::NoParagraphs);
        }

        let points = calculate_insertion_points(paragraphs.len(), num_links);
        debug!(paragraphs = paragraphs.len(), ?points, "insertion points");

        // paragraph index -> most recent node inserted after it
        let mut last_at: HashMap<usize, NodeId> = HashMap::new();
        let mut inserted = 0;

        for (&point, candidate) in points.iter().zip(candidates) {
            let transition = &TRANSITIONS[self.rng.gen_range(0..TRANSITIONS.len())];
            let markup = templates::link_paragraph(candidate, transition);

            let anchor = last_at.get(&point).copied().unwrap_or(paragraphs[point]);
            let new_id = splice_after(&mut doc.tree, anchor, &markup)?;
            last_at.insert(point, new_id);
            inserted += 1;

            debug!(point, url = %candidate.url, "link inserted");
        }

        let html = doc
            .select(&BODY)
            .next()
            .unwrap_or_else(|| doc.root_element())
            .inner_html();

        info!(inserted, "links injected");

        Ok(Injected { html, inserted })
    }
}

/// Parse `markup` (a single `<p>`) and insert a copy of it as the next
/// sibling of `anchor`. Returns the id of the inserted node.
fn splice_after(tree: &mut Tree<Node>, anchor: NodeId, markup: &str) -> Result<NodeId> {
    let snippet = Html::parse_fragment(markup);
    let paragraph = snippet
        .select(&PARAGRAPH)
        .next()
        .ok_or_else(|| InterlinkError::parse("link paragraph markup produced no <p>"))?;

    let new_id = graft(tree, *paragraph);

    let mut target = tree
        .get_mut(anchor)
        .ok_or_else(|| InterlinkError::parse("insertion target vanished from document"))?;
    target.insert_id_after(new_id);
    Ok(new_id)
}

/// Deep-copy `src` into `tree` as an orphan subtree.
fn graft(tree: &mut Tree<Node>, src: NodeRef<'_, Node>) -> NodeId {
    let id = tree.orphan(src.value().clone()).id();
    for child in src.children() {
        let child_id = graft(tree, child);
        if let Some(mut parent) = tree.get_mut(id) {
            parent.append_id(child_id);
        }
    }
    id
}
