//! Sitemap XML parser.
//!
//! Understands the two shapes of the sitemaps.org protocol:
//! - `<sitemapindex>` with `<sitemap><loc>…</loc></sitemap>` entries (nested indexes)
//! - `<urlset>` with `<url><loc>…</loc></url>` entries (content pages)
//!
//! Elements are matched by local name, so namespace prefixes are ignored.
//! Both shapes may appear in one document; both lists are returned.

use interlink_shared::{InterlinkError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// `<loc>` values extracted from one index document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// Targets of `sitemap > loc` (further index documents).
    pub nested: Vec<String>,
    /// Targets of `url > loc` (content pages).
    pub entries: Vec<String>,
}

impl SitemapDocument {
    pub fn is_empty(&self) -> bool {
        self.nested.is_empty() && self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse an index document.
///
/// Fails with [`InterlinkError::Parse`] on mismatched or unclosed tags and on
/// input without a root element.
pub(crate) fn parse_sitemap(xml: &str) -> Result<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = SitemapDocument::default();
    let mut open: Vec<String> = Vec::new();
    let mut saw_root = false;
    // Some(..) while inside a <loc> element
    let mut loc_text: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                saw_root = true;
                if name == "loc" {
                    loc_text = Some(String::new());
                }
                open.push(name);
            }
            Ok(Event::Empty(_)) => {
                saw_root = true;
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if open.pop().is_none() {
                    return Err(InterlinkError::parse(format!(
                        "invalid XML: unexpected closing tag </{name}>"
                    )));
                }
                if name == "loc" {
                    if let Some(text) = loc_text.take() {
                        let text = text.trim();
                        if !text.is_empty() {
                            match open.last().map(String::as_str) {
                                Some("sitemap") => doc.nested.push(text.to_string()),
                                Some("url") => doc.entries.push(text.to_string()),
                                _ => {}
                            }
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(buf) = loc_text.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| InterlinkError::parse(format!("invalid XML text: {e}")))?;
                    buf.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(buf) = loc_text.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(InterlinkError::parse(format!(
                    "invalid XML at byte {}: {e}",
                    reader.error_position()
                )));
            }
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(InterlinkError::parse(format!(
            "invalid XML: unclosed element <{unclosed}>"
        )));
    }
    if !saw_root {
        return Err(InterlinkError::parse("invalid XML: no root element"));
    }

    Ok(doc)
}
