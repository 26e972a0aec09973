//! Link paragraph wording.

use interlink_shared::ScoredCandidate;

/// Maximum anchor text length, in characters.
pub const MAX_ANCHOR_CHARS: usize = 60;

/// Sentence wrapped around an inserted link: `{intro} <a>..</a>{outro}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub intro: &'static str,
    pub outro: &'static str,
}

pub static TRANSITIONS: [Transition; 10] = [
    Transition {
        intro: "When exploring this topic further, consider checking out our guide on",
        outro: " to see how it compares and what might work best for your needs.",
    },
    Transition {
        intro: "For those interested in related solutions, our comprehensive review of",
        outro: " provides valuable insights that might help inform your decision.",
    },
    Transition {
        intro: "If you're weighing your options, it's worth exploring",
        outro: " for a detailed comparison of features and capabilities.",
    },
    Transition {
        intro: "To deepen your understanding of this subject, take a look at our analysis on",
        outro: " which covers key aspects in more detail.",
    },
    Transition {
        intro: "Building on these concepts, you might find our guide to",
        outro: " particularly helpful for understanding the broader context.",
    },
    Transition {
        intro: "For additional perspective on similar tools and platforms, check out",
        outro: " to see alternative approaches and solutions.",
    },
    Transition {
        intro: "If you're evaluating different options, our detailed comparison of",
        outro: " offers insights that can guide your selection process.",
    },
    Transition {
        intro: "To explore related features and functionality, review our post on",
        outro: " for a comprehensive overview of what's available.",
    },
    Transition {
        intro: "For those considering alternatives, investigating",
        outro: " can provide clarity on different strengths and use cases.",
    },
    Transition {
        intro: "Understanding the full landscape requires looking at",
        outro: " to see how various solutions stack up against each other.",
    },
];

/// Capitalize the first letter of each space-separated word, then cap at
/// [`MAX_ANCHOR_CHARS`] characters.
pub fn format_anchor_text(title: &str) -> String {
    title
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
        .chars()
        .take(MAX_ANCHOR_CHARS)
        .collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markup of one link paragraph.
pub(crate) fn link_paragraph(candidate: &ScoredCandidate, transition: &Transition) -> String {
    format!(
        "<p>{} <a href=\"{}\">{}</a>{}</p>",
        escape(transition.intro),
        escape(&candidate.url),
        escape(&format_anchor_text(&candidate.title)),
        escape(transition.outro),
    )
}
