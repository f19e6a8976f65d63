//! Static-versus-dynamic rendering decision.
//!
//! A static fetch is cheap, so it is tried first. The heuristic flags the
//! usual "empty shell hydrated on the client" page: little body text, or no
//! main content region.

use dom_query::{Document, Selection};

use crate::dom;
use crate::options::Options;
use crate::result::RenderMode;

/// Outcome of inspecting a static fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderDecision {
    pub use_static: bool,
}

impl RenderDecision {
    /// Decision used when no static result exists at all.
    #[must_use]
    pub fn dynamic() -> Self {
        Self { use_static: false }
    }

    #[must_use]
    pub fn mode(self) -> RenderMode {
        if self.use_static {
            RenderMode::Static
        } else {
            RenderMode::Dynamic
        }
    }
}

/// Decide from body text length and whether main content exists.
///
/// Dynamic rendering is needed when the trimmed text is shorter than
/// `min_static_text` characters or there is no main content.
#[must_use]
pub fn decide(static_text: &str, has_main_content: bool, opts: &Options) -> RenderDecision {
    let text_len = static_text.trim().chars().count();
    RenderDecision {
        use_static: text_len >= opts.min_static_text && has_main_content,
    }
}

/// True iff a `<main>` exists, or an `<article>` whose trimmed text is longer
/// than `min_article_text` characters.
#[must_use]
pub fn has_main_content(doc: &Document, opts: &Options) -> bool {
    if doc.select("main").exists() {
        return true;
    }

    doc.select("article")
        .nodes()
        .iter()
        .any(|node| dom::trimmed_text(&Selection::from(*node)).chars().count() > opts.min_article_text)
}

/// Run the heuristic over a static HTML payload.
#[must_use]
pub fn decide_for_html(html: &str, opts: &Options) -> RenderDecision {
    let doc = dom::parse(html);
    let body_text = dom::text_content(&dom::body(&doc));
    let decision = decide(&body_text, has_main_content(&doc, opts), opts);
    tracing::debug!(use_static = decision.use_static, "render decision");
    decision
}
