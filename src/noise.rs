//! Noise removal.
//!
//! Drops cookie banners, modals, popups and overlays before segmentation.
//! Runs once, after interaction has finished, because live pages inject
//! these elements while being driven.

use std::collections::HashSet;

use dom_query::{Document, NodeId, Selection};

use crate::dom;
use crate::patterns;

/// Structural elements that are never removed, whatever their attributes.
const PROTECTED_TAGS: &[&str] = &["html", "head", "body"];

/// Return a copy of `doc` with every noise subtree removed.
///
/// The input is left untouched. Applying `strip` to its own output changes
/// nothing.
#[must_use]
pub fn strip(doc: &Document) -> Document {
    let cleaned = dom::parse(&doc.html());
    let removed = remove_noise(&cleaned);
    if removed > 0 {
        tracing::debug!(removed, "noise subtrees removed");
    }
    cleaned
}

/// Remove noise subtrees in place, returning how many roots were removed.
fn remove_noise(doc: &Document) -> usize {
    let matched: HashSet<NodeId> = doc
        .select("[class], [id]")
        .nodes()
        .iter()
        .filter(|node| is_noise(&Selection::from(**node)))
        .map(|node| node.id)
        .collect();

    // Only remove outermost matches; descendants go with their ancestor.
    let roots: Vec<Selection> = doc
        .select("[class], [id]")
        .nodes()
        .iter()
        .filter(|node| matched.contains(&node.id))
        .filter(|node| {
            !node
                .parent()
                .is_some_and(|p| dom::self_or_ancestor(&p, |a| matched.contains(&a.id)))
        })
        .map(|node| Selection::from(*node))
        .collect();

    for sel in &roots {
        sel.remove();
    }
    roots.len()
}

fn is_noise(sel: &Selection) -> bool {
    let tag = dom::tag_name(sel).unwrap_or_default();
    if PROTECTED_TAGS.contains(&tag.as_str()) {
        return false;
    }

    let class = dom::class_name(sel).unwrap_or_default();
    let id = dom::id(sel).unwrap_or_default();
    patterns::match_noise(&class, &id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body class="has-modal-open">
            <div id="cookie-consent"><p>We use cookies</p></div>
            <main>
                <p>Real content</p>
                <div class="newsletter-POPUP"><div class="overlay-inner">Sign up</div></div>
            </main>
            <section class="Hero-Banner">Promo</section>
        </body></html>
    "#;

    #[test]
    fn removes_all_noise_kinds() {
        let doc = dom::parse(PAGE);
        let cleaned = strip(&doc);
        let text = cleaned.select("body").text();

        assert!(text.contains("Real content"));
        assert!(!text.contains("We use cookies"));
        assert!(!text.contains("Sign up"));
        assert!(!text.contains("Promo"));
    }

    #[test]
    fn never_removes_body() {
        let cleaned = strip(&dom::parse(PAGE));
        assert!(cleaned.select("body").exists());
        assert!(cleaned.select("main").exists());
    }

    #[test]
    fn leaves_input_untouched() {
        let doc = dom::parse(PAGE);
        let _ = strip(&doc);
        assert!(doc.select("#cookie-consent").exists());
    }

    #[test]
    fn is_idempotent() {
        let once = strip(&dom::parse(PAGE));
        let twice = strip(&once);
        assert_eq!(once.html(), twice.html());
    }

    #[test]
    fn element_matching_several_rules_is_removed_once() {
        let doc = dom::parse(r#"<body><div class="cookie-banner modal" id="popup">x</div><p>keep</p></body>"#);
        let cleaned = dom::parse(&doc.html());
        assert_eq!(remove_noise(&cleaned), 1);
        assert!(cleaned.select("p").exists());
    }

    #[test]
    fn thousands_of_overlays_are_removed_as_their_roots() {
        let mut body = String::new();
        for i in 0..2000 {
            body.push_str(&format!(
                r#"<div class="overlay"><div class="modal"><span class="popup">{i}</span></div></div><p>keep {i}</p>"#
            ));
        }
        let cleaned = dom::parse(&format!("<body>{body}</body>"));

        assert_eq!(remove_noise(&cleaned), 2000);
        assert!(!cleaned.select(".overlay, .modal, .popup").exists());
        assert_eq!(cleaned.select("p").length(), 2000);
    }
}
