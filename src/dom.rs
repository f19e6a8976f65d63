//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate so the rest of the crate reads in
//! terms of element operations (attributes, tag names, ordered traversal)
//! rather than raw node plumbing.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef, Selection};

pub use tendril::StrTendril;

// === Attribute Operations ===

/// Get element ID attribute
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> Option<String> {
    sel.attr("id").map(|s| s.to_string())
}

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_lowercase())
}

/// Tag name of a single node (lowercase, elements only)
#[must_use]
pub fn node_tag(node: &NodeRef) -> Option<String> {
    if node.is_element() {
        node.node_name().map(|t| t.to_lowercase())
    } else {
        None
    }
}

// === Text Content ===

/// Get all text content of node and descendants
///
/// Returns `StrTendril` for zero-copy passing. Use `.to_string()` only when
/// you need owned storage.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Elements whose text is set apart from the text around them.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

fn is_block(node: &NodeRef) -> bool {
    node_tag(node).is_some_and(|t| BLOCK_TAGS.contains(&t.as_str()))
}

/// Text of a selection with a space wherever a block element starts or ends,
/// so `<p>one</p><p>two</p>` reads "one two" rather than "onetwo".
#[must_use]
pub fn block_text(sel: &Selection) -> String {
    let mut out = String::new();
    for root in sel.nodes() {
        for node in root.descendants() {
            let after_block = node.prev_sibling().is_some_and(|prev| is_block(&prev));
            if is_block(&node) || after_block {
                out.push(' ');
            }
            if node.is_text() {
                out.push_str(&node.text());
            }
        }
    }
    out
}

/// Get outer HTML content
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

// === Tree Navigation ===

/// Get next element sibling (skipping text and comment nodes)
#[must_use]
pub fn next_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.next_sibling();
    }
    None
}

/// Whether `node` or any of its ancestors satisfies `pred`.
#[must_use]
pub fn self_or_ancestor(node: &NodeRef, pred: impl Fn(&NodeRef) -> bool) -> bool {
    let mut current = Some(node.clone());
    while let Some(n) = current {
        if pred(&n) {
            return true;
        }
        current = n.parent();
    }
    false
}

// === Querying ===

/// Descendant elements of `root` whose tag is in `tags`, in document order.
///
/// Walks `*` and filters, so ordering never depends on how a grouped
/// selector is evaluated.
#[must_use]
pub fn elements_in_order<'a>(root: &Selection<'a>, tags: &[&str]) -> Vec<Selection<'a>> {
    root.select("*")
        .nodes()
        .iter()
        .filter(|node| node_tag(node).is_some_and(|t| tags.contains(&t.as_str())))
        .map(|node| Selection::from(*node))
        .collect()
}

/// Text of a selection, trimmed.
#[must_use]
pub fn trimmed_text(sel: &Selection) -> String {
    text_content(sel).trim().to_string()
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Body of a document (empty selection when absent)
#[inline]
#[must_use]
pub fn body(doc: &Document) -> Selection<'_> {
    doc.select("body")
}
