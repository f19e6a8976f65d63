//! Content collection for one candidate region.
//!
//! Gathers headings, text, links, images, lists and tables in document
//! order. Nothing is capped here; [`crate::limits::limit`] does that.

use dom_query::{Document, Selection};
use url::Url;

use crate::dom;
use crate::limits::RawSection;
use crate::patterns::{self, normalize_whitespace};
use crate::url_utils;

/// Elements whose text never counts as content.
const NON_CONTENT_TAGS: &str = "script, style, noscript, template";

/// Words taken from the text when a region has no heading to name it.
const LABEL_WORDS: usize = 7;

/// Collect the uncapped content of `candidate`.
#[must_use]
pub fn collect(candidate: &super::Candidate, index: usize, base: &Url) -> RawSection {
    let fragment = dom::parse(&candidate.html);
    let root = dom::body(&fragment);
    root.select(NON_CONTENT_TAGS).remove();

    let text = normalize_whitespace(&dom::block_text(&root));

    RawSection {
        index,
        section_type: Some(patterns::classify(
            &candidate.tag,
            &candidate.class,
            &candidate.id,
        )),
        label: derive_label(&root, &text, &candidate.tag),
        source_url: base.to_string(),
        headings: headings(&root),
        links: resolved_attrs(&fragment, "a[href]", "href", base),
        images: resolved_attrs(&fragment, "img[src]", "src", base),
        lists: lists(&root),
        tables: tables(&root),
        text,
        raw_html: candidate.html.clone(),
    }
}

/// First `h1`-`h3` text, else the first words of the text, else the
/// capitalized tag name.
fn derive_label(root: &Selection, text: &str, tag: &str) -> String {
    let from_heading = dom::elements_in_order(root, &["h1", "h2", "h3"])
        .iter()
        .map(|h| normalize_whitespace(&dom::text_content(h)))
        .find(|t| !t.is_empty());
    if let Some(label) = from_heading {
        return label;
    }

    let words: Vec<&str> = text.split_whitespace().take(LABEL_WORDS).collect();
    if !words.is_empty() {
        return words.join(" ");
    }

    capitalize(tag)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Section".to_string(),
    }
}

fn headings(root: &Selection) -> Vec<String> {
    dom::elements_in_order(root, &["h1", "h2", "h3", "h4", "h5", "h6"])
        .iter()
        .map(|h| normalize_whitespace(&dom::text_content(h)))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Attribute values of every match, resolved to absolute URLs.
fn resolved_attrs(doc: &Document, selector: &str, attr: &str, base: &Url) -> Vec<String> {
    doc.select(selector)
        .nodes()
        .iter()
        .filter_map(|node| dom::get_attribute(&Selection::from(*node), attr))
        .filter_map(|value| url_utils::create_absolute_url(&value, base))
        .collect()
}

fn lists(root: &Selection) -> Vec<Vec<String>> {
    dom::elements_in_order(root, &["ul", "ol"])
        .iter()
        .map(|list| {
            list.select("li")
                .nodes()
                .iter()
                .map(|li| normalize_whitespace(&dom::text_content(&Selection::from(*li))))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|items| !items.is_empty())
        .collect()
}

fn tables(root: &Selection) -> Vec<Vec<Vec<String>>> {
    root.select("table")
        .nodes()
        .iter()
        .map(|table| {
            Selection::from(*table)
                .select("tr")
                .nodes()
                .iter()
                .map(|row| {
                    dom::elements_in_order(&Selection::from(*row), &["td", "th"])
                        .iter()
                        .map(|cell| normalize_whitespace(&dom::text_content(cell)))
                        .collect::<Vec<_>>()
                })
                .filter(|row| !row.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|rows| !rows.is_empty())
        .collect()
}
