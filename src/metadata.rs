//! Page metadata extraction.
//!
//! Reads title, description, language and canonical URL from the final
//! document. Open Graph values override their plain HTML counterparts.

use dom_query::{Document, Selection};
use url::Url;

use crate::dom;
use crate::patterns::normalize_whitespace;
use crate::result::PageMeta;
use crate::url_utils;

/// Extract [`PageMeta`] from `doc`, resolving the canonical URL against `base`.
#[must_use]
pub fn extract_meta(doc: &Document, base: &Url) -> PageMeta {
    let mut meta = PageMeta::default();

    if let Some(title) = doc.select("title").nodes().first() {
        meta.title = normalize_whitespace(&Selection::from(*title).text());
    }

    let mut og_title = None;
    let mut og_description = None;

    for node in doc.select("meta").nodes() {
        let tag = Selection::from(*node);

        let name = dom::get_attribute(&tag, "property")
            .or_else(|| dom::get_attribute(&tag, "name"))
            .unwrap_or_default()
            .to_lowercase();
        let content = dom::get_attribute(&tag, "content").unwrap_or_default();

        if name.is_empty() || content.trim().is_empty() {
            continue;
        }

        match name.as_str() {
            "og:title" => {
                og_title.get_or_insert(content);
            }
            "og:description" => {
                og_description.get_or_insert(content);
            }
            "description" => {
                if meta.description.is_empty() {
                    meta.description = content;
                }
            }
            _ => {}
        }
    }

    if let Some(title) = og_title {
        meta.title = title;
    }
    if let Some(description) = og_description {
        meta.description = description;
    }

    if let Some(lang) = dom::get_attribute(&doc.select("html"), "lang") {
        let code: String = lang.trim().chars().take(2).collect();
        if !code.is_empty() {
            meta.language = code.to_lowercase();
        }
    }

    meta.canonical = doc
        .select(r#"link[rel="canonical"]"#)
        .nodes()
        .iter()
        .find_map(|node| dom::get_attribute(&Selection::from(*node), "href"))
        .and_then(|href| url_utils::create_absolute_url(&href, base));

    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/post").unwrap()
    }

    #[test]
    fn open_graph_overrides_plain_tags() {
        let doc = dom::parse(
            r#"<html lang="fr-CA"><head>
                <title>Plain title</title>
                <meta name="description" content="Plain description">
                <meta property="og:title" content="OG title">
                <meta property="og:description" content="OG description">
                <link rel="canonical" href="/canonical">
            </head><body></body></html>"#,
        );
        let meta = extract_meta(&doc, &base());

        assert_eq!(meta.title, "OG title");
        assert_eq!(meta.description, "OG description");
        assert_eq!(meta.language, "fr");
        assert_eq!(meta.canonical.as_deref(), Some("https://example.com/canonical"));
    }

    #[test]
    fn defaults_when_nothing_declared() {
        let meta = extract_meta(&dom::parse("<html><body>x</body></html>"), &base());
        assert_eq!(meta, PageMeta::default());
        assert_eq!(meta.language, "en");
    }

    #[test]
    fn plain_title_and_description() {
        let doc = dom::parse(
            r#"<html><head><title>  My
                Page </title><meta name="description" content="About us"></head></html>"#,
        );
        let meta = extract_meta(&doc, &base());
        assert_eq!(meta.title, "My Page");
        assert_eq!(meta.description, "About us");
    }
}
