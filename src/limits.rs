//! Output size bounding.
//!
//! Every section goes through [`limit`] before it is returned. Caps are part
//! of the response contract, so they are constants rather than options.

use crate::result::{Section, SectionType};

pub const MAX_SECTIONS: usize = 20;
pub const MAX_LABEL_CHARS: usize = 50;
pub const MAX_HEADINGS: usize = 10;
pub const MAX_TEXT_CHARS: usize = 5000;
pub const MAX_LINKS: usize = 50;
pub const MAX_IMAGES: usize = 20;
pub const MAX_LISTS: usize = 10;
pub const MAX_TABLES: usize = 10;
pub const MAX_RAW_HTML_CHARS: usize = 2000;

/// Suffix appended to a cut `raw_html`.
pub const TRUNCATION_MARKER: &str = "...";

/// Uncapped content collected from one candidate region.
///
/// Links and images are already absolute.
#[derive(Debug, Clone, Default)]
pub struct RawSection {
    pub index: usize,
    pub section_type: Option<SectionType>,
    pub label: String,
    pub source_url: String,
    pub headings: Vec<String>,
    pub text: String,
    pub links: Vec<String>,
    pub images: Vec<String>,
    pub lists: Vec<Vec<String>>,
    pub tables: Vec<Vec<Vec<String>>>,
    pub raw_html: String,
}

/// Apply every cap and produce the final section. Never fails.
#[must_use]
pub fn limit(raw: RawSection) -> Section {
    let section_type = raw.section_type.unwrap_or(SectionType::Section);
    let (label, _) = truncate_chars(&raw.label, MAX_LABEL_CHARS);
    let (text, _) = truncate_chars(&raw.text, MAX_TEXT_CHARS);
    let (mut raw_html, truncated) = truncate_chars(&raw.raw_html, MAX_RAW_HTML_CHARS);
    if truncated {
        raw_html.push_str(TRUNCATION_MARKER);
    }

    Section {
        id: format!("{section_type}-{}", raw.index),
        section_type,
        label,
        source_url: raw.source_url,
        headings: take(raw.headings, MAX_HEADINGS),
        text,
        links: take(raw.links, MAX_LINKS),
        images: take(raw.images, MAX_IMAGES),
        lists: take(raw.lists, MAX_LISTS),
        tables: take(raw.tables, MAX_TABLES),
        raw_html,
        truncated,
    }
}

/// Cut `s` to at most `max` characters, reporting whether anything was cut.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> (String, bool) {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => (s[..byte_idx].to_string(), true),
        None => (s.to_string(), false),
    }
}

fn take<T>(mut items: Vec<T>, max: usize) -> Vec<T> {
    items.truncate(max);
    items
}
