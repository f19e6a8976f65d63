//! Rule tables and compiled patterns used across the pipeline.
//!
//! Classification is driven by ordered tables evaluated top to bottom with
//! first-match-wins semantics, so each table can be tested on its own.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::browser::Locator;
use crate::result::SectionType;

// =============================================================================
// Noise Rules
// =============================================================================

/// Keywords marking noise subtrees, matched case-insensitively as substrings
/// of `class` or `id`.
pub const NOISE_KEYWORDS: &[&str] = &["cookie", "banner", "modal", "popup", "overlay"];

/// Return the first noise keyword found in `class` or `id`, if any.
#[must_use]
pub fn match_noise(class: &str, id: &str) -> Option<&'static str> {
    let class = class.to_lowercase();
    let id = id.to_lowercase();
    NOISE_KEYWORDS
        .iter()
        .find(|kw| class.contains(*kw) || id.contains(*kw))
        .copied()
}

// =============================================================================
// Section Classification
// =============================================================================

/// Semantic landmark tags used by the first segmentation tier.
pub const LANDMARK_TAGS: &[&str] = &["header", "nav", "main", "section", "footer", "article"];

/// Headings that open a group in the heading tier, with their rank.
pub const GROUP_HEADINGS: &[(&str, u8)] = &[("h1", 1), ("h2", 2), ("h3", 3)];

/// Tag-to-type rules, checked before any keyword rule.
pub const TAG_TYPE_RULES: &[(&str, SectionType)] = &[
    ("header", SectionType::Nav),
    ("nav", SectionType::Nav),
    ("footer", SectionType::Footer),
];

/// Keyword-to-type rules on `class`/`id`, in priority order.
pub const KEYWORD_TYPE_RULES: &[(&str, SectionType)] = &[
    ("hero", SectionType::Hero),
    ("faq", SectionType::Faq),
    ("pricing", SectionType::Pricing),
    ("grid", SectionType::Grid),
    ("list", SectionType::List),
];

/// Classify a candidate region from its tag name and attributes.
#[must_use]
pub fn classify(tag: &str, class: &str, id: &str) -> SectionType {
    let tag = tag.to_lowercase();
    if let Some((_, ty)) = TAG_TYPE_RULES.iter().find(|(t, _)| *t == tag) {
        return *ty;
    }

    let class = class.to_lowercase();
    let id = id.to_lowercase();
    KEYWORD_TYPE_RULES
        .iter()
        .find(|(kw, _)| class.contains(kw) || id.contains(kw))
        .map_or(SectionType::Section, |(_, ty)| *ty)
}

/// Rank of a heading tag (`h1` = 1 … `h6` = 6).
#[must_use]
pub fn heading_rank(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

// =============================================================================
// Interaction Locators
// =============================================================================

/// Tab controls, in selector priority order.
pub static TAB_LOCATORS: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    vec![
        Locator::css(r#"[role="tab"]"#),
        Locator::css(".tab"),
        Locator::css("[data-tab]"),
    ]
});

/// "Load more" style expanders, tried in order.
pub static EXPAND_LOCATORS: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    vec![
        Locator::text("button, a", "Load more"),
        Locator::text("button, a", "Show more"),
        Locator::css(r#"[class*="load-more"]"#),
        Locator::css(r#"[class*="show-more"]"#),
    ]
});

/// Pagination controls, tried in order.
pub static PAGINATION_LOCATORS: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    vec![Locator::text("a", "Next"), Locator::css(r#"[rel="next"]"#)]
});

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches multiple whitespace characters for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex"));

/// Collapse whitespace runs to single spaces and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text, " ").trim().to_string()
}
