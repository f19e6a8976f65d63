//! Result types for scraping output.
//!
//! These types are the JSON compatibility surface: field names, enum values
//! and caps are relied on by API consumers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of page region a section was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Nav,
    Footer,
    Hero,
    Faq,
    Pricing,
    Grid,
    List,
    Section,
}

impl SectionType {
    /// Lowercase name as it appears in JSON output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nav => "nav",
            Self::Footer => "footer",
            Self::Hero => "hero",
            Self::Faq => "faq",
            Self::Pricing => "pricing",
            Self::Grid => "grid",
            Self::List => "list",
            Self::Section => "section",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled, capped content block extracted from one region of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// `"{type}-{index}"`, unique within one result.
    pub id: String,

    #[serde(rename = "type")]
    pub section_type: SectionType,

    /// Human-readable label, at most 50 characters.
    pub label: String,

    /// Base URL the section's links and images were resolved against.
    pub source_url: String,

    pub headings: Vec<String>,

    /// Whitespace-normalized text content.
    pub text: String,

    /// Absolute link targets in document order.
    pub links: Vec<String>,

    /// Absolute image sources in document order.
    pub images: Vec<String>,

    /// Items of each `ul`/`ol`, in document order.
    pub lists: Vec<Vec<String>>,

    /// Rows of cell texts for each table.
    pub tables: Vec<Vec<Vec<String>>>,

    /// Serialized HTML of the region, capped at 2000 characters plus `"..."`.
    pub raw_html: String,

    /// Whether `raw_html` was cut.
    pub truncated: bool,
}

/// Record of the interaction traversal for one scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interactions {
    /// Every URL navigated to, in visitation order, each exactly once.
    pub pages: Vec<String>,

    /// Always equal to `pages.len()`.
    pub depth: usize,

    /// Number of successful clicks.
    pub clicks: usize,

    /// Locator description for each successful click.
    pub clicked: Vec<String>,

    /// Number of successful scroll-to-bottom operations.
    pub scrolls: usize,
}

impl Interactions {
    /// Interactions for a traversal that starts at `url`.
    #[must_use]
    pub fn starting_at(url: &str) -> Self {
        Self {
            pages: vec![url.to_string()],
            depth: 1,
            ..Self::default()
        }
    }

    /// Append a visited page, keeping `depth` in step.
    pub fn push_page(&mut self, url: &str) {
        self.pages.push(url.to_string());
        self.depth = self.pages.len();
    }

    /// Whether `url` was already visited during this traversal.
    #[must_use]
    pub fn visited(&self, url: &str) -> bool {
        self.pages.iter().any(|p| p == url)
    }

    pub(crate) fn record_click(&mut self, what: &str) {
        self.clicks += 1;
        self.clicked.push(what.to_string());
    }
}

/// Pipeline phase an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Fetch,
    Render,
    Parse,
    Interact,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Render => "render",
            Self::Parse => "parse",
            Self::Interact => "interact",
        })
    }
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeError {
    pub message: String,
    pub phase: Phase,
}

/// Whether the static fetch alone looked sufficient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Static,
    #[default]
    Dynamic,
}

/// Page-level metadata read from the final document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    /// Two-letter language code, `"en"` when undeclared.
    pub language: String,
    pub canonical: Option<String>,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            language: "en".to_string(),
            canonical: None,
        }
    }
}

/// Everything extracted from one scrape request.
///
/// Returned even when phases failed; see `errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    /// URL as submitted.
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub render_mode: RenderMode,
    pub meta: PageMeta,
    pub sections: Vec<Section>,
    pub interactions: Interactions,
    pub errors: Vec<ScrapeError>,
}

impl ScrapeResult {
    /// An empty result for `url`.
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            scraped_at: Utc::now(),
            render_mode: RenderMode::default(),
            meta: PageMeta::default(),
            sections: Vec::new(),
            interactions: Interactions::default(),
            errors: Vec::new(),
        }
    }
}
