//! # rs-sitesections
//!
//! Turns a web page into a bounded list of labeled sections.
//!
//! A scrape fetches the page statically, drives a rendering session through
//! a short interaction traversal (tabs, one "load more" expander, scrolling,
//! up to three pages of pagination), strips cookie banners and overlays,
//! and segments what is left into typed sections with capped content.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn run() {
//! let result = rs_sitesections::scrape("https://example.com/").await;
//! for section in &result.sections {
//!     println!("{} {}", section.id, section.label);
//! }
//! # }
//! ```
//!
//! Offline segmentation of HTML you already have:
//!
//! ```rust
//! use url::Url;
//!
//! let base = Url::parse("https://example.com/").unwrap();
//! let sections = rs_sitesections::segment_html(
//!     "<body><nav><a href=\"/about\">About</a></nav></body>",
//!     &base,
//! );
//! assert_eq!(sections[0].id, "nav-0");
//! assert_eq!(sections[0].links, vec!["https://example.com/about"]);
//! ```
//!
//! ## Failure model
//!
//! [`Scraper::scrape`] never fails. Every phase that goes wrong adds an
//! entry to [`ScrapeResult::errors`] tagged `fetch`, `render`, `parse` or
//! `interact`, and the pipeline continues with what it has.

mod error;
mod options;
mod pipeline;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Rule tables: noise keywords, section classification, interaction locators.
pub mod patterns;

/// URL validation and resolution.
pub mod url_utils;

/// Character encoding detection and decoding of fetched bodies.
pub mod encoding;

/// Static HTTP fetch collaborator.
pub mod fetch;

/// Rendering collaborator traits.
pub mod browser;

/// Static-versus-dynamic rendering decision.
pub mod render;

/// Bounded interaction traversal on a live page.
pub mod interact;

/// Cookie banner, modal, popup and overlay removal.
pub mod noise;

/// Segmentation into candidate regions and content collection.
pub mod segment;

/// Output caps.
pub mod limits;

/// Page metadata (title, description, language, canonical URL).
pub mod metadata;

pub use error::{Error, ErrorLog, Result};
pub use options::{Options, Readiness, MAX_DEPTH};
pub use pipeline::{scrape, Scraper};
pub use result::{
    Interactions, PageMeta, Phase, RenderMode, ScrapeError, ScrapeResult, Section, SectionType,
};

/// Clean and segment an HTML document without fetching or rendering.
///
/// Relative links and images resolve against `base`. Blank input yields no
/// sections.
#[must_use]
pub fn segment_html(html: &str, base: &url::Url) -> Vec<Section> {
    if html.trim().is_empty() {
        return Vec::new();
    }
    let doc = noise::strip(&dom::parse(html));
    segment::segment(&doc, base)
}
