//! Configuration options for scraping.
//!
//! The `Options` struct controls timeouts, settle delays and traversal
//! bounds. Output caps are fixed (see [`crate::limits`]) because they are
//! part of the response contract.

use std::time::Duration;

/// How the orchestrator decides a page has settled after an action.
///
/// Both strategies are bounded by the delay they are given, and page loads
/// are additionally bounded by [`Options::page_load_timeout`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Readiness {
    /// Sleep for the full settle delay.
    #[default]
    FixedDelay,

    /// Poll until an element matching `selector` is present, giving up once
    /// the settle delay has elapsed.
    PollSelector {
        /// CSS selector whose presence signals readiness.
        selector: String,
        /// Time between polls.
        interval: Duration,
    },
}

/// Configuration options for scraping.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use rs_sitesections::Options;
///
/// let options = Options {
///     static_timeout: Duration::from_secs(10),
///     ..Options::default()
/// };
/// assert_eq!(options.max_depth, 3);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Timeout for the static HTTP fetch.
    ///
    /// Default: 30 s
    pub static_timeout: Duration,

    /// Ceiling for a navigation plus its network-idle wait.
    ///
    /// Default: 30 s
    pub page_load_timeout: Duration,

    /// Settle delay after every navigation.
    ///
    /// Default: 2 s
    pub navigation_settle: Duration,

    /// Settle delay after every click.
    ///
    /// Default: 1 s
    pub click_settle: Duration,

    /// Settle delay after every scroll.
    ///
    /// Default: 1.5 s
    pub scroll_settle: Duration,

    /// Timeout for a single click.
    ///
    /// Default: 5 s
    pub click_timeout: Duration,

    /// Maximum number of pages visited while following pagination.
    ///
    /// Values above 3 are clamped to 3; values below 1 are raised to 1.
    ///
    /// Default: `3`
    pub max_depth: usize,

    /// Maximum number of tab elements clicked.
    ///
    /// Default: `3`
    pub max_tab_clicks: usize,

    /// Scroll-to-bottom operations performed on each page.
    ///
    /// Default: `3`
    pub scrolls_per_page: usize,

    /// Minimum trimmed body text (characters) for the static fetch to count
    /// as sufficient.
    ///
    /// Default: `200`
    pub min_static_text: usize,

    /// Minimum trimmed `<article>` text (characters) for it to count as
    /// main content.
    ///
    /// Default: `100`
    pub min_article_text: usize,

    /// User-Agent sent with the static fetch.
    pub user_agent: String,

    /// Readiness strategy applied after navigations, clicks and scrolls.
    ///
    /// Default: [`Readiness::FixedDelay`]
    pub readiness: Readiness,
}

/// Hard ceiling on pagination depth.
pub const MAX_DEPTH: usize = 3;

impl Default for Options {
    fn default() -> Self {
        Self {
            static_timeout: Duration::from_secs(30),
            page_load_timeout: Duration::from_secs(30),
            navigation_settle: Duration::from_secs(2),
            click_settle: Duration::from_secs(1),
            scroll_settle: Duration::from_millis(1500),
            click_timeout: Duration::from_secs(5),
            max_depth: MAX_DEPTH,
            max_tab_clicks: 3,
            scrolls_per_page: 3,
            min_static_text: 200,
            min_article_text: 100,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            readiness: Readiness::default(),
        }
    }
}

impl Options {
    /// `max_depth` clamped into `[1, 3]`.
    #[must_use]
    pub fn depth_limit(&self) -> usize {
        self.max_depth.clamp(1, MAX_DEPTH)
    }
}
