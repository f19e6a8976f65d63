//! Rendering collaborator abstraction.
//!
//! Defines the `Renderer` and `RenderSession` traits the interaction
//! orchestrator drives. A session is one live page (tab); it is acquired per
//! scrape and always closed by the pipeline, whatever happened in between.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{Error, Result};

/// How to find elements on a live page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Elements matching a CSS selector.
    Css(String),

    /// Elements matching `css` whose text contains `text`, compared
    /// case-insensitively.
    Text {
        css: String,
        text: String,
    },
}

impl Locator {
    #[must_use]
    pub fn css(selector: &str) -> Self {
        Self::Css(selector.to_string())
    }

    #[must_use]
    pub fn text(css: &str, text: &str) -> Self {
        Self::Text {
            css: css.to_string(),
            text: text.to_string(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => f.write_str(selector),
            Self::Text { css, text } => write!(f, "{css}:has-text(\"{text}\")"),
        }
    }
}

/// Opaque reference to an element on the current page.
///
/// Backends must hand out the same handle for the same element, whichever
/// locator found it, so callers can tell distinct elements apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(u64);

impl ElementHandle {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A browser engine that can open rendering sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a new session (tab).
    async fn new_session(&self) -> Result<Box<dyn RenderSession>>;
}

/// A single live page.
#[async_trait]
pub trait RenderSession: Send {
    /// Navigate to `url`, failing after `timeout`.
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<()>;

    /// Wait until the network has been idle, failing after `timeout`.
    async fn wait_for_network_idle(&mut self, timeout: Duration) -> Result<()>;

    /// All elements matching `locator`, in document order.
    async fn query_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>>;

    /// Whether the element is visible and enabled.
    async fn is_actionable(&mut self, element: ElementHandle) -> Result<bool>;

    async fn click(&mut self, element: ElementHandle, timeout: Duration) -> Result<()>;

    async fn attribute(&mut self, element: ElementHandle, name: &str) -> Result<Option<String>>;

    /// Scroll the window to the bottom of the document.
    async fn scroll_to_bottom(&mut self) -> Result<()>;

    /// URL of the current page after redirects.
    async fn current_url(&mut self) -> Result<Url>;

    /// Serialized HTML of the current DOM.
    async fn content(&mut self) -> Result<String>;

    /// Tear the session down.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A renderer used when no browser is available.
///
/// Every session request fails, so the pipeline records one `render` error
/// and works from the static fetch.
pub struct NoopRenderer;

#[async_trait]
impl Renderer for NoopRenderer {
    async fn new_session(&self) -> Result<Box<dyn RenderSession>> {
        Err(Error::Render(
            "browser not available, static fetch only".to_string(),
        ))
    }
}
