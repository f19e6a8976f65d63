//! Scripted fetcher and renderer shared by the integration tests.
//!
//! `FakeRenderer` serves a fixed set of pages; each session parses the
//! current page with `dom_query` on demand, so locators behave like real
//! selectors and element handles are stable positions in the document.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use rs_sitesections::browser::{ElementHandle, Locator, RenderSession, Renderer};
use rs_sitesections::dom::{self, Document, Selection};
use rs_sitesections::fetch::{FetchResponse, Fetcher};
use rs_sitesections::{Error, Result};
use url::Url;

/// Long enough that the static page counts as sufficient on its own.
pub fn filler(words: usize) -> String {
    "content ".repeat(words)
}

// === Fetcher ===

#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, (u16, String)>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &Url, _timeout: Duration) -> Result<FetchResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        let (status, body) = self
            .responses
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::Fetch(format!("connection refused: {url}")))?;
        Ok(FetchResponse {
            status,
            final_url: url.clone(),
            headers: vec![("content-type".to_string(), "text/html".to_string())],
            body,
        })
    }
}

// === Renderer ===

/// What the sessions of a [`FakeRenderer`] did.
#[derive(Debug, Default, Clone)]
pub struct SessionLog {
    pub opened: usize,
    pub closed: usize,
    pub navigations: Vec<String>,
    pub clicked: Vec<u64>,
    pub scrolls: usize,
}

/// Session operations that fail on purpose.
#[derive(Debug, Default, Clone)]
struct Faults {
    /// Navigating here loads the page, then reports an error.
    navigations: HashSet<String>,
    content: bool,
    idle: bool,
    scroll: bool,
}

#[derive(Clone, Default)]
pub struct FakeRenderer {
    pages: Arc<HashMap<String, String>>,
    log: Arc<Mutex<SessionLog>>,
    faults: Arc<Faults>,
    fail_sessions: bool,
}

impl FakeRenderer {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(url, html)| ((*url).to_string(), (*html).to_string()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// A renderer whose every session request fails.
    pub fn broken() -> Self {
        Self {
            fail_sessions: true,
            ..Self::default()
        }
    }

    /// Navigating to `url` leaves `html` in the session and returns an error,
    /// like a browser showing its own error page.
    pub fn failing_navigation(mut self, url: &str, html: &str) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), html.to_string());
        Arc::make_mut(&mut self.faults)
            .navigations
            .insert(url.to_string());
        self
    }

    pub fn content_fails(mut self) -> Self {
        Arc::make_mut(&mut self.faults).content = true;
        self
    }

    /// Network idle is reported only after the caller's timeout has passed.
    pub fn idle_never_settles(mut self) -> Self {
        Arc::make_mut(&mut self.faults).idle = true;
        self
    }

    pub fn scroll_fails(mut self) -> Self {
        Arc::make_mut(&mut self.faults).scroll = true;
        self
    }

    pub fn log(&self) -> SessionLog {
        self.log.lock().unwrap().clone()
    }

    /// A session outside of any scraper, for driving the orchestrator.
    pub fn session(&self) -> FakeSession {
        self.log.lock().unwrap().opened += 1;
        FakeSession {
            pages: Arc::clone(&self.pages),
            log: Arc::clone(&self.log),
            faults: Arc::clone(&self.faults),
            current: None,
        }
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn new_session(&self) -> Result<Box<dyn RenderSession>> {
        if self.fail_sessions {
            return Err(Error::Render("browser crashed on launch".to_string()));
        }
        Ok(Box::new(self.session()))
    }
}

pub struct FakeSession {
    pages: Arc<HashMap<String, String>>,
    log: Arc<Mutex<SessionLog>>,
    faults: Arc<Faults>,
    current: Option<Url>,
}

impl FakeSession {
    fn log(&self) -> MutexGuard<'_, SessionLog> {
        self.log.lock().unwrap()
    }

    fn html(&self) -> Result<String> {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url.as_str()))
            .cloned()
            .ok_or_else(|| Error::Render("no page loaded".to_string()))
    }

    /// Element at position `handle` in a `*` walk of the current page.
    fn with_element<T>(&self, handle: ElementHandle, f: impl FnOnce(&Selection) -> T) -> Result<T> {
        let doc = dom::parse(&self.html()?);
        let all = doc.select("*");
        let index = usize::try_from(handle.id()).map_err(|e| Error::Interact(e.to_string()))?;
        let node = all
            .nodes()
            .get(index)
            .copied()
            .ok_or_else(|| Error::Interact("stale element".to_string()))?;
        Ok(f(&Selection::from(node)))
    }
}

fn handles(doc: &Document, locator: &Locator) -> Vec<ElementHandle> {
    let (css, text) = match locator {
        Locator::Css(css) => (css.as_str(), None),
        Locator::Text { css, text } => (css.as_str(), Some(text.to_lowercase())),
    };

    let all = doc.select("*");
    let positions = all.nodes();

    doc.select(css)
        .nodes()
        .iter()
        .filter(|node| {
            text.as_ref().is_none_or(|needle| {
                dom::text_content(&Selection::from(**node))
                    .to_lowercase()
                    .contains(needle.as_str())
            })
        })
        .filter_map(|node| positions.iter().position(|n| n.id == node.id))
        .map(|index| ElementHandle::new(index as u64))
        .collect()
}

#[async_trait]
impl RenderSession for FakeSession {
    async fn navigate(&mut self, url: &Url, _timeout: Duration) -> Result<()> {
        self.log().navigations.push(url.to_string());
        if !self.pages.contains_key(url.as_str()) {
            return Err(Error::Render(format!("net::ERR_NAME_NOT_RESOLVED at {url}")));
        }
        self.current = Some(url.clone());
        if self.faults.navigations.contains(url.as_str()) {
            return Err(Error::Render(format!("net::ERR_TIMED_OUT at {url}")));
        }
        Ok(())
    }

    async fn wait_for_network_idle(&mut self, timeout: Duration) -> Result<()> {
        if self.faults.idle {
            tokio::time::sleep(timeout + Duration::from_secs(1)).await;
        }
        Ok(())
    }

    async fn query_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let doc = dom::parse(&self.html()?);
        Ok(handles(&doc, locator))
    }

    async fn is_actionable(&mut self, element: ElementHandle) -> Result<bool> {
        self.with_element(element, |sel| {
            !sel.has_attr("hidden") && !sel.has_attr("disabled")
        })
    }

    async fn click(&mut self, element: ElementHandle, _timeout: Duration) -> Result<()> {
        let broken = self.with_element(element, |sel| sel.has_attr("data-broken"))?;
        if broken {
            return Err(Error::Interact("element detached during click".to_string()));
        }
        self.log().clicked.push(element.id());
        Ok(())
    }

    async fn attribute(&mut self, element: ElementHandle, name: &str) -> Result<Option<String>> {
        self.with_element(element, |sel| dom::get_attribute(sel, name))
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.html()?;
        if self.faults.scroll {
            return Err(Error::Interact("page is not scrollable".to_string()));
        }
        self.log().scrolls += 1;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<Url> {
        self.current
            .clone()
            .ok_or_else(|| Error::Render("no page loaded".to_string()))
    }

    async fn content(&mut self) -> Result<String> {
        if self.faults.content {
            return Err(Error::Render("target closed".to_string()));
        }
        self.html()
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.log().closed += 1;
        Ok(())
    }
}
