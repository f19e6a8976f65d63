//! Bounded interaction traversal on a live page.
//!
//! Phases, in order: navigate to the start URL, click tabs, click one
//! "load more" style expander, then scroll and follow pagination until the
//! depth limit. Every step is best-effort: failures land in the
//! [`ErrorLog`] and the traversal carries on with whatever state it has.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout, Instant};
use url::Url;

use crate::browser::{ElementHandle, Locator, RenderSession};
use crate::error::{Error, ErrorLog, Result};
use crate::options::{Options, Readiness};
use crate::patterns::{EXPAND_LOCATORS, PAGINATION_LOCATORS, TAB_LOCATORS};
use crate::result::{Interactions, Phase};
use crate::url_utils;

/// A document read back from the session, with the URL it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub html: String,
    pub url: Url,
}

/// What a traversal produced.
#[derive(Debug, Clone)]
pub struct Traversal {
    pub interactions: Interactions,
    /// Whether the start URL loaded; when false the session holds no page.
    pub page_loaded: bool,
    /// The last page reached, when a failed pagination navigation may have
    /// left the session on something else. Read the session itself when
    /// this is `None` and `page_loaded` holds.
    pub snapshot: Option<PageSnapshot>,
}

/// Drives one rendering session through the interaction phases.
pub struct InteractionOrchestrator<'a> {
    session: &'a mut dyn RenderSession,
    options: &'a Options,
}

impl<'a> InteractionOrchestrator<'a> {
    pub fn new(session: &'a mut dyn RenderSession, options: &'a Options) -> Self {
        Self { session, options }
    }

    /// Run every phase starting at `start`.
    ///
    /// `pages` always starts with `start` and `depth == pages.len()` holds on
    /// every return path.
    pub async fn run(mut self, start: &Url, errors: &mut ErrorLog) -> Traversal {
        let mut interactions = Interactions::starting_at(start.as_str());

        if let Err(e) = self.open(start, Phase::Render, errors).await {
            errors.record(Phase::Render, format!("Navigation to {start} failed: {e}"));
            return Traversal {
                interactions,
                page_loaded: false,
                snapshot: None,
            };
        }

        self.click_tabs(&mut interactions, errors).await;
        self.expand(&mut interactions, errors).await;
        let snapshot = self.scroll_and_paginate(start, &mut interactions, errors).await;

        tracing::debug!(
            depth = interactions.depth,
            clicks = interactions.clicks,
            scrolls = interactions.scrolls,
            "interaction traversal finished"
        );

        Traversal {
            interactions,
            page_loaded: true,
            snapshot,
        }
    }

    /// Navigate, wait for network idle, then settle.
    ///
    /// Only the navigation itself is fatal; an idle wait that runs out is
    /// recorded against `phase` and the page is used as it stands.
    async fn open(&mut self, url: &Url, phase: Phase, errors: &mut ErrorLog) -> Result<()> {
        let limit = self.options.page_load_timeout;
        bounded(limit, self.session.navigate(url, limit)).await?;

        if let Err(e) = bounded(limit, self.session.wait_for_network_idle(limit)).await {
            errors.record(phase, format!("Network idle not reached on {url}: {e}"));
        }

        self.settle(self.options.navigation_settle).await;
        Ok(())
    }

    async fn click_tabs(&mut self, interactions: &mut Interactions, errors: &mut ErrorLog) {
        let max = self.options.max_tab_clicks;
        let mut attempted: HashSet<ElementHandle> = HashSet::new();

        'locators: for locator in TAB_LOCATORS.iter() {
            let handles = match self.query(locator).await {
                Ok(handles) => handles,
                Err(e) => {
                    errors.record(Phase::Interact, format!("Tab lookup {locator} failed: {e}"));
                    continue;
                }
            };

            for handle in handles {
                if attempted.len() >= max {
                    break 'locators;
                }
                if !attempted.insert(handle) {
                    continue;
                }

                match self.click(handle).await {
                    Ok(()) => {
                        interactions.record_click(&locator.to_string());
                        self.settle(self.options.click_settle).await;
                    }
                    Err(e) => {
                        errors.record(Phase::Interact, format!("Tab click on {locator} failed: {e}"));
                    }
                }
            }
        }
    }

    /// Click the first actionable expander, once.
    async fn expand(&mut self, interactions: &mut Interactions, errors: &mut ErrorLog) {
        for locator in EXPAND_LOCATORS.iter() {
            let handles = match self.query(locator).await {
                Ok(handles) => handles,
                Err(e) => {
                    errors.record(Phase::Interact, format!("Expander lookup {locator} failed: {e}"));
                    continue;
                }
            };

            for handle in handles {
                if !matches!(self.session.is_actionable(handle).await, Ok(true)) {
                    continue;
                }

                match self.click(handle).await {
                    Ok(()) => {
                        interactions.record_click(&locator.to_string());
                        self.settle(self.options.click_settle).await;
                        return;
                    }
                    Err(e) => {
                        errors.record(Phase::Interact, format!("Expander click on {locator} failed: {e}"));
                        break;
                    }
                }
            }
        }
    }

    /// Scroll each page and follow pagination up to the depth limit.
    ///
    /// Returns the page the traversal ended on if the session no longer
    /// holds it.
    async fn scroll_and_paginate(
        &mut self,
        start: &Url,
        interactions: &mut Interactions,
        errors: &mut ErrorLog,
    ) -> Option<PageSnapshot> {
        let depth_limit = self.options.depth_limit();
        let mut current = start.clone();

        loop {
            let mut next_page = None;

            for _ in 0..self.options.scrolls_per_page {
                match bounded(self.options.click_timeout, self.session.scroll_to_bottom()).await {
                    Ok(()) => {
                        interactions.scrolls += 1;
                        self.settle(self.options.scroll_settle).await;
                    }
                    Err(e) => {
                        errors.record(Phase::Interact, format!("Scroll on {current} failed: {e}"));
                    }
                }

                if interactions.depth >= depth_limit {
                    continue;
                }
                if let Some(url) = self.find_next_page(&current, interactions, errors).await {
                    next_page = Some(url);
                    break;
                }
            }

            let Some(next) = next_page else {
                return None;
            };

            // A navigation that fails part-way can leave an error page behind.
            let snapshot = match self.snapshot(&current).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    errors.record(Phase::Interact, format!("Reading {current} before pagination failed: {e}"));
                    return None;
                }
            };

            if let Err(e) = self.open(&next, Phase::Interact, errors).await {
                errors.record(Phase::Interact, format!("Pagination to {next} failed: {e}"));
                return Some(snapshot);
            }

            interactions.push_page(next.as_str());
            tracing::debug!(depth = interactions.depth, page = %next, "followed pagination");
            current = next;
        }
    }

    async fn snapshot(&mut self, current: &Url) -> Result<PageSnapshot> {
        let limit = self.options.page_load_timeout;
        let html = bounded(limit, self.session.content()).await?;
        let url = bounded(limit, self.session.current_url())
            .await
            .unwrap_or_else(|_| current.clone());
        Ok(PageSnapshot { html, url })
    }

    /// Resolve the first usable pagination control on the current page.
    ///
    /// Controls pointing off-host, at non-http(s) targets or at an already
    /// visited page are ignored.
    async fn find_next_page(
        &mut self,
        current: &Url,
        interactions: &Interactions,
        errors: &mut ErrorLog,
    ) -> Option<Url> {
        let base = self
            .session
            .current_url()
            .await
            .unwrap_or_else(|_| current.clone());

        for locator in PAGINATION_LOCATORS.iter() {
            let handles = match self.query(locator).await {
                Ok(handles) => handles,
                Err(e) => {
                    errors.record(Phase::Interact, format!("Pagination lookup {locator} failed: {e}"));
                    continue;
                }
            };
            let Some(handle) = handles.first().copied() else {
                continue;
            };

            let href = match self.session.attribute(handle, "href").await {
                Ok(Some(href)) => href,
                Ok(None) => continue,
                Err(e) => {
                    errors.record(Phase::Interact, format!("Reading {locator} href failed: {e}"));
                    continue;
                }
            };

            let Some((true, Some(next))) = url_utils::create_absolute_url(&href, &base)
                .map(|abs| url_utils::is_absolute_url(&abs))
            else {
                continue;
            };
            if !url_utils::same_host(&next, &base) {
                tracing::debug!(%next, "skipping off-host pagination link");
                continue;
            }
            if interactions.visited(next.as_str()) {
                continue;
            }
            return Some(next);
        }

        None
    }

    async fn query(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let limit = self.options.click_timeout;
        bounded(limit, self.session.query_all(locator)).await
    }

    async fn click(&mut self, handle: ElementHandle) -> Result<()> {
        let limit = self.options.click_timeout;
        bounded(limit, self.session.click(handle, limit)).await
    }

    /// Wait for the page to settle, per the configured readiness strategy.
    async fn settle(&mut self, delay: Duration) {
        let options = self.options;
        match &options.readiness {
            Readiness::FixedDelay => sleep(delay).await,
            Readiness::PollSelector { selector, interval } => {
                let locator = Locator::css(selector);
                let deadline = Instant::now() + delay;
                loop {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        break;
                    }
                    if let Ok(Ok(found)) = timeout(remaining, self.session.query_all(&locator)).await {
                        if !found.is_empty() {
                            break;
                        }
                    }
                    sleep((*interval).min(deadline.saturating_duration_since(Instant::now()))).await;
                }
            }
        }
    }
}

/// Run `fut`, failing with [`Error::Timeout`] after `limit`.
pub(crate) async fn bounded<T>(limit: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    timeout(limit, fut).await.map_err(|_| Error::Timeout(limit))?
}
