//! End-to-end scrape of one URL.
//!
//! Validate, fetch statically, decide the render mode, drive a rendering
//! session through the interaction phases, then clean and segment whichever
//! document was obtained last. Only URL validation stops the run early;
//! every other failure is recorded and the next phase still runs.

use std::sync::Arc;

use url::Url;

use crate::browser::{NoopRenderer, RenderSession, Renderer};
use crate::dom;
use crate::error::{Error, ErrorLog, Result};
use crate::fetch::{FetchResponse, Fetcher, HttpFetcher};
use crate::interact::{self, InteractionOrchestrator, PageSnapshot};
use crate::metadata;
use crate::noise;
use crate::options::Options;
use crate::render::{self, RenderDecision};
use crate::result::{Interactions, Phase, ScrapeResult};
use crate::segment;
use crate::url_utils;

/// What the dynamic path produced.
struct Rendered {
    interactions: Interactions,
    page: Option<PageSnapshot>,
}

/// Runs scrapes against a fetcher and a renderer.
///
/// Cheap to share behind an `Arc`; each [`Scraper::scrape`] call opens and
/// closes its own rendering session.
pub struct Scraper {
    fetcher: Arc<dyn Fetcher>,
    renderer: Arc<dyn Renderer>,
    options: Options,
}

impl Scraper {
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>, renderer: Arc<dyn Renderer>, options: Options) -> Self {
        Self {
            fetcher,
            renderer,
            options,
        }
    }

    /// A scraper using `reqwest` for static fetches and no browser.
    ///
    /// Pages are segmented from the static fetch; each scrape carries one
    /// `render` error saying so.
    #[allow(clippy::missing_errors_doc)]
    pub fn with_http(options: Options) -> Result<Self> {
        let fetcher = HttpFetcher::new(&options.user_agent)?;
        Ok(Self::new(Arc::new(fetcher), Arc::new(NoopRenderer), options))
    }

    /// Scrape `url`. Never fails; problems are listed in `errors`.
    pub async fn scrape(&self, url: &str) -> ScrapeResult {
        let mut result = ScrapeResult::new(url);
        let mut errors = ErrorLog::default();

        let target = match url_utils::validate_request_url(url) {
            Ok(target) => target,
            Err(e) => {
                errors.record(Phase::Fetch, e.to_string());
                result.errors = errors.into_entries();
                return result;
            }
        };

        let static_page = self.fetch_static(&target, &mut errors).await;
        let decision = static_page.as_ref().map_or_else(RenderDecision::dynamic, |page| {
            render::decide_for_html(&page.body, &self.options)
        });
        result.render_mode = decision.mode();

        let rendered = self.render(&target, &mut errors).await;
        result.interactions = rendered.interactions;

        let (html, base) = match (rendered.page, static_page) {
            (Some(page), _) => (page.html, page.url),
            (None, Some(page)) => (page.body, page.final_url),
            (None, None) => (String::new(), target.clone()),
        };

        if html.trim().is_empty() {
            let err = Error::Parse(format!("no document obtained for {target}"));
            errors.record(Phase::Parse, err.to_string());
        } else {
            let doc = noise::strip(&dom::parse(&html));
            result.meta = metadata::extract_meta(&doc, &base);
            if dom::body(&doc).exists() {
                result.sections = segment::segment(&doc, &base);
            } else {
                let err = Error::Parse(format!("no <body> in document for {base}"));
                errors.record(Phase::Parse, err.to_string());
            }
        }

        result.errors = errors.into_entries();

        tracing::info!(
            url = %target,
            render_mode = ?result.render_mode,
            sections = result.sections.len(),
            depth = result.interactions.depth,
            errors = result.errors.len(),
            "scrape complete"
        );

        result
    }

    /// Static fetch; `None` unless it produced a 2xx page.
    async fn fetch_static(&self, target: &Url, errors: &mut ErrorLog) -> Option<FetchResponse> {
        let limit = self.options.static_timeout;
        match interact::bounded(limit, self.fetcher.fetch(target, limit)).await {
            Ok(page) if page.is_success() => Some(page),
            Ok(page) => {
                let err = Error::HttpStatus {
                    status: page.status,
                    url: page.final_url.to_string(),
                };
                errors.record(Phase::Fetch, err.to_string());
                None
            }
            Err(e) => {
                errors.record(Phase::Fetch, format!("Static fetch of {target} failed: {e}"));
                None
            }
        }
    }

    /// Open a session, run the interaction phases and read the final DOM.
    ///
    /// The session is closed before returning whenever one was opened.
    async fn render(&self, target: &Url, errors: &mut ErrorLog) -> Rendered {
        let mut session = match self.renderer.new_session().await {
            Ok(session) => session,
            Err(e) => {
                errors.record(Phase::Render, e.to_string());
                return Rendered {
                    interactions: Interactions::starting_at(target.as_str()),
                    page: None,
                };
            }
        };

        let traversal = InteractionOrchestrator::new(session.as_mut(), &self.options)
            .run(target, errors)
            .await;

        let page = match traversal.snapshot {
            Some(snapshot) => Some(snapshot),
            None if traversal.page_loaded => self.read_page(session.as_mut(), target, errors).await,
            None => None,
        };

        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "failed to close render session");
        }

        Rendered {
            interactions: traversal.interactions,
            page,
        }
    }

    async fn read_page(
        &self,
        session: &mut dyn RenderSession,
        target: &Url,
        errors: &mut ErrorLog,
    ) -> Option<PageSnapshot> {
        let limit = self.options.page_load_timeout;

        let html = match interact::bounded(limit, session.content()).await {
            Ok(html) => html,
            Err(e) => {
                errors.record(Phase::Render, format!("Reading rendered content failed: {e}"));
                return None;
            }
        };

        let url = interact::bounded(limit, session.current_url())
            .await
            .unwrap_or_else(|_| target.clone());

        Some(PageSnapshot { html, url })
    }
}

/// Scrape `url` with default options, static fetch only.
pub async fn scrape(url: &str) -> ScrapeResult {
    match Scraper::with_http(Options::default()) {
        Ok(scraper) => scraper.scrape(url).await,
        Err(e) => {
            let mut result = ScrapeResult::new(url);
            let mut errors = ErrorLog::default();
            errors.record(Phase::Fetch, e.to_string());
            result.errors = errors.into_entries();
            result
        }
    }
}
