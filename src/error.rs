//! Error types for rs-sitesections.
//!
//! `Error` is what collaborators and fallible helpers return. Scraping itself
//! never fails as a whole: failures are recorded in an [`ErrorLog`] at the
//! phase boundary where they happen and the pipeline keeps going.

use std::time::Duration;

use crate::result::{Phase, ScrapeError};

/// Error type for scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The URL is malformed or uses a scheme other than http/https.
    #[error("Only http:// and https:// URLs are supported: {0}")]
    InvalidUrl(String),

    /// Transport-level failure (DNS, connection, TLS, body read).
    #[error("Request failed: {0}")]
    Fetch(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    HttpStatus {
        /// Response status code.
        status: u16,
        /// Final URL that produced the status.
        url: String,
    },

    /// A bounded operation did not finish in time.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Browser session or navigation failure.
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Click, scroll or pagination step failure.
    #[error("Interaction failed: {0}")]
    Interact(String),

    /// The document could not be segmented.
    #[error("Document could not be segmented: {0}")]
    Parse(String),
}

/// Result type alias for scraping operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Ordered collection of the errors met while scraping one page.
///
/// Passed by `&mut` into every stage so a failure in one phase is recorded
/// and the next phase still runs.
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Vec<ScrapeError>,
}

impl ErrorLog {
    /// Record a failure against the phase it happened in.
    pub fn record(&mut self, phase: Phase, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(phase = %phase, "{message}");
        self.entries.push(ScrapeError { message, phase });
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the log, yielding errors in the order they were recorded.
    #[must_use]
    pub fn into_entries(self) -> Vec<ScrapeError> {
        self.entries
    }
}
