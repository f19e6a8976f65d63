//! Static HTTP fetch collaborator.
//!
//! The pipeline only needs `fetch(url, timeout) -> (status, body, headers)`;
//! [`HttpFetcher`] provides it on top of `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::encoding;
use crate::error::{Error, Result};

/// Response of a static fetch.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    /// URL after redirects; relative links resolve against it.
    pub final_url: Url,
    pub headers: Vec<(String, String)>,
    /// Body decoded to UTF-8.
    pub body: String,
}

impl FetchResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Something that can fetch a page without rendering it.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url`, giving up after `timeout`.
    ///
    /// Non-success statuses are returned as a response, not an error.
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchResponse>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client that follows redirects and sends `user_agent`.
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| Error::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchResponse> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let content_type = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str());
        let body = encoding::decode_body(&bytes, content_type);

        tracing::debug!(%final_url, status, bytes = bytes.len(), "static fetch complete");

        Ok(FetchResponse {
            status,
            final_url,
            headers,
            body,
        })
    }
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::Timeout(timeout)
    } else {
        Error::Fetch(err.to_string())
    }
}
