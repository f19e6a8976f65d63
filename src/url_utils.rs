//! URL Utility Functions
//!
//! Validation of request URLs and resolution of the relative `href`/`src`
//! values found in pages against the page's final base URL.

use url::Url;

use crate::error::{Error, Result};

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Validate a request URL: it must parse, use http or https, and have a host.
///
/// # Errors
/// Returns [`Error::InvalidUrl`] for anything else. No network access happens.
pub fn validate_request_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(format!("{raw} ({e})")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(raw.to_string()));
    }
    if url.host().is_none() {
        return Err(Error::InvalidUrl(raw.to_string()));
    }

    Ok(url)
}

/// Convert a relative or absolute URL to absolute form.
///
/// Scheme-carrying values such as `mailto:` and `tel:` are already absolute
/// and are returned unchanged.
///
/// # Returns
/// * `Some(absolute)` when the value resolves to an absolute URL, `None`
///   for empty values and values that cannot be resolved
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> Option<String> {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return None;
    }

    let (is_abs, parsed) = is_absolute_url(url_str);
    if is_abs {
        return parsed.map(String::from);
    }

    base.join(url_str).ok().map(String::from)
}

/// Whether two URLs share a host.
#[must_use]
pub fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str().is_some() && a.host_str() == b.host_str()
}
