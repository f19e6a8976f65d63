//! Reads HTML from stdin and prints its sections as JSON.
//!
//! Usage: `segment_stdin <base-url> < page.html`

use std::io::{self, Read};

use anyhow::{Context, Result};
use rs_sitesections::{segment_html, url_utils};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,rs_sitesections=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let base = std::env::args()
        .nth(1)
        .context("usage: segment_stdin <base-url> < page.html")?;
    let base = url_utils::validate_request_url(&base)?;

    let mut html = String::new();
    io::stdin()
        .read_to_string(&mut html)
        .context("Failed to read from stdin")?;

    let sections = segment_html(&html, &base);
    println!("{}", serde_json::to_string_pretty(&sections)?);

    Ok(())
}
