//! HTTP front end: `POST /scrape` and `GET /healthz`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use rs_sitesections::{url_utils, Options, ScrapeResult, Scraper};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Deserialize)]
struct ScrapeRequest {
    url: String,
}

#[derive(Debug, Serialize)]
struct ScrapeResponse {
    result: ScrapeResult,
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn scrape(
    State(scraper): State<Arc<Scraper>>,
    Json(request): Json<ScrapeRequest>,
) -> (StatusCode, Json<ScrapeResponse>) {
    let status = if url_utils::validate_request_url(&request.url).is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    let result = scraper.scrape(&request.url).await;
    (status, Json(ScrapeResponse { result }))
}

fn build_app(scraper: Arc<Scraper>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/scrape", post(scrape))
        .layer(TraceLayer::new_for_http())
        .with_state(scraper)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rs_sitesections=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = match std::env::var("PORT") {
        Ok(port) => port.parse().context("PORT must be a port number")?,
        Err(_) => 8000,
    };

    let scraper = Scraper::with_http(Options::default()).context("Failed to build scraper")?;
    let app = build_app(Arc::new(scraper));

    let addr = format!("{host}:{port}");
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/healthz", port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
