//! Preview server exposing section listings as JSON

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::{ContentRecord, MarkdownRenderer};
use crate::listing::{build_listing, latest, sort_by_date, ListingQuery};
use crate::Folio;

/// Entries returned by the latest endpoint when no count is given
const DEFAULT_LATEST: usize = 3;

/// Server state
struct ServerState {
    folio: Folio,
    renderer: MarkdownRenderer,
}

/// Summary of a configured section
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionSummary {
    name: String,
    per_page: usize,
    base_path: String,
}

/// Neighbouring record in date order
#[derive(Debug, Serialize)]
struct NavLink {
    slug: String,
    title: String,
}

/// Query string of the latest endpoint
#[derive(Debug, Default, Deserialize)]
struct LatestQuery {
    count: Option<String>,
}

impl LatestQuery {
    /// Requested count; anything but a positive integer falls back to the default
    fn count(&self) -> usize {
        self.count
            .as_deref()
            .and_then(|c| c.trim().parse::<usize>().ok())
            .filter(|&c| c > 0)
            .unwrap_or(DEFAULT_LATEST)
    }
}

/// A record card: metadata plus the banner alt text to show with it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordCard<'a> {
    #[serde(flatten)]
    record: &'a ContentRecord,
    banner_alt: Option<&'a str>,
}

impl<'a> RecordCard<'a> {
    fn new(record: &'a ContentRecord) -> Self {
        Self {
            record,
            banner_alt: record.metadata.banner.as_ref().map(|_| record.banner_alt()),
        }
    }
}

/// A single record with rendered HTML
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordView<'a> {
    #[serde(flatten)]
    card: RecordCard<'a>,
    html: String,
    summary_html: Option<String>,
    /// Newer record
    prev: Option<NavLink>,
    /// Older record
    next: Option<NavLink>,
}

/// Build the application router
pub fn router(folio: Folio) -> Router {
    let state = Arc::new(ServerState {
        folio,
        renderer: MarkdownRenderer::new(),
    });

    Router::new()
        .route("/api", get(sections_handler))
        .route("/api/:section", get(listing_handler))
        .route("/api/:section/latest", get(latest_handler))
        .route("/api/:section/:slug", get(record_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the preview server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}/api", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
    }
    tracing::info!("Shutting down");
}

async fn sections_handler(State(state): State<Arc<ServerState>>) -> Json<Vec<SectionSummary>> {
    let sections = state
        .folio
        .config
        .sections
        .iter()
        .map(|(name, section)| SectionSummary {
            name: name.clone(),
            per_page: section.per_page,
            base_path: section.base_path.clone(),
        })
        .collect();
    Json(sections)
}

async fn listing_handler(
    State(state): State<Arc<ServerState>>,
    Path(section): Path<String>,
    query: Option<Query<ListingQuery>>,
) -> Response {
    let Some(section_config) = state.folio.config.section(&section) else {
        return not_found(format!("unknown section `{}`", section));
    };
    let query = query.map(|Query(q)| q).unwrap_or_default();

    let records = load_records(&state.folio, &section);
    let listing = build_listing(
        &records,
        &query,
        section_config.per_page,
        &section_config.base_path,
    );
    Json(listing).into_response()
}

async fn record_handler(
    State(state): State<Arc<ServerState>>,
    Path((section, slug)): Path<(String, String)>,
) -> Response {
    if state.folio.config.section(&section).is_none() {
        return not_found(format!("unknown section `{}`", section));
    }

    let records = load_records(&state.folio, &section);
    let sorted = sort_by_date(records.iter());
    let Some(record) = sorted.iter().find(|r| r.slug == slug).copied() else {
        return not_found(format!("no `{}` entry named `{}`", section, slug));
    };

    let nav = |r: &ContentRecord| NavLink {
        slug: r.slug.clone(),
        title: r.metadata.title.clone(),
    };
    let view = RecordView {
        card: RecordCard::new(record),
        html: record
            .body
            .as_deref()
            .map(|body| state.renderer.render(body))
            .unwrap_or_default(),
        summary_html: record
            .metadata
            .summary
            .as_deref()
            .map(|s| state.renderer.render_inline(s)),
        prev: record.prev(&sorted).map(nav),
        next: record.next(&sorted).map(nav),
    };
    Json(view).into_response()
}

async fn latest_handler(
    State(state): State<Arc<ServerState>>,
    Path(section): Path<String>,
    query: Option<Query<LatestQuery>>,
) -> Response {
    if state.folio.config.section(&section).is_none() {
        return not_found(format!("unknown section `{}`", section));
    }
    let count = query.map(|Query(q)| q).unwrap_or_default().count();

    let records = load_records(&state.folio, &section);
    let cards: Vec<RecordCard> = latest(records.iter(), count)
        .into_iter()
        .map(RecordCard::new)
        .collect();
    Json(cards).into_response()
}

/// Load a section, degrading to an empty list so load errors never reach the client
fn load_records(folio: &Folio, section: &str) -> Arc<[ContentRecord]> {
    match folio.records(section) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to load section {}: {:#}", section, e);
            Arc::from(Vec::new())
        }
    }
}

fn not_found(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
