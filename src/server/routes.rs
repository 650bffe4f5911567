use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::{
    catalog::{CatalogQuery, CatalogStore, DEFAULT_LIMIT},
    proxy::ProxyRelay,
    types::{HealthResponse, StatsResponse},
};

// ── Application state shared across all routes ─────────────────────────────────

#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<CatalogStore>,
    pub proxy: Arc<ProxyRelay>,
}

// ── Query param structs ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MoviesQuery {
    page: Option<String>,
    limit: Option<String>,
    q: Option<String>,
    random: Option<String>,
}

#[derive(Deserialize)]
struct ProxyQuery {
    url: Option<String>,
}

// ── Route handlers ────────────────────────────────────────────────────────────

async fn handle_list_movies(
    Query(q): Query<MoviesQuery>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let query = CatalogQuery {
        page: q.page.and_then(|s| s.parse::<usize>().ok()).unwrap_or(0),
        limit: q
            .limit
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_LIMIT),
        search: q.q.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        shuffle: q.random.as_deref() == Some("true"),
    };

    Json(state.catalog.query(&query))
}

async fn handle_stats(State(state): State<ApiState>) -> impl IntoResponse {
    Json(StatsResponse {
        status: "ok".to_string(),
        movies: state.catalog.len(),
        loaded: state.catalog.is_loaded(),
    })
}

async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn handle_video_proxy(
    Query(q): Query<ProxyQuery>,
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Response {
    let target = match ProxyRelay::parse_target(q.url.as_deref()) {
        Ok(target) => target,
        Err(e) => return e.into_response(),
    };

    match state.proxy.relay(target, headers.get(header::RANGE)).await {
        Ok(response) => response,
        Err(e) => {
            warn!("relay failed: {e}");
            e.into_response()
        }
    }
}

async fn handle_index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

async fn handle_app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        include_str!("../../assets/app.js"),
    )
}

// ── Router factory ────────────────────────────────────────────────────────────

pub fn build_router(state: ApiState) -> Router {
    // Cross-origin players need the range headers exposed to be able to seek.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            header::CONTENT_RANGE,
            header::ACCEPT_RANGES,
            header::CONTENT_LENGTH,
        ]);

    let api = Router::new()
        .route("/movies", get(handle_list_movies))
        .route("/stats", get(handle_stats));

    Router::new()
        .nest("/api", api)
        .route("/video-proxy", get(handle_video_proxy))
        .route("/health", get(handle_health))
        .route("/", get(handle_index))
        .route("/app.js", get(handle_app_js))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
