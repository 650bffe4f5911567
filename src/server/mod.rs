pub mod catalog;
pub mod proxy;
pub mod routes;
pub mod types;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use catalog::CatalogStore;
use proxy::ProxyRelay;
use routes::{build_router, ApiState};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_FILE: &str = "data.json";

// ── Configuration ─────────────────────────────────────────────────────────────

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_file = std::env::var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE));

        Self { port, data_file }
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Catalog is loaded synchronously here; it is the only startup I/O and a
/// failure downgrades to an empty catalog rather than aborting.
pub fn build_state(config: &Config) -> ApiState {
    let catalog = Arc::new(CatalogStore::load(&config.data_file));
    let proxy = Arc::new(ProxyRelay::new());

    ApiState { catalog, proxy }
}

pub async fn start_server(config: Config) -> std::io::Result<()> {
    let state = build_state(&config);
    info!(
        "catalog ready: {} entries (loaded: {})",
        state.catalog.len(),
        state.catalog.is_loaded()
    );

    let router = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, router).await
}
