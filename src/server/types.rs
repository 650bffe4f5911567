use serde::{Deserialize, Serialize};

// ── Catalog wire types ─────────────────────────────────────────────────────────

/// One playable entry. `id` is the position in the load-order list and never
/// changes after startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: usize,
    pub title: String,
    pub poster: String,
    pub url: String,
}

/// Shape of one element of the catalog source file. Every field is optional;
/// loading fills in defaults rather than rejecting the entry.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawEntry {
    pub title: Option<String>,
    pub logo: Option<String>,
    pub url: Option<String>,
}

/// One page of query results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    pub total: usize,
    pub page: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
    pub data: Vec<CatalogEntry>,
}

// ── Status payloads ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub status: String,
    pub movies: usize,
    pub loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
