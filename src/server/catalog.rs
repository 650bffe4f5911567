use std::path::Path;

use rand::seq::SliceRandom;
use tracing::{info, warn};

use super::types::{CatalogEntry, CatalogPage, RawEntry};

pub const DEFAULT_LIMIT: usize = 200;
const MAX_LIMIT: usize = 500;

// ── CatalogStore – immutable snapshot of the movie list ────────────────────────

/// Read-only catalog built once at startup. Queries are pure reads, so the
/// store is shared across handlers without locking.
pub struct CatalogStore {
    entries: Vec<CatalogEntry>,
    loaded: bool,
}

/// Ephemeral query parameters; nothing here survives the request.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
    pub shuffle: bool,
}

impl CatalogStore {
    /// Load from disk synchronously (the file is small and read exactly once).
    /// A missing or invalid file leaves the server running with an empty
    /// catalog instead of refusing to start.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("catalog file {}: {e}", path.display());
                return Self::empty();
            }
        };

        match serde_json::from_str::<Vec<RawEntry>>(&raw) {
            Ok(raw_entries) => {
                let store = Self::from_raw(raw_entries);
                info!("loaded {} catalog entries from {}", store.len(), path.display());
                store
            }
            Err(e) => {
                warn!("catalog file {} is not a JSON array: {e}", path.display());
                Self::empty()
            }
        }
    }

    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            loaded: false,
        }
    }

    fn from_raw(raw: Vec<RawEntry>) -> Self {
        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(id, m)| CatalogEntry {
                id,
                title: m.title.filter(|t| !t.is_empty()).unwrap_or_else(|| "Untitled".to_string()),
                poster: m.logo.unwrap_or_default(),
                url: m.url.unwrap_or_default(),
            })
            .collect();

        Self {
            entries,
            loaded: true,
        }
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries,
            loaded: true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Filter, optionally shuffle, then slice. The stored order is never
    /// touched; a shuffle is a fresh uniform permutation of borrowed entries.
    pub fn query(&self, q: &CatalogQuery) -> CatalogPage {
        let mut working: Vec<&CatalogEntry> = match q.search.as_deref().filter(|s| !s.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                self.entries
                    .iter()
                    .filter(|m| m.title.to_lowercase().contains(&term))
                    .collect()
            }
            None => self.entries.iter().collect(),
        };

        if q.shuffle {
            // Fisher-Yates via rand; the original sorted by a random
            // comparator, which is biased.
            working.shuffle(&mut rand::thread_rng());
        }

        let total = working.len();
        let limit = q.limit.clamp(1, MAX_LIMIT);
        let offset = q.page.saturating_mul(limit);

        let data: Vec<CatalogEntry> = working
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        CatalogPage {
            total,
            page: q.page,
            has_more: offset.saturating_add(limit) < total,
            data,
        }
    }
}
