//! Game search - query the catalog, fetch details, resolve local ids.
//!
//! A search runs in three stages:
//! 1. Keyword search against the catalog (ids only)
//! 2. One batched detail lookup for the first `max_results` ids
//! 3. Concurrent cache resolution of every detailed record
//!
//! Cache failures never fail the search; the affected item is returned with
//! no local id.

mod resolver;

pub use resolver::CacheResolver;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bgg::{BoardGameCatalog, CatalogError, GameRecord};
use crate::games::GameStore;
use crate::metrics::SEARCH_RESULTS;

/// Errors that fail a whole search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The catalog answered with a failure status or did not answer in time.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The catalog could not be reached at all.
    #[error("Upstream transport error: {0}")]
    UpstreamTransport(String),
}

impl From<CatalogError> for SearchError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unavailable { .. } | CatalogError::Timeout => {
                SearchError::UpstreamUnavailable(err.to_string())
            }
            CatalogError::Transport(_) => SearchError::UpstreamTransport(err.to_string()),
        }
    }
}

/// One game in a search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    #[serde(flatten)]
    pub game: GameRecord,
    /// Local cache id, or `None` when caching failed for this game.
    pub local_id: Option<String>,
}

/// Search service combining the catalog and the local cache.
pub struct GameSearchService {
    catalog: Arc<dyn BoardGameCatalog>,
    resolver: CacheResolver,
    max_results: usize,
}

impl GameSearchService {
    pub fn new(
        catalog: Arc<dyn BoardGameCatalog>,
        store: Arc<dyn GameStore>,
        max_results: usize,
    ) -> Self {
        Self {
            catalog,
            resolver: CacheResolver::new(store),
            max_results,
        }
    }

    /// Search the catalog for `query`.
    ///
    /// Items come back in the order the detail lookup returned them. Search
    /// hits whose details are missing (non-boardgame items, unknown ids) are
    /// silently dropped.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }

        let hits = self.catalog.search(query).await?;
        if hits.is_empty() {
            info!(query = %query, "Search returned no games");
            SEARCH_RESULTS.observe(0.0);
            return Ok(Vec::new());
        }

        let ids = self.select_ids(hits.iter().map(|h| h.upstream_id));
        debug!(query = %query, hits = hits.len(), forwarded = ids.len(), "Fetching game details");

        let records = self.catalog.fetch_details(&ids).await?;

        let pending = records.iter().map(|record| self.resolver.resolve(record));
        let resolutions = futures::future::join_all(pending).await;

        let items: Vec<SearchResultItem> = records
            .into_iter()
            .zip(resolutions)
            .map(|(game, resolution)| {
                let local_id = match resolution {
                    Ok(id) => Some(id),
                    Err(e) => {
                        warn!(upstream_id = game.upstream_id, error = %e, "Failed to cache game");
                        None
                    }
                };
                SearchResultItem { game, local_id }
            })
            .collect();

        info!(query = %query, results = items.len(), "Search completed");
        SEARCH_RESULTS.observe(items.len() as f64);

        Ok(items)
    }

    /// Distinct ids in first-seen order, capped at `max_results`.
    fn select_ids(&self, ids: impl Iterator<Item = u64>) -> Vec<u64> {
        let mut seen = HashSet::new();
        ids.filter(|id| seen.insert(*id))
            .take(self.max_results)
            .collect()
    }
}
