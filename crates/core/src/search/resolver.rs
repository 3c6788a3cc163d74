//! Resolution of parsed catalog records to local cache ids.

use std::sync::Arc;

use tracing::debug;

use crate::bgg::GameRecord;
use crate::games::{GameStore, StoreError};
use crate::metrics::CACHE_RESOLUTIONS;

/// Maps catalog records to local ids, caching unseen games.
///
/// Lookups are first-write-wins: an existing row is never updated with
/// newer catalog data.
#[derive(Clone)]
pub struct CacheResolver {
    store: Arc<dyn GameStore>,
}

impl CacheResolver {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    /// Return the local id for `record`, inserting a new row if needed.
    ///
    /// Store access runs on the blocking pool so several records can be
    /// resolved concurrently.
    pub async fn resolve(&self, record: &GameRecord) -> Result<String, StoreError> {
        let store = Arc::clone(&self.store);
        let record = record.clone();

        let result = tokio::task::spawn_blocking(move || resolve_blocking(store.as_ref(), &record))
            .await
            .map_err(|e| StoreError::Internal(format!("resolution task failed: {}", e)))
            .and_then(|r| r);

        let outcome = match &result {
            Ok((_, true)) => "inserted",
            Ok((_, false)) => "hit",
            Err(_) => "error",
        };
        CACHE_RESOLUTIONS.with_label_values(&[outcome]).inc();

        result.map(|(local_id, _)| local_id)
    }
}

/// Returns the local id and whether a new row was created.
fn resolve_blocking(
    store: &dyn GameStore,
    record: &GameRecord,
) -> Result<(String, bool), StoreError> {
    if let Some(existing) = store.find_by_upstream_id(record.upstream_id)? {
        debug!(upstream_id = record.upstream_id, local_id = %existing.local_id, "Game cache hit");
        return Ok((existing.local_id, false));
    }

    // Lost races fall through to the existing row's id
    let outcome = store.insert_if_absent(record)?;
    debug!(
        upstream_id = record.upstream_id,
        local_id = %outcome.local_id,
        inserted = outcome.inserted,
        "Game cached"
    );
    Ok((outcome.local_id, outcome.inserted))
}
