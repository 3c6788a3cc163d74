//! Local game cache - catalog records persisted by BGG id.
//!
//! Rows are created the first time a BGG id is resolved and are never
//! updated afterwards.

mod sqlite;
mod types;

pub use sqlite::SqliteGameStore;
pub use types::*;

use crate::bgg::GameRecord;

/// Trait for game cache storage.
pub trait GameStore: Send + Sync {
    /// Look up a cached game by its BGG id.
    fn find_by_upstream_id(&self, upstream_id: u64) -> Result<Option<PersistedGame>, StoreError>;

    /// Insert a record unless a row with the same BGG id exists.
    ///
    /// Returns the local id of whichever row holds the BGG id afterwards, so
    /// two racing callers both end up with the same id.
    fn insert_if_absent(&self, record: &GameRecord) -> Result<InsertOutcome, StoreError>;

    /// Get a cached game by local id.
    fn get(&self, local_id: &str) -> Result<PersistedGame, StoreError>;

    /// List cached games, newest first.
    fn list(&self, limit: u32) -> Result<Vec<PersistedGame>, StoreError>;

    /// Remove a cached game by local id.
    fn remove(&self, local_id: &str) -> Result<(), StoreError>;

    /// Get cache statistics.
    fn stats(&self) -> Result<GameStats, StoreError>;
}
