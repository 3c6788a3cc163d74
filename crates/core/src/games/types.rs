//! Types for the local game cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bgg::GameRecord;

/// A game row cached in the local store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedGame {
    /// Store-generated identifier (UUID).
    pub local_id: String,
    /// Cached catalog data; `upstream_id` is unique across rows.
    #[serde(flatten)]
    pub game: GameRecord,
    /// When the row was first cached.
    pub created_at: DateTime<Utc>,
}

/// Result of a conflict-tolerant insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Local id of the row holding the upstream id after the insert.
    pub local_id: String,
    /// False when a row for the upstream id already existed.
    pub inserted: bool,
}

/// Cache statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStats {
    /// Total cached games.
    pub total_games: u64,
    /// Oldest entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_entry: Option<DateTime<Utc>>,
    /// Most recent entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Errors for game store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
