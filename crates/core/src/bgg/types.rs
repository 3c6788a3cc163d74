//! Types for BoardGameGeek catalog data.

use serde::{Deserialize, Serialize};

/// A search hit from the BGG search endpoint.
///
/// Only used to build the id batch for the detail call; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    /// BGG game id.
    pub upstream_id: u64,
    /// Name as listed in the search result.
    pub name: String,
}

/// A fully parsed board game from the BGG `thing` endpoint.
///
/// Optional fields are `None` when BGG omits them or sends a value that is
/// not an integer. A present zero is kept as `Some(0)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// BGG game id (natural key).
    pub upstream_id: u64,
    /// Primary name.
    pub name: String,
    /// Publication year. Negative for BCE titles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_published: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_players: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_players: Option<u32>,
    /// Advertised playing time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playing_time_minutes: Option<u32>,
    /// Full-size box image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Description text with XML entities decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GameRecord {
    /// Create a record with only the required fields set.
    pub fn new(upstream_id: u64, name: impl Into<String>) -> Self {
        Self {
            upstream_id,
            name: name.into(),
            year_published: None,
            min_players: None,
            max_players: None,
            playing_time_minutes: None,
            image_url: None,
            description: None,
        }
    }
}
