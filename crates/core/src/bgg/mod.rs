//! BoardGameGeek catalog integration.
//!
//! `BggClient` talks to the BGG XML API2 and turns its responses into
//! [`GameSummary`] and [`GameRecord`] values via the tolerant extractors in
//! [`parser`].

mod client;
pub mod parser;
mod types;

pub use client::BggClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the upstream catalog.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Upstream answered with a non-success status.
    #[error("Upstream returned HTTP {status}: {message}")]
    Unavailable { status: u16, message: String },

    /// Request did not complete within the configured timeout.
    #[error("Upstream request timed out")]
    Timeout,

    /// Network-level failure (DNS, connect, reset, body read).
    #[error("Upstream transport error: {0}")]
    Transport(String),
}

/// Trait for the upstream board game catalog.
#[async_trait]
pub trait BoardGameCatalog: Send + Sync {
    /// Search for base games by free-text query, in upstream order.
    async fn search(&self, query: &str) -> Result<Vec<GameSummary>, CatalogError>;

    /// Fetch full records for a batch of ids in a single call.
    ///
    /// Non-base-game items in the response are excluded.
    async fn fetch_details(&self, ids: &[u64]) -> Result<Vec<GameRecord>, CatalogError>;
}
